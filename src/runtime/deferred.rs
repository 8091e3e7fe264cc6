/*--------------------------------------------------------------------------

deferred-sequencer

The MIT License (MIT)

Copyright (c) 2016 Haydn Paterson (sinclair) <haydn.developer@gmail.com>

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in
all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
THE SOFTWARE.

---------------------------------------------------------------------------*/

use std::cell::RefCell;
use std::future::{Future, IntoFuture};
use std::mem;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::error::{Error, Result};

//---------------------------------------------------------
// State<T>
//---------------------------------------------------------
enum State<T> {
  Pending(Vec<Waker>),
  Settled(Result<T>)
}

/// A value that becomes available at a later point in time.
///
/// A `Deferred` starts out pending and settles exactly once, either
/// resolved with a value or rejected with an `Error`. Once settled it
/// never changes. Clones share the same cell, so any number of
/// suspension points may await it and all of them observe the same
/// result. The operation that produced the value is never re-run.
///
/// Deferred values are created by the event loop handle (see
/// `Handle::delay`) or settled by hand with `resolve` and `reject`.
///
/// # Examples
/// ```
/// use std::rc::Rc;
/// use std::time::Duration;
/// use sequencer::runtime::{EventLoop, ManualClock};
///
/// let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
/// let handle     = event_loop.handle();
/// let hello      = handle.delay(Duration::from_secs(1), "hello");
///
/// let result = event_loop.block_on(async move { hello.wait().await });
/// assert_eq!(result.unwrap(), "hello");
/// ```
pub struct Deferred<T> {
  state: Rc<RefCell<State<T>>>
}

impl<T> Clone for Deferred<T> {
  fn clone(&self) -> Self {
    Deferred { state: self.state.clone() }
  }
}

impl<T> Default for Deferred<T> {
  fn default() -> Self {
    Deferred::new()
  }
}

impl<T> Deferred<T> {
  /// Creates a pending deferred value.
  pub fn new() -> Deferred<T> {
    Deferred { state: Rc::new(RefCell::new(State::Pending(Vec::new()))) }
  }

  /// Creates a deferred value that is already resolved.
  pub fn resolved(value: T) -> Deferred<T> {
    Deferred { state: Rc::new(RefCell::new(State::Settled(Ok(value)))) }
  }

  /// Creates a deferred value that is already rejected.
  pub fn rejected(error: Error) -> Deferred<T> {
    Deferred { state: Rc::new(RefCell::new(State::Settled(Err(error)))) }
  }

  /// Resolves this value. Returns false if it had already settled,
  /// in which case `value` is dropped.
  pub fn resolve(&self, value: T) -> bool {
    self.settle(Ok(value))
  }

  /// Rejects this value. Returns false if it had already settled.
  pub fn reject(&self, error: Error) -> bool {
    self.settle(Err(error))
  }

  /// Settles with the given result, waking every waiting task.
  pub fn settle(&self, result: Result<T>) -> bool {
    let wakers = {
      let mut state = self.state.borrow_mut();
      match &mut *state {
        State::Settled(_)      => return false,
        State::Pending(wakers) => mem::take(wakers)
      }
    };
    *self.state.borrow_mut() = State::Settled(result);
    for waker in wakers {
      waker.wake();
    }
    true
  }

  pub fn is_settled(&self) -> bool {
    matches!(*self.state.borrow(), State::Settled(_))
  }
}

impl<T: Clone> Deferred<T> {
  /// Returns a copy of the settled result, or None while pending.
  pub fn settled(&self) -> Option<Result<T>> {
    match &*self.state.borrow() {
      State::Settled(result) => Some(result.clone()),
      State::Pending(_)      => None
    }
  }

  /// Returns a future that completes with this value's result.
  ///
  /// The future always yields to the scheduler at least once, even
  /// when the value has already settled, so code following an await
  /// never runs in the same turn as the code preceding it.
  pub fn wait(&self) -> Wait<T> {
    Wait { deferred: self.clone(), yielded: false }
  }
}

impl<T: Clone> IntoFuture for Deferred<T> {
  type Output     = Result<T>;
  type IntoFuture = Wait<T>;

  fn into_future(self) -> Wait<T> {
    Wait { deferred: self, yielded: false }
  }
}

//---------------------------------------------------------
// Wait<T>
//---------------------------------------------------------

/// Future returned by `Deferred::wait`.
pub struct Wait<T> {
  deferred: Deferred<T>,
  yielded:  bool
}

impl<T: Clone> Future for Wait<T> {
  type Output = Result<T>;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<T>> {
    let first = !self.yielded;
    self.yielded = true;
    let mut state = self.deferred.state.borrow_mut();
    match &mut *state {
      State::Settled(result) if !first => Poll::Ready(result.clone()),
      State::Settled(_) => {
        cx.waker().wake_by_ref();
        Poll::Pending
      }
      State::Pending(wakers) => {
        if !wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
          wakers.push(cx.waker().clone());
        }
        Poll::Pending
      }
    }
  }
}
