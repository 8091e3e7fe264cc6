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

use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::future::Future;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, trace};

use super::clock::Clock;
use super::deferred::Deferred;
use super::task::LocalTask;
use crate::error::{Error, Result};

pub type TaskId = usize;

//---------------------------------------------------------
// Timer
//---------------------------------------------------------
struct Timer {
  deadline : Duration,
  sequence : u64,
  callback : Box<dyn FnOnce()>
}
impl Timer {
  fn key(&self) -> (Duration, u64) {
    (self.deadline, self.sequence)
  }
}
impl PartialEq for Timer {
  fn eq(&self, other: &Timer) -> bool {
    self.key() == other.key()
  }
}
impl Eq for Timer {}
impl PartialOrd for Timer {
  fn partial_cmp(&self, other: &Timer) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}
impl Ord for Timer {
  fn cmp(&self, other: &Timer) -> Ordering {
    self.key().cmp(&other.key())
  }
}

//---------------------------------------------------------
// Inner
//---------------------------------------------------------
pub(crate) struct Inner {
  pub(crate) clock : Rc<dyn Clock>,
  pub(crate) tasks : RefCell<HashMap<TaskId, LocalTask>>,
  pub(crate) ready : Arc<Mutex<VecDeque<TaskId>>>,
  timers           : RefCell<BinaryHeap<Reverse<Timer>>>,
  next_task        : Cell<TaskId>,
  next_timer       : Cell<u64>
}
impl Inner {
  pub(crate) fn next_task_id(&self) -> TaskId {
    let id = self.next_task.get();
    self.next_task.set(id + 1);
    id
  }

  fn pop_ready(&self) -> Option<TaskId> {
    self.ready.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
  }
}

//---------------------------------------------------------
// Handle
//---------------------------------------------------------

/// A cloneable reference to an event loop, used to start timers and
/// invoke tasks. Handles are captured by the futures running on the
/// loop and so are neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Handle {
  pub(crate) inner: Rc<Inner>
}
impl Handle {
  /// Time elapsed on the loop's clock.
  pub fn now(&self) -> Duration {
    self.inner.clock.elapsed()
  }

  /// Runs `callback` on the loop once `delay` has elapsed, measured
  /// from now. Callbacks sharing a deadline run in the order they
  /// were registered.
  pub fn set_timeout<F>(&self, delay: Duration, callback: F)
    where F: FnOnce() + 'static {
    let sequence = self.inner.next_timer.get();
    self.inner.next_timer.set(sequence + 1);
    let deadline = self.now() + delay;
    trace!(timer = sequence, ?deadline, "timer registered");
    self.inner.timers.borrow_mut().push(Reverse(Timer {
      deadline : deadline,
      sequence : sequence,
      callback : Box::new(callback)
    }));
  }

  /// Creates a deferred value resolving to `value` after `delay`.
  /// The timer starts now, not when the value is first awaited.
  pub fn delay<T>(&self, delay: Duration, value: T) -> Deferred<T>
    where T: 'static {
    self.delay_with(delay, move || Ok(value))
  }

  /// Creates a deferred value settled by running `operation` once
  /// `delay` has elapsed. The operation runs exactly once.
  pub fn delay_with<T, F>(&self, delay: Duration, operation: F) -> Deferred<T>
    where T: 'static,
          F: FnOnce() -> Result<T> + 'static {
    let deferred = Deferred::new();
    let settle   = deferred.clone();
    self.set_timeout(delay, move || {
      settle.settle(operation());
    });
    deferred
  }

  fn pending_deadline(&self) -> Option<Duration> {
    self.inner.timers.borrow().peek().map(|Reverse(timer)| timer.deadline)
  }

  fn pop_timer(&self) -> Option<Timer> {
    self.inner.timers.borrow_mut().pop().map(|Reverse(timer)| timer)
  }

  /// Polls every ready task until none remain ready.
  fn drain_ready(&self) {
    while let Some(id) = self.inner.pop_ready() {
      let task = self.inner.tasks.borrow_mut().remove(&id);
      if let Some(task) = task {
        self.poll_task(id, task);
      }
    }
  }
}

//---------------------------------------------------------
// EventLoop
//---------------------------------------------------------

/// A single-threaded cooperative scheduler.
///
/// Work is either a task that has been woken or a timer that has
/// come due. The loop polls woken tasks first. When none are left it
/// sleeps until the earliest timer, fires it, and drains the woken
/// tasks again before looking at the next timer. It returns once no
/// task is ready and no timer is pending.
///
/// # Examples
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use sequencer::runtime::{EventLoop, ManualClock};
///
/// let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
/// let handle     = event_loop.handle();
/// let fired      = Rc::new(RefCell::new(Vec::new()));
///
/// let log = fired.clone();
/// handle.set_timeout(Duration::from_secs(2), move || log.borrow_mut().push("two"));
/// let log = fired.clone();
/// handle.set_timeout(Duration::from_secs(1), move || log.borrow_mut().push("one"));
///
/// event_loop.run();
/// assert_eq!(*fired.borrow(), vec!["one", "two"]);
/// ```
pub struct EventLoop {
  handle: Handle
}
impl EventLoop {
  pub fn new(clock: Rc<dyn Clock>) -> EventLoop {
    EventLoop {
      handle: Handle {
        inner: Rc::new(Inner {
          clock      : clock,
          tasks      : RefCell::new(HashMap::new()),
          ready      : Arc::new(Mutex::new(VecDeque::new())),
          timers     : RefCell::new(BinaryHeap::new()),
          next_task  : Cell::new(0),
          next_timer : Cell::new(0)
        })
      }
    }
  }

  pub fn handle(&self) -> Handle {
    self.handle.clone()
  }

  /// Runs the loop until it goes idle.
  pub fn run(&self) {
    let handle = &self.handle;
    loop {
      handle.drain_ready();
      let deadline = match handle.pending_deadline() {
        Some(deadline) => deadline,
        None           => break
      };
      handle.inner.clock.sleep_until(deadline);
      if let Some(timer) = handle.pop_timer() {
        trace!(timer = timer.sequence, now = ?handle.now(), "timer fired");
        (timer.callback)();
      }
    }
    self.abandon_suspended();
  }

  /// Invokes `future` as a task, runs the loop until idle and returns
  /// the task's result. Fails with `Error::Unsettled` if the task was
  /// still suspended when the loop went idle.
  pub fn block_on<T, F>(&self, future: F) -> Result<T>
    where T: Clone + 'static,
          F: Future<Output = Result<T>> + 'static {
    let completion = self.handle.invoke(future);
    self.run();
    completion.settled().unwrap_or(Err(Error::Unsettled))
  }

  // Tasks still suspended at idle can never be woken again. Dropping
  // them also breaks the cycle between tasks and the handles they hold.
  fn abandon_suspended(&self) {
    let abandoned: Vec<_> = self.handle.inner.tasks.borrow_mut().drain().collect();
    if !abandoned.is_empty() {
      debug!(tasks = abandoned.len(), "event loop idle with suspended tasks");
    }
    drop(abandoned);
  }
}
impl Drop for EventLoop {
  fn drop(&mut self) {
    self.abandon_suspended();
  }
}
