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

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::collections::VecDeque;
use std::task::{Context, Poll, Wake, Waker};

use tracing::trace;

use super::deferred::Deferred;
use super::scheduler::{Handle, TaskId};
use crate::error::Result;

pub(crate) type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

//---------------------------------------------------------
// TaskWaker
//---------------------------------------------------------

// Wakers must be Send + Sync, so only the task id crosses into the
// waker. The task itself stays in the loop's task table.
struct TaskWaker {
  id    : TaskId,
  ready : Arc<Mutex<VecDeque<TaskId>>>
}
impl Wake for TaskWaker {
  fn wake(self: Arc<Self>) {
    self.wake_by_ref();
  }

  fn wake_by_ref(self: &Arc<Self>) {
    let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
    if !ready.contains(&self.id) {
      ready.push_back(self.id);
    }
  }
}

impl Handle {
  /// Invokes `future` as a task on this loop.
  ///
  /// The task is polled once before this returns, so it runs
  /// synchronously up to its first suspension point. The returned
  /// `Deferred` settles with the task's result when it completes. A
  /// failure raised inside the task surfaces there and nowhere else.
  ///
  /// # Examples
  /// ```
  /// use std::rc::Rc;
  /// use sequencer::runtime::{EventLoop, ManualClock};
  ///
  /// let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
  /// let handle     = event_loop.handle();
  /// let completion = handle.invoke(async { Ok(42) });
  /// event_loop.run();
  /// assert_eq!(completion.settled().unwrap().unwrap(), 42);
  /// ```
  pub fn invoke<T, F>(&self, future: F) -> Deferred<T>
    where T: 'static,
          F: Future<Output = Result<T>> + 'static {
    let completion = Deferred::new();
    let settle     = completion.clone();
    let task: LocalTask = Box::pin(async move {
      settle.settle(future.await);
    });
    let id = self.inner.next_task_id();
    trace!(task = id, "task invoked");
    self.poll_task(id, task);
    completion
  }

  /// Polls a task once, returning it to the task table if it is
  /// still suspended.
  pub(crate) fn poll_task(&self, id: TaskId, mut task: LocalTask) {
    let waker = Waker::from(Arc::new(TaskWaker {
      id    : id,
      ready : self.inner.ready.clone()
    }));
    let mut cx = Context::from_waker(&waker);
    match task.as_mut().poll(&mut cx) {
      Poll::Ready(()) => trace!(task = id, "task complete"),
      Poll::Pending   => {
        self.inner.tasks.borrow_mut().insert(id, task);
      }
    }
  }
}
