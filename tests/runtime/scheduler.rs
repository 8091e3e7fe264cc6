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
use std::rc::Rc;
use std::time::Duration;

use sequencer::runtime::{Clock, EventLoop, ManualClock, SystemClock};

#[test]
fn equal_deadlines_fire_in_registration_order() {
  let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
  let handle = event_loop.handle();
  let fired  = Rc::new(RefCell::new(Vec::new()));
  for n in 0..5 {
    let log = fired.clone();
    handle.set_timeout(Duration::from_secs(1), move || log.borrow_mut().push(n));
  }
  event_loop.run();
  assert_eq!(*fired.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn woken_tasks_run_before_next_timer() {
  let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
  let handle = event_loop.handle();
  let order  = Rc::new(RefCell::new(Vec::new()));

  let value = handle.delay(Duration::from_secs(1), ());
  let log   = order.clone();
  handle.invoke(async move {
    value.await?;
    log.borrow_mut().push("task");
    Ok(())
  });
  let log = order.clone();
  handle.set_timeout(Duration::from_secs(1), move || log.borrow_mut().push("timer"));

  event_loop.run();
  assert_eq!(*order.borrow(), vec!["task", "timer"]);
}

#[test]
fn timers_registered_by_callbacks_are_relative_to_firing_time() {
  let clock      = ManualClock::new();
  let event_loop = EventLoop::new(Rc::new(clock.clone()));
  let handle     = event_loop.handle();
  let fired      = Rc::new(RefCell::new(Vec::new()));

  let inner = handle.clone();
  let log   = fired.clone();
  handle.set_timeout(Duration::from_secs(2), move || {
    let log = log.clone();
    let at  = inner.clone();
    inner.set_timeout(Duration::from_secs(3), move || log.borrow_mut().push(at.now()));
  });
  event_loop.run();
  assert_eq!(*fired.borrow(), vec![Duration::from_secs(5)]);
  assert_eq!(clock.elapsed(), Duration::from_secs(5));
}

#[test]
fn invoke_runs_to_first_suspension() {
  let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
  let handle = event_loop.handle();
  let order  = Rc::new(RefCell::new(Vec::new()));
  let value  = handle.delay(Duration::ZERO, ());
  let log    = order.clone();
  handle.invoke(async move {
    log.borrow_mut().push("start");
    value.await?;
    log.borrow_mut().push("resumed");
    Ok(())
  });
  order.borrow_mut().push("returned");
  event_loop.run();
  assert_eq!(*order.borrow(), vec!["start", "returned", "resumed"]);
}

#[test]
fn system_clock_waits_for_real() {
  let clock      = Rc::new(SystemClock::new());
  let event_loop = EventLoop::new(clock.clone());
  let handle     = event_loop.handle();
  let value      = handle.delay(Duration::from_millis(30), "late");
  assert_eq!(event_loop.block_on(async move { value.await }).unwrap(), "late");
  assert!(clock.elapsed() >= Duration::from_millis(30));
}
