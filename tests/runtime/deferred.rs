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
use std::rc::Rc;
use std::time::Duration;

use sequencer::runtime::{Clock, Deferred, EventLoop, ManualClock};
use sequencer::Error;

fn event_loop() -> (EventLoop, ManualClock) {
  let clock = ManualClock::new();
  (EventLoop::new(Rc::new(clock.clone())), clock)
}

#[test]
fn delay_resolves_at_deadline() {
  let (event_loop, clock) = event_loop();
  let handle   = event_loop.handle();
  let deferred = handle.delay(Duration::from_secs(10), "hello");
  let observer = handle.clone();
  let result   = event_loop.block_on(async move {
    let value = deferred.wait().await?;
    Ok((value, observer.now()))
  });
  assert_eq!(result.unwrap(), ("hello", Duration::from_secs(10)));
  assert_eq!(clock.elapsed(), Duration::from_secs(10));
}

#[test]
fn timer_starts_at_construction() {
  let (event_loop, _) = event_loop();
  let handle   = event_loop.handle();
  let slow     = handle.delay(Duration::from_secs(10), 1);
  let fast     = handle.delay(Duration::from_secs(5), 2);
  let observer = handle.clone();
  let result   = event_loop.block_on(async move {
    let a = slow.await?;
    let after_slow = observer.now();
    let b = fast.await?;
    Ok((a + b, after_slow, observer.now()))
  });
  assert_eq!(result.unwrap(), (3, Duration::from_secs(10), Duration::from_secs(10)));
}

#[test]
fn operation_runs_once_for_many_waiters() {
  let (event_loop, _) = event_loop();
  let handle = event_loop.handle();
  let runs   = Rc::new(Cell::new(0));
  let count  = runs.clone();
  let deferred = handle.delay_with(Duration::from_secs(1), move || {
    count.set(count.get() + 1);
    Ok(String::from("once"))
  });
  let result = event_loop.block_on(async move {
    let a = deferred.wait().await?;
    let b = deferred.wait().await?;
    let c = deferred.clone().await?;
    Ok(vec![a, b, c])
  });
  assert_eq!(result.unwrap(), vec!["once", "once", "once"]);
  assert_eq!(runs.get(), 1);
}

#[test]
fn concurrent_waiters_observe_same_value() {
  let (event_loop, _) = event_loop();
  let handle   = event_loop.handle();
  let deferred = handle.delay(Duration::from_secs(2), 99);
  let first    = handle.invoke({ let d = deferred.clone(); async move { d.wait().await } });
  let second   = handle.invoke({ let d = deferred.clone(); async move { d.wait().await } });
  event_loop.run();
  assert_eq!(first.settled().unwrap().unwrap(), 99);
  assert_eq!(second.settled().unwrap().unwrap(), 99);
}

#[test]
fn await_on_settled_value_still_yields() {
  let (event_loop, _) = event_loop();
  let handle = event_loop.handle();
  let order  = Rc::new(RefCell::new(Vec::new()));
  let log    = order.clone();
  let completion = handle.invoke(async move {
    log.borrow_mut().push("before");
    let value = Deferred::resolved(5).await?;
    log.borrow_mut().push("after");
    Ok(value)
  });
  order.borrow_mut().push("caller");
  assert!(!completion.is_settled());
  event_loop.run();
  assert_eq!(*order.borrow(), vec!["before", "caller", "after"]);
  assert_eq!(completion.settled().unwrap().unwrap(), 5);
}

#[test]
fn rejection_propagates_and_stops_procedure() {
  let (event_loop, _) = event_loop();
  let handle  = event_loop.handle();
  let failing = handle.delay_with(Duration::from_secs(1), || Err::<u32, _>(Error::failed("broken")));
  let later   = handle.delay(Duration::from_secs(2), 1u32);
  let reached = Rc::new(Cell::new(false));
  let flag    = reached.clone();
  let result  = event_loop.block_on(async move {
    let a = failing.await?;
    flag.set(true);
    let b = later.await?;
    Ok(a + b)
  });
  match result {
    Err(Error::Failed { reason }) => assert_eq!(reason, "broken"),
    other => panic!("unexpected {:?}", other)
  }
  assert!(!reached.get());
}

#[test]
fn never_settled_is_reported() {
  let (event_loop, _) = event_loop();
  let pending = Deferred::<u8>::new();
  let result  = event_loop.block_on(async move { pending.wait().await });
  assert!(matches!(result, Err(Error::Unsettled)));
}
