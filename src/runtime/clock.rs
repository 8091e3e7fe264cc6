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

//! Time sources for the event loop.
//!
//! The loop never reads the system time directly. It asks a `Clock`
//! how long it has been running and asks it to sleep until the next
//! timer deadline. `SystemClock` does this for real, `ManualClock`
//! keeps virtual time and returns from sleeps instantly.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

/// A monotonic time source measured from its own origin.
pub trait Clock {
  /// Time elapsed since the clock was created.
  fn elapsed(&self) -> Duration;

  /// Blocks until `elapsed()` has reached `deadline`. Returns
  /// immediately for deadlines already in the past.
  fn sleep_until(&self, deadline: Duration);
}

//---------------------------------------------------------
// SystemClock
//---------------------------------------------------------
pub struct SystemClock {
  origin: Instant
}
impl SystemClock {
  pub fn new() -> SystemClock {
    SystemClock { origin: Instant::now() }
  }
}
impl Default for SystemClock {
  fn default() -> SystemClock {
    SystemClock::new()
  }
}
impl Clock for SystemClock {
  fn elapsed(&self) -> Duration {
    self.origin.elapsed()
  }

  fn sleep_until(&self, deadline: Duration) {
    let now = self.elapsed();
    if deadline > now {
      thread::sleep(deadline - now);
    }
  }
}

//---------------------------------------------------------
// ManualClock
//---------------------------------------------------------

/// Virtual time. Clones share the same instant, so a test can keep
/// one copy while the event loop owns another.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sequencer::runtime::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// clock.sleep_until(Duration::from_secs(10));
/// assert_eq!(clock.elapsed(), Duration::from_secs(10));
/// ```
#[derive(Clone, Default)]
pub struct ManualClock {
  now: Rc<Cell<Duration>>
}
impl ManualClock {
  pub fn new() -> ManualClock {
    ManualClock::default()
  }

  /// Moves virtual time forward.
  pub fn advance(&self, by: Duration) {
    self.now.set(self.now.get() + by);
  }
}
impl Clock for ManualClock {
  fn elapsed(&self) -> Duration {
    self.now.get()
  }

  fn sleep_until(&self, deadline: Duration) {
    if deadline > self.now.get() {
      self.now.set(deadline);
    }
  }
}
