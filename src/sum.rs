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

use std::ops::Add;

use crate::config::Config;
use crate::runtime::{Deferred, Handle};

/// Adds `a` and `b`, delivering the sum after two time units of the
/// global configuration.
///
/// # Examples
/// ```
/// use std::rc::Rc;
/// use sequencer::runtime::{EventLoop, ManualClock};
///
/// let event_loop = EventLoop::new(Rc::new(ManualClock::new()));
/// let sum        = sequencer::sum(&event_loop.handle(), 3, 4);
/// event_loop.run();
/// assert_eq!(sum.settled().unwrap().unwrap(), 7);
/// ```
pub fn sum<T>(handle: &Handle, a: T, b: T) -> Deferred<T>
  where T: Add<Output = T> + 'static {
  sum_with(handle, Config::global(), a, b)
}

/// As `sum`, with the delay taken from `config`.
pub fn sum_with<T>(handle: &Handle, config: &Config, a: T, b: T) -> Deferred<T>
  where T: Add<Output = T> + 'static {
  handle.delay_with(config.units(config.sum_delay), move || Ok(a + b))
}
