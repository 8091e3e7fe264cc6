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

//! Awaits two independently timed deferred values in a fixed order.
//!
//! Both values are created up front so both timers run from the same
//! instant. The first takes longer than the second, so by the time
//! the procedure reaches its second suspension point the second value
//! has already settled and the await costs no further time.

use std::rc::Rc;

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::Output;
use crate::runtime::{Clock, Deferred, EventLoop};

pub const STARTING           : &str = "🚀 Starting async function: handlePromise()";
pub const BEFORE_FIRST_WAIT  : &str = "👉 Logging immediately before awaiting the Promise for the first time.";
pub const CALLER_RETURNED    : &str = "👋 This log appears immediately after calling handlePromise() but before the first await is resolved.";
pub const FIRST_COMPLETED    : &str = "✅ First await completed. Promise has been resolved.";
pub const FIRST_VALUE        : &str = "🔁 Logging the first resolved value:";
pub const BEFORE_SECOND_WAIT : &str = "🧠 Awaiting the second Promise (`p2`) — this should have a shorter delay.";
pub const SECOND_COMPLETED   : &str = "✅ Second await completed. Promise has been resolved.";
pub const SECOND_VALUE       : &str = "🔁 Logging the second resolved value:";

/// The line reporting the value of the `index`th deferred value.
pub fn value_line(index: usize, value: &str) -> String {
  format!("promise {} time → {}", index, value)
}

/// Runs the two-value sequence against a clock and an output.
///
/// # Examples
/// ```
/// use std::rc::Rc;
/// use sequencer::{Config, Sequencer, Transcript};
/// use sequencer::runtime::{Clock, ManualClock};
///
/// let clock: Rc<dyn Clock> = Rc::new(ManualClock::new());
/// let transcript = Transcript::new(clock.clone());
/// let sequencer  = Sequencer::new(Config::default(), clock, Rc::new(transcript.clone()));
///
/// sequencer.run().unwrap();
/// assert_eq!(transcript.lines().len(), 10);
/// ```
pub struct Sequencer {
  config  : Config,
  clock   : Rc<dyn Clock>,
  output  : Rc<dyn Output>,
  failure : Option<String>
}

impl Sequencer {
  pub fn new(config: Config, clock: Rc<dyn Clock>, output: Rc<dyn Output>) -> Sequencer {
    Sequencer {
      config  : config,
      clock   : clock,
      output  : output,
      failure : None
    }
  }

  /// Makes the first deferred value fail with `reason` when its timer
  /// fires, instead of resolving.
  pub fn with_failure<S: Into<String>>(mut self, reason: S) -> Sequencer {
    self.failure = Some(reason.into());
    self
  }

  /// Creates both deferred values, invokes the consuming procedure,
  /// reports that the invocation returned, then drives the event loop
  /// until no work remains.
  ///
  /// A failure of either deferred value stops the procedure at the
  /// suspension point awaiting it and is returned here.
  pub fn run(&self) -> Result<()> {
    let event_loop = EventLoop::new(self.clock.clone());
    let handle     = event_loop.handle();
    let config     = &self.config;

    let first_delay = config.units(config.first_delay);
    let p1 = match &self.failure {
      None => handle.delay(first_delay, config.payload.clone()),
      Some(reason) => {
        let reason = reason.clone();
        handle.delay_with(first_delay, move || Err(Error::failed(reason)))
      }
    };
    let p2 = handle.delay(config.units(config.second_delay), config.payload.clone());
    debug!(first = ?first_delay, second = ?config.units(config.second_delay), "deferred values created");

    let completion = handle.invoke(consume(p1, p2, self.output.clone()));
    self.output.line(CALLER_RETURNED)?;

    event_loop.run();
    completion.settled().unwrap_or(Err(Error::Unsettled))
  }
}

// The consuming procedure. Suspends on `p1`, then on `p2`.
async fn consume(p1: Deferred<String>, p2: Deferred<String>, output: Rc<dyn Output>) -> Result<()> {
  output.line(STARTING)?;
  output.line(BEFORE_FIRST_WAIT)?;

  let val1 = p1.wait().await?;
  output.line(FIRST_COMPLETED)?;
  output.line(FIRST_VALUE)?;
  output.line(&value_line(1, &val1))?;

  output.line(BEFORE_SECOND_WAIT)?;
  let val2 = p2.wait().await?;
  output.line(SECOND_COMPLETED)?;
  output.line(SECOND_VALUE)?;
  output.line(&value_line(2, &val2))?;
  Ok(())
}
