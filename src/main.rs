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

use std::process::ExitCode;
use std::rc::Rc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use sequencer::runtime::SystemClock;
use sequencer::{Config, Console, Result, Sequencer};

fn run() -> Result<()> {
  let config    = Config::from_env()?;
  let sequencer = Sequencer::new(config, Rc::new(SystemClock::new()), Rc::new(Console));
  sequencer.run()
}

fn main() -> ExitCode {
  // stdout carries the sequence itself, diagnostics go to stderr.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(failure) => {
      error!(%failure, "unhandled failure");
      ExitCode::FAILURE
    }
  }
}
