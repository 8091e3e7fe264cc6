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

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised by deferred values, the event loop and the sequencer.
///
/// Errors are cloneable so a settled `Deferred` can hand the same
/// failure to every suspension point that awaits it.
#[derive(Debug, Clone, Error)]
pub enum Error {
  /// The operation behind a deferred value failed.
  #[error("deferred operation failed: {reason}")]
  Failed { reason: String },

  /// The event loop ran out of work before a required value settled.
  #[error("event loop went idle before the deferred value settled")]
  Unsettled,

  /// An environment override could not be parsed.
  #[error("invalid value {value:?} for {key}")]
  Config { key: &'static str, value: String },

  /// Writing a line of output failed.
  #[error("failed to write output: {0}")]
  Io(Arc<io::Error>),
}

impl Error {
  pub fn failed<S: Into<String>>(reason: S) -> Error {
    Error::Failed { reason: reason.into() }
  }
}

impl From<io::Error> for Error {
  fn from(error: io::Error) -> Error {
    Error::Io(Arc::new(error))
  }
}

pub type Result<T> = std::result::Result<T, Error>;
