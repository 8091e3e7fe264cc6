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
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;
use crate::runtime::Clock;

/// An append-only sink for lines of output. Lines appear in the
/// order they are written.
pub trait Output {
  fn line(&self, line: &str) -> Result<()>;
}

//---------------------------------------------------------
// Console
//---------------------------------------------------------

/// Writes each line to standard output and flushes it.
pub struct Console;
impl Output for Console {
  fn line(&self, line: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
  }
}

//---------------------------------------------------------
// Transcript
//---------------------------------------------------------

/// A line recorded by a `Transcript` with the clock time it was
/// written at.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
  pub at   : Duration,
  pub line : String
}

/// Records lines in memory, stamped with the time on `clock`.
#[derive(Clone)]
pub struct Transcript {
  clock   : Rc<dyn Clock>,
  entries : Rc<RefCell<Vec<Entry>>>
}
impl Transcript {
  pub fn new(clock: Rc<dyn Clock>) -> Transcript {
    Transcript {
      clock   : clock,
      entries : Rc::new(RefCell::new(Vec::new()))
    }
  }

  pub fn entries(&self) -> Vec<Entry> {
    self.entries.borrow().clone()
  }

  pub fn lines(&self) -> Vec<String> {
    self.entries.borrow().iter().map(|entry| entry.line.clone()).collect()
  }

  /// Index of the first line equal to `line`.
  pub fn position(&self, line: &str) -> Option<usize> {
    self.entries.borrow().iter().position(|entry| entry.line == line)
  }
}
impl Output for Transcript {
  fn line(&self, line: &str) -> Result<()> {
    self.entries.borrow_mut().push(Entry {
      at   : self.clock.elapsed(),
      line : line.to_string()
    });
    Ok(())
  }
}
