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

use std::env;
use std::time::Duration;

use lazy_static::lazy_static;
use tracing::warn;

use crate::error::{Error, Result};

/// Environment variable overriding the time unit, in milliseconds.
pub const TIME_UNIT_VAR: &str = "SEQUENCER_TIME_UNIT_MS";

lazy_static! {
  /// The process-wide configuration, read from the environment the
  /// first time it is requested.
  static ref GLOBAL_CONFIG: Config = {
    Config::from_env().unwrap_or_else(|error| {
      warn!(%error, "ignoring environment overrides");
      Config::default()
    })
  };
}

/// Timing and payload of a sequencer run. Delays are counted in
/// time units so the whole run can be scaled at once.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
  pub time_unit    : Duration,
  pub first_delay  : u32,
  pub second_delay : u32,
  pub sum_delay    : u32,
  pub payload      : String
}

impl Default for Config {
  fn default() -> Config {
    Config {
      time_unit    : Duration::from_secs(1),
      first_delay  : 10,
      second_delay : 5,
      sum_delay    : 2,
      payload      : "Resolved Value!!".to_string()
    }
  }
}

impl Config {
  /// The shared configuration used by helpers that take none.
  pub fn global() -> &'static Config {
    &GLOBAL_CONFIG
  }

  /// Defaults with any environment overrides applied.
  pub fn from_env() -> Result<Config> {
    Config::from_lookup(|key| env::var(key).ok())
  }

  /// Defaults with overrides taken from `lookup`.
  pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where F: Fn(&str) -> Option<String> {
    let mut config = Config::default();
    if let Some(value) = lookup(TIME_UNIT_VAR) {
      let millis = value.trim().parse::<u64>().map_err(|_| Error::Config {
        key   : TIME_UNIT_VAR,
        value : value.clone()
      })?;
      config.time_unit = Duration::from_millis(millis);
    }
    Ok(config)
  }

  /// Converts a count of time units into a duration.
  pub fn units(&self, count: u32) -> Duration {
    self.time_unit * count
  }
}
