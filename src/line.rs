// Copyright (c) 2025 Sean McNamara <smcnam@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Incremental construction of a single log line.

use std::fmt;

use crate::constants::UNSUPPORTED_PLACEHOLDER;
use crate::logger::Logger;
use crate::value::Value;

/// Guard for a line being built piece by piece.
///
/// The `[name] [timestamp] ` prefix is written when the builder is created
/// and the line terminator when it is dropped, so the line is closed exactly
/// once on every exit path, including `?` returns and unwinding.
///
/// ```no_run
/// use linelog::{Logger, LoggerConfig};
/// use std::fmt::Write;
///
/// let mut logger = Logger::open(LoggerConfig::new("svc"));
/// logger.line().push("retries=").push(3);
/// let _ = write!(logger.line(), "took {}ms", 12);
/// ```
pub struct LineBuilder<'a> {
    logger: &'a mut Logger,
    start: usize,
}

impl<'a> LineBuilder<'a> {
    pub(crate) fn new(logger: &'a mut Logger, start: usize) -> Self {
        Self { logger, start }
    }

    /// Append a value and hand the builder back for chaining.
    pub fn push<'v>(mut self, value: impl Into<Value<'v>>) -> Self {
        self.append(value);
        self
    }

    pub fn append<'v>(&mut self, value: impl Into<Value<'v>>) -> &mut Self {
        let value = value.into();
        self.logger.append_str(&value.render());
        self
    }

    /// Append `format_args!` output. If a `Display` impl fails, whatever it
    /// wrote is dropped and the placeholder takes its place.
    pub fn append_args(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        let mark = self.logger.buffer().len();
        if fmt::Write::write_fmt(self, args).is_err() {
            self.logger.truncate_buffer(mark);
            self.logger.append_str(UNSUPPORTED_PLACEHOLDER);
        }
        self
    }

    pub fn push_str(&mut self, s: &str) -> &mut Self {
        self.logger.append_str(s);
        self
    }

    /// End the line now rather than at the end of the enclosing scope.
    pub fn finish(self) {}
}

impl fmt::Write for LineBuilder<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.logger.append_str(s);
        Ok(())
    }
}

impl Drop for LineBuilder<'_> {
    fn drop(&mut self) {
        self.logger.end_line(self.start);
    }
}
