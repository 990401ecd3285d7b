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

//! Buffered, file-backed line logger.
//!
//! A [`Logger`] collects `[name] [timestamp] [tag] message` lines in memory
//! and writes them to `<directory>/<name>.txt` in batches, optionally
//! mirroring every line to a console or other echo sink as it is appended.

pub mod config;
pub mod constants;
pub mod level;
pub mod line;
pub mod logger;
pub mod timestamp;
pub mod value;

#[cfg(test)]
mod testutil;

pub use config::{LoggerConfig, default_log_dir};
pub use level::Level;
pub use line::LineBuilder;
pub use logger::{Logger, LoggerBuilder, LoggerState};
pub use value::Value;
