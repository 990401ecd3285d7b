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

//! Timestamp rendering for log lines.

use chrono::{Local, NaiveDateTime};

/// Source of the wall-clock time stamped onto each line.
pub type Clock = fn() -> NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "[%Y/%m/%d %H:%M:%S]";

/// Current local time, the default [`Clock`].
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Render `time` as a fixed-width `[YYYY/MM/DD HH:MM:SS]` stamp.
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Stamp for the current local time.
pub fn now() -> String {
    format_timestamp(&local_now())
}
