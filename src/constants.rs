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

/// Buffer capacity used when none is requested.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Smallest buffer capacity a logger accepts; smaller requests are clamped up.
pub const MIN_BUFFER_SIZE: usize = 500;

/// Headroom kept between the flush threshold and the buffer capacity.
pub const FLUSH_MARGIN: usize = 200;

/// Rendered in place of values the formatter does not know how to print.
pub const UNSUPPORTED_PLACEHOLDER: &str = "<UNSUPPORTED TYPE>";

pub const LOG_FILE_EXTENSION: &str = "txt";

pub const LINE_TERMINATOR: u8 = b'\n';

/// Flush threshold for an (already clamped) buffer capacity.
pub fn flush_threshold_for(buffer_size: usize) -> usize {
    buffer_size.saturating_sub(FLUSH_MARGIN)
}
