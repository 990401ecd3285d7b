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

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_BUFFER_SIZE, LOG_FILE_EXTENSION};

/// Working directory of the process, captured the first time it is needed.
static DEFAULT_LOG_DIR: Lazy<PathBuf> =
    Lazy::new(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

/// Directory new configs write into unless told otherwise.
pub fn default_log_dir() -> &'static Path {
    DEFAULT_LOG_DIR.as_path()
}

/// Settings a [`crate::Logger`] is constructed from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggerConfig {
    /// Logical name, used as the line prefix and the file stem
    pub name: String,

    /// Directory holding `<name>.txt`
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Append to an existing file instead of truncating it
    #[serde(default)]
    pub append: bool,

    /// Requested buffer capacity in bytes (clamped to the minimum on open)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Mirror every line to the echo sink (stdout unless replaced)
    #[serde(default)]
    pub echo: bool,
}

fn default_directory() -> PathBuf {
    default_log_dir().to_path_buf()
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: default_directory(),
            append: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            echo: false,
        }
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read logger config: {}", path.display()))?;

        let config: LoggerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse logger config: {}", path.display()))?;

        Ok(config)
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Full path of the backing file, `<directory>/<name>.txt`
    pub fn file_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.name, LOG_FILE_EXTENSION))
    }
}
