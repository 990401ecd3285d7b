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
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::LoggerConfig;
use crate::constants::{LINE_TERMINATOR, MIN_BUFFER_SIZE, flush_threshold_for};
use crate::level::Level;
use crate::line::LineBuilder;
use crate::timestamp::{Clock, format_timestamp, local_now};
use crate::value::Value;

/// Byte sink a logger writes into.
pub type Sink = Box<dyn Write + Send>;

/// Whether flushed bytes still reach the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// Backing file is usable.
    Open,
    /// The file could not be opened or a write to it failed. Lines are still
    /// buffered but every flush discards them.
    Degraded,
}

/// Buffered line logger for streaming timestamped lines into `<name>.txt`,
/// optionally echoing each line as it is written.
///
/// Lines accumulate in memory and are written to the file in one piece once
/// the buffer reaches its flush threshold, and again when the logger is
/// dropped. None of the logging calls return errors; I/O problems are
/// reported once on the diagnostics channel and the logger degrades to
/// memory-only operation.
///
/// A `Logger` is not synchronized. Share it across threads behind a `Mutex`.
pub struct Logger {
    config: LoggerConfig,
    buffer: Vec<u8>,
    buffer_size: usize,
    flush_threshold: usize,
    file: Option<Sink>,
    file_backed: bool,
    echo: Sink,
    echo_enabled: bool,
    diagnostics: Sink,
    clock: Clock,
}

/// Assembles a [`Logger`] with non-default collaborators.
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Sink>,
    echo: Option<Sink>,
    diagnostics: Option<Sink>,
    clock: Clock,
}

impl LoggerBuilder {
    /// Write flushed bytes here instead of opening `<name>.txt`.
    pub fn sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Target for mirrored lines (defaults to stdout).
    pub fn echo(mut self, echo: impl Write + Send + 'static) -> Self {
        self.echo = Some(Box::new(echo));
        self
    }

    /// Channel for the logger's own warnings (defaults to stderr).
    pub fn diagnostics(mut self, diagnostics: impl Write + Send + 'static) -> Self {
        self.diagnostics = Some(Box::new(diagnostics));
        self
    }

    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the logger. Never fails: an unopenable file leaves the logger
    /// in [`LoggerState::Degraded`].
    pub fn open(self) -> Logger {
        let mut diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Box::new(io::stderr()));
        let buffer_size =
            clamp_buffer_size(&self.config.name, self.config.buffer_size, &mut diagnostics);

        let file_backed = self.sink.is_none();
        let file = match self.sink {
            Some(sink) => Some(sink),
            None => open_backing_file(&self.config, self.config.append, &mut diagnostics),
        };

        Logger {
            echo_enabled: self.config.echo,
            config: self.config,
            buffer: Vec::with_capacity(buffer_size),
            buffer_size,
            flush_threshold: flush_threshold_for(buffer_size),
            file,
            file_backed,
            echo: self.echo.unwrap_or_else(|| Box::new(io::stdout())),
            diagnostics,
            clock: self.clock,
        }
    }
}

fn report(diagnostics: &mut Sink, message: &str) {
    let _ = writeln!(diagnostics, "{}", message);
    let _ = diagnostics.flush();
}

fn clamp_buffer_size(name: &str, requested: usize, diagnostics: &mut Sink) -> usize {
    if requested < MIN_BUFFER_SIZE {
        report(
            diagnostics,
            &format!(
                "Buffer size for logger {} cannot be lower than {}b",
                name, MIN_BUFFER_SIZE
            ),
        );
        MIN_BUFFER_SIZE
    } else {
        requested
    }
}

fn open_file(path: &Path, append: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

fn open_backing_file(config: &LoggerConfig, append: bool, diagnostics: &mut Sink) -> Option<Sink> {
    match open_file(&config.file_path(), append) {
        Ok(file) => Some(Box::new(file)),
        Err(err) => {
            report(diagnostics, &format!("! Logger \"{}\": {:#}", config.name, err));
            None
        }
    }
}

impl Logger {
    /// Open `<directory>/<name>.txt` with stdout echo and stderr diagnostics.
    pub fn open(config: LoggerConfig) -> Self {
        Self::builder(config).open()
    }

    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder {
            config,
            sink: None,
            echo: None,
            diagnostics: None,
            clock: local_now,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    pub fn file_path(&self) -> PathBuf {
        self.config.file_path()
    }

    pub fn state(&self) -> LoggerState {
        if self.file.is_some() {
            LoggerState::Open
        } else {
            LoggerState::Degraded
        }
    }

    /// Bytes appended since the last flush.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Effective buffer capacity after clamping.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    pub fn is_echo_enabled(&self) -> bool {
        self.echo_enabled
    }

    pub fn set_echo_enabled(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }

    pub fn set_echo(&mut self, echo: impl Write + Send + 'static) {
        self.echo = Box::new(echo);
    }

    /// Change the buffer capacity; requests under the minimum are clamped.
    pub fn set_buffer_size(&mut self, requested: usize) {
        let buffer_size = clamp_buffer_size(&self.config.name, requested, &mut self.diagnostics);
        self.buffer_size = buffer_size;
        self.flush_threshold = flush_threshold_for(buffer_size);
        self.buffer
            .reserve(buffer_size.saturating_sub(self.buffer.len()));
    }

    /// Move the backing file to `<directory>/<name>.txt`.
    ///
    /// Pending bytes go to the current file first, and the new file is
    /// always opened for appending; truncation only happens at construction.
    /// If that open fails the logger is degraded.
    ///
    /// Only the recorded directory changes when the logger is degraded, when
    /// it writes to a sink given to [`LoggerBuilder::sink`], or when the path
    /// stays the same.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.flush();
        let current = self.config.file_path();
        self.config.directory = directory.into();

        if self.state() == LoggerState::Degraded
            || !self.file_backed
            || self.config.file_path() == current
        {
            return;
        }
        self.file = open_backing_file(&self.config, true, &mut self.diagnostics);
    }

    /// Append one line, tagged with `level` when given.
    pub fn log(&mut self, message: &str, level: Option<Level>) {
        self.line_at(level).push_str(message);
    }

    /// Append one line rendered from `format_args!`.
    pub fn log_args(&mut self, args: fmt::Arguments<'_>, level: Option<Level>) {
        self.line_at(level).append_args(args);
    }

    /// Append one line made of `values` rendered back to back.
    pub fn message(&mut self, values: &[Value<'_>]) {
        let mut line = self.line();
        for value in values {
            line.push_str(&value.render());
        }
    }

    pub fn debug(&mut self, message: &str) {
        self.log(message, Some(Level::Debug));
    }

    pub fn info(&mut self, message: &str) {
        self.log(message, Some(Level::Info));
    }

    pub fn trace(&mut self, message: &str) {
        self.log(message, Some(Level::Trace));
    }

    pub fn warning(&mut self, message: &str) {
        self.log(message, Some(Level::Warning));
    }

    pub fn error(&mut self, message: &str) {
        self.log(message, Some(Level::Error));
    }

    pub fn critical(&mut self, message: &str) {
        self.log(message, Some(Level::Critical));
    }

    /// Start an untagged line that is terminated when the builder drops.
    pub fn line(&mut self) -> LineBuilder<'_> {
        self.line_at(None)
    }

    pub fn line_at(&mut self, level: Option<Level>) -> LineBuilder<'_> {
        let start = self.begin_line(level);
        LineBuilder::new(self, start)
    }

    /// Write the whole buffer to the backing file and clear it.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let written = match self.file.as_mut() {
            Some(file) => file.write_all(&self.buffer).and_then(|()| file.flush()),
            None => Ok(()),
        };

        if let Err(err) = written {
            // Dropping the handle means this is reported once.
            self.file = None;
            let message = format!(
                "! Logger \"{}\" failed writing to {}: {}; further output is discarded",
                self.config.name,
                self.config.file_path().display(),
                err
            );
            report(&mut self.diagnostics, &message);
        }

        self.buffer.clear();
    }

    /// Discard pending bytes without writing them.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Copy pending bytes to `out`, leaving the buffer untouched.
    pub fn write_buffer_to(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(&self.buffer)
    }

    fn check_buffer(&mut self) {
        if self.buffer.len() >= self.flush_threshold {
            self.flush();
        }
    }

    /// Flush if needed, then write the `[name] [timestamp] [tag] ` prefix.
    /// Returns the offset where the new line starts.
    pub(crate) fn begin_line(&mut self, level: Option<Level>) -> usize {
        self.check_buffer();
        let start = self.buffer.len();

        let stamp = format_timestamp(&(self.clock)());
        self.buffer.push(b'[');
        self.buffer.extend_from_slice(self.config.name.as_bytes());
        self.buffer.extend_from_slice(b"] ");
        self.buffer.extend_from_slice(stamp.as_bytes());
        self.buffer.push(b' ');
        if let Some(level) = level {
            self.buffer.extend_from_slice(level.tag().as_bytes());
        }
        start
    }

    pub(crate) fn append_str(&mut self, s: &str) {
        self.buffer.extend_from_slice(s.as_bytes());
    }

    pub(crate) fn truncate_buffer(&mut self, len: usize) {
        self.buffer.truncate(len);
    }

    /// Terminate the line begun at `start` and mirror it to the echo sink.
    pub(crate) fn end_line(&mut self, start: usize) {
        self.buffer.push(LINE_TERMINATOR);
        if self.echo_enabled {
            let _ = self.echo.write_all(&self.buffer[start..]);
            let _ = self.echo.flush();
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}
