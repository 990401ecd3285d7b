use chrono::{NaiveDate, NaiveDateTime};
use linelog::{Level, Logger, LoggerConfig, LoggerState, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const STAMP: &str = "[2024/05/06 07:08:09]";

fn clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap()
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn open_logger(dir: &Path, buffer_size: usize, diagnostics: &Capture) -> Logger {
    let config = LoggerConfig::new("svc")
        .with_directory(dir)
        .with_buffer_size(buffer_size);
    Logger::builder(config)
        .diagnostics(diagnostics.clone())
        .clock(clock)
        .open()
}

fn file_text(dir: &Path) -> String {
    fs::read_to_string(dir.join("svc.txt")).unwrap()
}

fn line(message: &str) -> String {
    format!("[svc] {STAMP} {message}\n")
}

#[test]
fn short_lines_stay_buffered() {
    let temp = tempdir().unwrap();
    let diagnostics = Capture::default();
    let mut logger = open_logger(temp.path(), 1000, &diagnostics);

    let messages = ["alpha", "beta", "gamma", "delta", "epsilon"];
    for message in messages {
        logger.log(message, None);
    }

    assert_eq!(file_text(temp.path()), "");
    let expected: String = messages.iter().map(|m| line(m)).collect();
    assert_eq!(String::from_utf8_lossy(logger.buffer()), expected);
    assert!(diagnostics.text().is_empty());
}

#[test]
fn crossing_threshold_flushes_before_append() {
    let temp = tempdir().unwrap();
    let diagnostics = Capture::default();
    let mut logger = open_logger(temp.path(), 100, &diagnostics);

    assert_eq!(logger.buffer_size(), 500);
    assert_eq!(logger.flush_threshold(), 300);
    assert_eq!(diagnostics.text().lines().count(), 1);

    // 28 bytes of prefix + 31 bytes of message + newline = 60 bytes per line.
    let message = "x".repeat(31);
    let mut written = Vec::new();
    while logger.buffer().len() < logger.flush_threshold() {
        logger.log(&message, None);
        written.push(line(&message));
    }
    assert_eq!(written.len(), 5);
    assert_eq!(file_text(temp.path()), "");

    logger.log("trigger", None);

    assert_eq!(file_text(temp.path()), written.concat());
    assert_eq!(String::from_utf8_lossy(logger.buffer()), line("trigger"));
}

#[test]
fn nothing_lost_reordered_or_duplicated() {
    let temp = tempdir().unwrap();
    let diagnostics = Capture::default();
    let mut logger = open_logger(temp.path(), 500, &diagnostics);

    let mut expected = String::new();
    for i in 0..200 {
        let message = format!("event {} {}", i, "-".repeat(i % 37));
        let before = logger.buffer().len();
        logger.log(&message, Some(Level::Trace));
        let appended = format!("[svc] {STAMP} [trace] {message}\n");

        // The threshold check happens before the append, so the buffer can
        // only run past the threshold by the line just added.
        assert!(logger.buffer().len() < logger.flush_threshold() + appended.len());
        if before >= logger.flush_threshold() {
            assert_eq!(logger.buffer().len(), appended.len());
        }
        expected.push_str(&appended);
    }

    let residual = String::from_utf8_lossy(logger.buffer()).into_owned();
    assert_eq!(file_text(temp.path()) + &residual, expected);
}

#[test]
fn drop_flushes_residual_buffer() {
    let temp = tempdir().unwrap();
    let diagnostics = Capture::default();
    let mut logger = open_logger(temp.path(), 500, &diagnostics);

    let message = "y".repeat(100);
    for _ in 0..4 {
        logger.log(&message, None);
    }
    let flushed = file_text(temp.path());
    assert_eq!(flushed, line(&message).repeat(3));

    logger.critical("last words");
    drop(logger);

    assert_eq!(
        file_text(temp.path()),
        format!(
            "{}{}[svc] {STAMP} [critical] last words\n",
            flushed,
            line(&message)
        )
    );
}

#[test]
fn unwritable_directory_keeps_logging_in_memory() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("does-not-exist");
    let diagnostics = Capture::default();
    let mut logger = open_logger(&missing, 500, &diagnostics);

    assert_eq!(logger.state(), LoggerState::Degraded);
    assert_eq!(diagnostics.text().lines().count(), 1);

    logger.info("one");
    let after_one = logger.buffer().len();
    logger.info("two");
    assert!(logger.buffer().len() > after_one);

    for _ in 0..50 {
        logger.warning("filler line to cross the threshold");
    }
    drop(logger);

    assert!(!missing.join("svc.txt").exists());
    assert_eq!(diagnostics.text().lines().count(), 1);
}

#[test]
fn echo_mirrors_each_append_exactly() {
    let temp = tempdir().unwrap();
    let echo = Capture::default();
    let config = LoggerConfig::new("svc")
        .with_directory(temp.path())
        .with_echo(true);
    let mut logger = Logger::builder(config)
        .echo(echo.clone())
        .clock(clock)
        .open();

    logger.info("first");
    let before = echo.text().len();
    let buffered_before = logger.buffer().len();
    logger.message(&[Value::from("n="), Value::from(5i64)]);

    assert_eq!(&echo.text()[before..], line("n=5"));
    assert_eq!(&logger.buffer()[buffered_before..], line("n=5").as_bytes());

    drop(logger);
    assert_eq!(echo.text(), file_text(temp.path()));
}

#[test]
fn append_mode_preserves_earlier_runs() {
    let temp = tempdir().unwrap();
    let config = LoggerConfig::new("svc")
        .with_directory(temp.path())
        .with_append(true);

    for run in 0..2 {
        let mut logger = Logger::builder(config.clone()).clock(clock).open();
        logger.info(&format!("run {}", run));
    }

    assert_eq!(
        file_text(temp.path()),
        format!("[svc] {STAMP} [info] run 0\n[svc] {STAMP} [info] run 1\n")
    );
}

#[test]
fn config_file_drives_logger() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("logger.toml");
    fs::write(
        &config_path,
        format!(
            "name = \"svc\"\ndirectory = {:?}\nbuffer_size = 2048\n",
            temp.path().display().to_string()
        ),
    )
    .unwrap();

    let config = LoggerConfig::load(&config_path).unwrap();
    let mut logger = Logger::builder(config).clock(clock).open();
    assert_eq!(logger.buffer_size(), 2048);
    assert_eq!(logger.file_path(), temp.path().join("svc.txt"));

    logger.error("from config");
    drop(logger);
    assert_eq!(file_text(temp.path()), format!("[svc] {STAMP} [error] from config\n"));
}
