#![allow(non_snake_case)]

use super::*;
use crate::dispatcher::LogDispatcher;
use chrono::NaiveDate;
use std::sync::Arc;

/// Writer appending into a shared buffer
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

fn afternoon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_milli_opt(14, 7, 9, 42)
        .unwrap()
}

/// Splits `[time]rest` and checks the time parses back
fn strip_timestamp(line: &str) -> &str {
    let (time, rest) = line[1..].split_once(']').unwrap();
    NaiveDateTime::parse_from_str(time, TIMESTAMP_FORMAT).unwrap();
    rest
}

#[test]
fn ConsoleSink___format_line_at___uses_time_tag_and_code() {
    let sink = ConsoleSink::new(LogLevel::Info);

    assert_eq!(
        sink.format_line_at(afternoon(), "hello", LogLevel::Warning),
        "[24/03/05 14:07:09.042][SDK][W]hello"
    );
}

#[test]
fn ConsoleSink___with_tag___changes_prefix() {
    let sink = ConsoleSink::new(LogLevel::Info).with_tag("APP");

    assert_eq!(
        sink.format_line_at(afternoon(), "x", LogLevel::Error),
        "[24/03/05 14:07:09.042][APP][E]x"
    );
}

#[test]
fn ConsoleSink___format_line___stamps_current_time() {
    let sink = ConsoleSink::new(LogLevel::Info);

    let line = sink.format_line("now", LogLevel::Info);

    assert!(line.starts_with('['));
    assert_eq!(strip_timestamp(&line), "[SDK][I]now");
}

#[test]
fn ConsoleSink___registered_with_dispatcher___writes_accepted_lines() {
    let buffer = SharedBuffer::default();
    let sink = ConsoleSink::with_writer(LogLevel::Info, Box::new(buffer.clone()));
    let dispatcher = LogDispatcher::new();
    dispatcher.set_sink(Some(Arc::new(sink)));

    dispatcher.log("kept", LogLevel::Info);
    dispatcher.log("dropped", LogLevel::Debug);
    dispatcher.log("also kept", LogLevel::Error);

    let contents = buffer.contents();
    let lines: Vec<&str> = contents.lines().map(strip_timestamp).collect();
    assert_eq!(lines, vec!["[SDK][I]kept", "[SDK][E]also kept"]);
    assert!(contents.ends_with('\n'));
}
