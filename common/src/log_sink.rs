use std::fmt;

use log::{Level, Log, Metadata, Record};
use parking_lot::Mutex;

/// A logger handle that components hold instead of reaching for the process wide logger.
///
/// `LogSink::global` forwards to whatever logger the binary installed. Tests construct the sink
/// over a `CaptureLog` to inspect what a component reported.
#[derive(Clone, Copy)]
pub struct LogSink<'a> {
    logger: &'a dyn Log,
    target: &'static str,
}

impl<'a> LogSink<'a> {
    pub fn new(logger: &'a dyn Log, target: &'static str) -> Self {
        Self { logger, target }
    }

    pub fn with_target(&self, target: &'static str) -> Self {
        Self {
            logger: self.logger,
            target,
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn log(&self, level: Level, args: fmt::Arguments) {
        let metadata = Metadata::builder().level(level).target(self.target).build();

        if !self.logger.enabled(&metadata) {
            return;
        }

        self.logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .build(),
        );
    }

    pub fn debug(&self, args: fmt::Arguments) {
        self.log(Level::Debug, args)
    }

    pub fn info(&self, args: fmt::Arguments) {
        self.log(Level::Info, args)
    }

    pub fn warn(&self, args: fmt::Arguments) {
        self.log(Level::Warn, args)
    }
}

impl LogSink<'static> {
    pub fn global(target: &'static str) -> Self {
        Self::new(log::logger(), target)
    }
}

impl fmt::Debug for LogSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink").field("target", &self.target).finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Collects every record in memory.
#[derive(Default)]
pub struct CaptureLog {
    records: Mutex<Vec<CapturedRecord>>,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self, target: &'static str) -> LogSink<'_> {
        LogSink::new(self, target)
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    pub fn count(&self, level: Level) -> usize {
        self.records.lock().iter().filter(|r| r.level == level).count()
    }
}

impl Log for CaptureLog {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().push(CapturedRecord {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_level_and_target() {
        let capture = CaptureLog::new();
        let sink = capture.sink("mcts");

        sink.warn(format_args!("bad stats for {}", 3));
        sink.info(format_args!("done"));

        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Warn);
        assert_eq!(records[0].target, "mcts");
        assert_eq!(records[0].message, "bad stats for 3");
        assert!(capture.contains(Level::Info, "done"));
        assert_eq!(capture.count(Level::Warn), 1);
    }

    #[test]
    fn test_with_target() {
        let capture = CaptureLog::new();
        let sink = capture.sink("a").with_target("b");

        sink.debug(format_args!("x"));

        assert_eq!(capture.records()[0].target, "b");
    }
}
