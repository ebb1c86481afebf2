//! Capture of `log` records for assertions.
//!
//! The logger is installed process-wide on first use, but records are kept
//! per thread, so tests running in parallel only ever see their own output.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
}

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

thread_local! {
    static RECORDS: RefCell<Vec<CapturedLog>> = const { RefCell::new(Vec::new()) };
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let entry = CapturedLog {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        RECORDS.with(|records| records.borrow_mut().push(entry));
    }

    fn flush(&self) {}
}

/// Start capturing on the current thread, discarding anything recorded on it
/// so far.
///
/// If another logger was installed first, nothing is captured.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Drain every record captured on the current thread.
pub fn take_logs() -> Vec<CapturedLog> {
    RECORDS.with(|records| records.borrow_mut().drain(..).collect())
}

/// Messages of the `warn` records captured on the current thread so far.
pub fn warnings() -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|entry| entry.level == Level::Warn)
            .map(|entry| entry.message.clone())
            .collect()
    })
}
