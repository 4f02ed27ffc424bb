use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Success,
    Error,
    Info,
}

/// One classified activity-log line. Derived from a raw backend string; the
/// timestamp is the client-observed classification time, not anything the
/// backend emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub kind: LogKind,
    pub timestamp: DateTime<Utc>,
}

/// Classify a raw log line by keyword content.
///
/// Success markers are checked before failure markers, so a line containing
/// both classifies as success.
pub fn classify(raw: &str, at: DateTime<Utc>) -> LogEntry {
    let kind = if raw.contains('✓') || raw.contains("successfully") || raw.contains("Success") {
        LogKind::Success
    } else if raw.contains('✗') || raw.contains("Failed") || raw.contains("Error") {
        LogKind::Error
    } else {
        LogKind::Info
    };

    LogEntry {
        message: raw.to_owned(),
        kind,
        timestamp: at,
    }
}
