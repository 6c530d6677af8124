//! Wall-clock and id sources for new messages.
//!
//! Both are traits so tests can pin timestamps and ids.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;
use uuid::Uuid;

/// Default timestamp format (two-digit hour and minute).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M";

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// Source of message identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier, ordered after every previous one.
    fn next_id(&self) -> Uuid;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// UUIDv7 generator: millisecond timestamp prefix plus random bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Format a time for display next to a message.
///
/// A format chrono cannot render falls back to [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn format_timestamp(time: &DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_ok() {
        return out;
    }
    time.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
}

/// Whether every specifier in `format` is one chrono understands.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}
