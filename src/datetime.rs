//! Publication date conversion
//!
//! The API delivers timestamps as `yyyy-MM-ddTHH:mm:ssZ` in UTC. The feed
//! shows them as `yyyy-MM-dd HH:mm:ss` in a fixed local offset.

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

/// Input format of API timestamps
const SOURCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Output format for display
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default display offset (UTC+9)
pub const DEFAULT_OFFSET_HOURS: i32 = 9;

/// Converts API timestamps into local display strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateConverter {
    offset: FixedOffset,
}

impl Default for DateConverter {
    fn default() -> Self {
        Self::with_offset_hours(DEFAULT_OFFSET_HOURS).unwrap_or_else(Self::utc)
    }
}

impl DateConverter {
    /// Create a converter for the given offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Create a converter from an hour offset; `None` if outside ±23 hours
    pub fn with_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(Self::new)
    }

    /// Converter that keeps timestamps in UTC
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// The configured display offset
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Convert a UTC timestamp to the local display format.
    ///
    /// Malformed input yields an empty string.
    pub fn to_local(&self, utc: &str) -> String {
        match NaiveDateTime::parse_from_str(utc.trim(), SOURCE_FORMAT) {
            Ok(naive) => Utc
                .from_utc_datetime(&naive)
                .with_timezone(&self.offset)
                .format(DISPLAY_FORMAT)
                .to_string(),
            Err(_) => String::new(),
        }
    }
}

/// Convert a UTC timestamp using the default UTC+9 offset
pub fn to_local(utc: &str) -> String {
    DateConverter::default().to_local(utc)
}
