//! Model run time handling for forecast data.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Format of the `model_runtime` property, e.g. "01-01-2024 00:00".
pub const RUNTIME_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Reference time of the model run a forecast was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRuntime {
    pub reference_time: DateTime<Tz>,
}

impl ModelRuntime {
    /// Parse a naive runtime string and interpret it as wall-clock time in `tz`.
    ///
    /// Ambiguous local times (the repeated hour when DST ends) resolve to the
    /// earlier instant; local times skipped by DST are rejected.
    pub fn parse(s: &str, format: &str, tz: Tz) -> Result<Self, TimeParseError> {
        let naive = NaiveDateTime::parse_from_str(s.trim(), format)
            .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;

        let reference_time = tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| TimeParseError::NonexistentLocalTime(s.to_string()))?;

        Ok(Self { reference_time })
    }

    /// The valid time `forecast_hour` hours after the model run.
    pub fn valid_datetime(&self, forecast_hour: u32) -> DateTime<Tz> {
        self.reference_time + Duration::hours(forecast_hour as i64)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Local time does not exist: {0}")]
    NonexistentLocalTime(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use chrono_tz::Europe::Amsterdam;

    #[test]
    fn test_parse_runtime() {
        let runtime = ModelRuntime::parse("15-01-2024 12:00", RUNTIME_FORMAT, Amsterdam).unwrap();
        let dt = runtime.reference_time;
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.timezone(), Amsterdam);
    }

    #[test]
    fn test_valid_datetime_adds_hours() {
        let runtime = ModelRuntime::parse("01-01-2024 00:00", RUNTIME_FORMAT, Amsterdam).unwrap();
        let later = runtime.valid_datetime(18);
        assert_eq!(later.day(), 1);
        assert_eq!(later.hour(), 18);
        assert_eq!(runtime.valid_datetime(24).day(), 2);
    }

    #[test]
    fn test_rejects_garbage_and_skipped_hour() {
        assert!(matches!(
            ModelRuntime::parse("2024-01-01T00:00", RUNTIME_FORMAT, Amsterdam),
            Err(TimeParseError::InvalidFormat(_))
        ));
        // 02:30 does not exist on the spring-forward date.
        assert!(matches!(
            ModelRuntime::parse("31-03-2024 02:30", RUNTIME_FORMAT, Amsterdam),
            Err(TimeParseError::NonexistentLocalTime(_))
        ));
    }
}
