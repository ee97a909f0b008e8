use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("empty duration string")]
    Empty,
    #[error("invalid duration value: {0}")]
    Invalid(String),
    #[error("duration must not be negative: {0}")]
    Negative(String),
}

/// Parse a duration string like "500ms", "2s", "1.5m", "1h" or a plain number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }

    if let Some(num) = s.strip_suffix("ms") {
        let millis: u64 = num
            .trim()
            .parse()
            .map_err(|_| DurationParseError::Invalid(s.to_string()))?;
        return Ok(Duration::from_millis(millis));
    }

    let (num, scale) = if let Some(num) = s.strip_suffix('h') {
        (num, 3600.0)
    } else if let Some(num) = s.strip_suffix('m') {
        (num, 60.0)
    } else if let Some(num) = s.strip_suffix('s') {
        (num, 1.0)
    } else {
        (s, 1.0)
    };

    let value: f64 = num
        .trim()
        .parse()
        .map_err(|_| DurationParseError::Invalid(s.to_string()))?;
    seconds_to_duration(value * scale, s)
}

fn seconds_to_duration(secs: f64, raw: &str) -> Result<Duration, DurationParseError> {
    if !secs.is_finite() {
        return Err(DurationParseError::Invalid(raw.to_string()));
    }
    if secs < 0.0 {
        return Err(DurationParseError::Negative(raw.to_string()));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| DurationParseError::Invalid(raw.to_string()))
}

/// A duration as written in a config document: seconds as a number, or a suffixed string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(f64),
    Text(String),
}

impl DurationValue {
    pub fn resolve(&self) -> Result<Duration, DurationParseError> {
        match self {
            DurationValue::Seconds(secs) => seconds_to_duration(*secs, &secs.to_string()),
            DurationValue::Text(s) => parse_duration(s),
        }
    }
}
