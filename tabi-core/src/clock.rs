//! Wall-clock times within a travel day.
//!
//! [`ClockTime`] counts whole minutes since midnight. Long days may run past
//! `24:00`; the value is not wrapped so arrival order stays monotonic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTES_PER_HOUR: u32 = 60;

/// Minutes since midnight, rendered as `HH:MM`.
///
/// # Examples
/// ```
/// use tabi_core::ClockTime;
///
/// let time: ClockTime = "07:45".parse()?;
/// assert_eq!(time.hour(), 7);
/// assert_eq!(time.plus_minutes(30).to_string(), "08:15");
/// # Ok::<(), tabi_core::ClockTimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

/// Errors returned when parsing a [`ClockTime`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockTimeError {
    /// The text was not of the form `HH:MM`.
    #[error("expected a time of day as HH:MM, found '{0}'")]
    Malformed(String),
    /// The minute component was 60 or more.
    #[error("minute component {0} is out of range")]
    MinuteOutOfRange(u32),
}

impl ClockTime {
    /// Default start of a sightseeing day.
    pub const DAY_START: Self = Self::from_hm(9, 0);

    /// Construct from minutes since midnight.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Construct from hours and minutes.
    #[must_use]
    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours.saturating_mul(MINUTES_PER_HOUR).saturating_add(minutes))
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Hour component; values of 24 or more belong to the following night.
    #[must_use]
    pub const fn hour(self) -> u32 {
        self.0.div_euclid(MINUTES_PER_HOUR)
    }

    /// Return the time `minutes` later.
    #[must_use]
    pub const fn plus_minutes(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::DAY_START
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.0.rem_euclid(MINUTES_PER_HOUR);
        write!(f, "{:02}:{minutes:02}", self.hour())
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockTimeError::Malformed(s.to_owned());
        let (hours_text, minutes_text) = s.trim().split_once(':').ok_or_else(malformed)?;
        let hours: u32 = hours_text.parse().map_err(|_| malformed())?;
        let minutes: u32 = minutes_text.parse().map_err(|_| malformed())?;
        if minutes >= MINUTES_PER_HOUR {
            return Err(ClockTimeError::MinuteOutOfRange(minutes));
        }
        Ok(Self::from_hm(hours, minutes))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Round a non-negative minute quantity to the nearest whole minute.
///
/// Non-finite and negative inputs collapse to zero.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped into the u32 range before the cast"
)]
pub fn round_minutes(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09:00", 540)]
    #[case("7:05", 425)]
    #[case("25:30", 1530)]
    fn parses_hours_and_minutes(#[case] raw: &str, #[case] minutes: u32) {
        let time: ClockTime = raw.parse().expect("valid time");
        assert_eq!(time.minutes(), minutes);
    }

    #[rstest]
    #[case("0900")]
    #[case("nine:00")]
    #[case("")]
    fn rejects_malformed_text(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<ClockTime>(),
            Err(ClockTimeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_minutes_past_the_hour() {
        assert_eq!(
            "10:75".parse::<ClockTime>(),
            Err(ClockTimeError::MinuteOutOfRange(75))
        );
    }

    #[test]
    fn display_pads_components() {
        assert_eq!(ClockTime::from_hm(7, 5).to_string(), "07:05");
    }

    #[test]
    fn serialises_as_text() {
        let json = serde_json::to_string(&ClockTime::from_hm(13, 20)).expect("serialise");
        assert_eq!(json, "\"13:20\"");
    }

    #[rstest]
    #[case(12.4, 12)]
    #[case(12.5, 13)]
    #[case(-3.0, 0)]
    #[case(f64::NAN, 0)]
    fn rounds_minutes(#[case] value: f64, #[case] expected: u32) {
        assert_eq!(round_minutes(value), expected);
    }
}
