//! Structured warnings attached to optimization results.

use serde::{Deserialize, Serialize};

/// How much a warning should concern the traveller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// Worth acting on.
    Medium,
    /// Likely to spoil the day.
    High,
}

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Rain is forecast and the route has outdoor stops.
    Weather,
    /// A stop is expected to be very crowded on arrival.
    Crowding,
    /// A stop is reached outside its opening hours.
    OpeningHours,
    /// A seasonal event is active.
    SeasonalEvent,
    /// External data was unavailable and neutral defaults were used.
    DataUnavailable,
    /// Some places could not be routed.
    UnroutablePlaces,
    /// The requested start place is not routable.
    UnknownStartPlace,
}

/// A warning as `{type, message, severity}`.
///
/// # Examples
/// ```
/// use tabi_core::{Severity, Warning, WarningKind};
///
/// let warning = Warning::new(WarningKind::Weather, Severity::Medium, "Rain expected");
/// let json = serde_json::to_string(&warning)?;
/// assert_eq!(json, r#"{"type":"weather","message":"Rain expected","severity":"medium"}"#);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning category.
    #[serde(rename = "type")]
    pub kind: WarningKind,
    /// Message for the traveller.
    pub message: String,
    /// Severity.
    pub severity: Severity,
}

impl Warning {
    /// Construct a warning.
    #[must_use]
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity,
        }
    }
}
