//! Errors reported by external data providers.

use thiserror::Error;

/// Failure of a weather or event provider.
///
/// Provider failures never abort a run; they are logged and replaced by
/// neutral defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached or returned nothing usable.
    #[error("{provider} provider unavailable: {reason}")]
    Unavailable {
        /// Which provider failed.
        provider: &'static str,
        /// Short reason for the failure.
        reason: String,
    },
    /// The provider has no data for the requested city.
    #[error("no data for city '{0}'")]
    UnknownCity(String),
}
