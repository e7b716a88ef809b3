//! Weather forecasts and the providers that supply them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ProviderError;

/// Forecast for one city and date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherForecast {
    /// Probability of precipitation between 0 and 1.
    pub rain_probability: f64,
    /// Expected temperature in degrees Celsius.
    #[serde(default)]
    pub temperature_c: Option<f64>,
    /// Relative humidity between 0 and 1.
    #[serde(default)]
    pub humidity: Option<f64>,
}

impl WeatherForecast {
    /// Forecast carrying only a rain probability.
    #[must_use]
    pub const fn with_rain(rain_probability: f64) -> Self {
        Self {
            rain_probability,
            temperature_c: None,
            humidity: None,
        }
    }

    /// Rain probability clamped to `0..=1`; non-finite values count as dry.
    #[must_use]
    pub fn rain(&self) -> f64 {
        if self.rain_probability.is_finite() {
            self.rain_probability.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether any rain is forecast.
    #[must_use]
    pub fn is_rainy(&self) -> bool {
        self.rain() > 0.0
    }
}

/// Supplies weather forecasts.
///
/// Implementations perform their I/O here, before constraint building
/// starts, and must be safe to share across threads.
pub trait WeatherProvider: Send + Sync {
    /// Forecast for `city` on `date`.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when no forecast can be produced.
    fn forecast(&self, city: &str, date: NaiveDate) -> Result<WeatherForecast, ProviderError>;
}

/// Provider returning the same forecast for every city and date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tabi_core::{FixedWeather, WeatherForecast, WeatherProvider};
///
/// let provider = FixedWeather(WeatherForecast::with_rain(0.9));
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
/// let forecast = provider.forecast("tokyo", date).expect("fixed forecast");
/// assert!(forecast.is_rainy());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedWeather(pub WeatherForecast);

impl WeatherProvider for FixedWeather {
    fn forecast(&self, _city: &str, _date: NaiveDate) -> Result<WeatherForecast, ProviderError> {
        Ok(self.0)
    }
}

/// Provider that never has data, so suitability stays neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoWeatherData;

impl WeatherProvider for NoWeatherData {
    fn forecast(&self, _city: &str, _date: NaiveDate) -> Result<WeatherForecast, ProviderError> {
        Err(ProviderError::Unavailable {
            provider: "weather",
            reason: "no forecast source configured".to_owned(),
        })
    }
}
