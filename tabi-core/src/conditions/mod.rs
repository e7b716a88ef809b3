//! External inputs gathered before constraint building: weather forecasts
//! and seasonal events.
//!
//! Providers may perform I/O; [`Conditions::gather`] calls them once per run
//! and hands plain data to the CPU-bound stages. Provider failures degrade to
//! neutral defaults and are recorded in [`Conditions::missing`].

mod error;
mod events;
mod weather;

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

pub use error::ProviderError;
pub use events::{EventProvider, NoEvents, SeasonalCalendar, SeasonalEvent};
pub use weather::{FixedWeather, NoWeatherData, WeatherForecast, WeatherProvider};

/// External data sources that may be unavailable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Weather forecast.
    Weather,
    /// Seasonal event calendar.
    Events,
    /// Crowd predictions.
    Crowd,
}

impl DataSource {
    /// Lowercase name used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Events => "events",
            Self::Crowd => "crowd",
        }
    }
}

/// Snapshot of the external inputs for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conditions {
    /// Forecast for the day, or `None` when unavailable.
    pub weather: Option<WeatherForecast>,
    /// Seasonal events active on the day.
    pub events: Vec<SeasonalEvent>,
    /// Sources that failed and were replaced by neutral defaults.
    pub missing: Vec<DataSource>,
}

impl Conditions {
    /// Conditions with no forecast and no events.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            weather: None,
            events: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Query both providers, substituting neutral defaults on failure.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use tabi_core::{Conditions, DataSource, NoEvents, NoWeatherData};
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    /// let conditions = Conditions::gather(&NoWeatherData, &NoEvents, "tokyo", date);
    /// assert!(conditions.weather.is_none());
    /// assert_eq!(conditions.missing, vec![DataSource::Weather]);
    /// ```
    #[must_use]
    pub fn gather<W, E>(weather: &W, events: &E, city: &str, date: NaiveDate) -> Self
    where
        W: WeatherProvider + ?Sized,
        E: EventProvider + ?Sized,
    {
        let mut conditions = Self::neutral();
        match weather.forecast(city, date) {
            Ok(forecast) => conditions.weather = Some(forecast),
            Err(err) => {
                warn!("Weather unavailable for {city} on {date}; assuming neutral: {err}");
                conditions.missing.push(DataSource::Weather);
            }
        }
        match events.events(city, date) {
            Ok(active) => conditions.events = active,
            Err(err) => {
                warn!("Seasonal events unavailable for {city} on {date}: {err}");
                conditions.missing.push(DataSource::Events);
            }
        }
        conditions
    }

    /// Whether rain is forecast.
    #[must_use]
    pub fn is_rainy(&self) -> bool {
        self.weather.as_ref().is_some_and(WeatherForecast::is_rainy)
    }
}
