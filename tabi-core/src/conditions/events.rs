//! Seasonal events that bias crowd estimates upward.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::{Category, Place, PlaceId};

/// An event drawing extra visitors to some places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalEvent {
    /// Short event key, for example `sakura`.
    pub kind: String,
    /// Message shown to the traveller.
    pub message: String,
    /// Categories drawing extra crowds.
    #[serde(default)]
    pub affected_categories: Vec<Category>,
    /// Individual places drawing extra crowds.
    #[serde(default)]
    pub affected_place_ids: Vec<PlaceId>,
}

impl SeasonalEvent {
    /// Whether the event draws extra crowds to `place`.
    #[must_use]
    pub fn affects(&self, place: &Place) -> bool {
        self.affected_categories.contains(&place.category)
            || self.affected_place_ids.iter().any(|id| *id == place.id)
    }
}

/// Supplies seasonal events for a city and date.
pub trait EventProvider: Send + Sync {
    /// Events active in `city` on `date`.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the event source cannot be queried.
    fn events(&self, city: &str, date: NaiveDate) -> Result<Vec<SeasonalEvent>, ProviderError>;
}

/// A recurring event active over a span of calendar months.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Season {
    first_month: u32,
    last_month: u32,
    event: SeasonalEvent,
}

/// Fixed calendar of yearly events.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tabi_core::{EventProvider, SeasonalCalendar};
///
/// let april = NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date");
/// let events = SeasonalCalendar::default().events("tokyo", april)?;
/// assert_eq!(events[0].kind, "sakura");
/// # Ok::<(), tabi_core::ProviderError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonalCalendar {
    seasons: Vec<Season>,
}

impl SeasonalCalendar {
    /// Calendar with no seasons.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            seasons: Vec::new(),
        }
    }

    /// Add an event active from `first_month` to `last_month` inclusive
    /// (1 = January).
    #[must_use]
    pub fn with_season(mut self, first_month: u32, last_month: u32, event: SeasonalEvent) -> Self {
        self.seasons.push(Season {
            first_month,
            last_month,
            event,
        });
        self
    }
}

impl Default for SeasonalCalendar {
    fn default() -> Self {
        Self::empty()
            .with_season(
                3,
                4,
                SeasonalEvent {
                    kind: "sakura".to_owned(),
                    message: "Cherry blossom season: parks and gardens will be very crowded"
                        .to_owned(),
                    affected_categories: vec![Category::Park, Category::Garden, Category::Nature],
                    affected_place_ids: ["ueno_park", "chidorigafuchi", "meguro_river"]
                        .map(str::to_owned)
                        .to_vec(),
                },
            )
            .with_season(
                11,
                11,
                SeasonalEvent {
                    kind: "momiji".to_owned(),
                    message: "Autumn foliage season: temples and gardens will be crowded"
                        .to_owned(),
                    affected_categories: vec![Category::Temple, Category::Shrine, Category::Garden],
                    affected_place_ids: ["kinkakuji", "arashiyama", "tofukuji"]
                        .map(str::to_owned)
                        .to_vec(),
                },
            )
    }
}

impl EventProvider for SeasonalCalendar {
    fn events(&self, _city: &str, date: NaiveDate) -> Result<Vec<SeasonalEvent>, ProviderError> {
        let month = date.month();
        Ok(self
            .seasons
            .iter()
            .filter(|season| (season.first_month..=season.last_month).contains(&month))
            .map(|season| season.event.clone())
            .collect())
    }
}

/// Provider reporting no events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoEvents;

impl EventProvider for NoEvents {
    fn events(&self, _city: &str, _date: NaiveDate) -> Result<Vec<SeasonalEvent>, ProviderError> {
        Ok(Vec::new())
    }
}
