//! Hour-by-hour crowd estimates.
//!
//! The heuristic model is a placeholder for real predictions. What matters
//! is the direction of each effect: popular places, weekends, peak hours,
//! meal times and seasonal events raise crowds; early mornings at temples
//! and shrines lower them.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{Category, Place, SeasonalEvent};

/// First hour covered by a crowd curve.
pub const FIRST_HOUR: u32 = 6;
/// Last hour covered by a crowd curve.
pub const LAST_HOUR: u32 = 22;
/// Crowd level assumed when no estimate exists.
pub const NEUTRAL_CROWD: f64 = 0.5;

const HOURS: usize = 17;

/// Crowd levels between 0 and 1 for each hour from 06:00 to 22:00.
///
/// # Examples
/// ```
/// use tabi_core::HourlyCrowd;
///
/// let curve = HourlyCrowd::from_fn(|hour| if hour < 12 { 0.2 } else { 0.8 });
/// assert_eq!(curve.at_hour(7), Some(0.2));
/// assert_eq!(curve.at_hour(23), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyCrowd {
    levels: [f64; HOURS],
}

impl HourlyCrowd {
    /// Build a curve from a function of the hour, clamping into `0..=1`.
    #[must_use]
    pub fn from_fn(mut level: impl FnMut(u32) -> f64) -> Self {
        let mut levels = [NEUTRAL_CROWD; HOURS];
        for (hour, slot) in (FIRST_HOUR..=LAST_HOUR).zip(levels.iter_mut()) {
            *slot = level(hour).clamp(0.0, 1.0);
        }
        Self { levels }
    }

    /// Flat curve at `level`.
    #[must_use]
    pub fn uniform(level: f64) -> Self {
        Self::from_fn(|_| level)
    }

    /// Level at `hour`, or `None` outside 06:00 to 22:00.
    #[must_use]
    pub fn at_hour(&self, hour: u32) -> Option<f64> {
        let offset = usize::try_from(hour.checked_sub(FIRST_HOUR)?).ok()?;
        self.levels.get(offset).copied()
    }

    /// Level at `hour`, reading the first or last covered hour for times
    /// before 06:00 or after 22:00.
    ///
    /// # Examples
    /// ```
    /// use tabi_core::HourlyCrowd;
    ///
    /// let curve = HourlyCrowd::from_fn(|hour| if hour < 12 { 0.2 } else { 0.8 });
    /// assert_eq!(curve.nearest_hour(5), 0.2);
    /// assert_eq!(curve.nearest_hour(23), 0.8);
    /// ```
    #[must_use]
    pub fn nearest_hour(&self, hour: u32) -> f64 {
        self.at_hour(hour.clamp(FIRST_HOUR, LAST_HOUR))
            .unwrap_or(NEUTRAL_CROWD)
    }

    /// Mean level over `first..=last`, or `None` when no hour is covered.
    #[must_use]
    pub fn average(&self, first: u32, last: u32) -> Option<f64> {
        let (sum, count) = (first..=last)
            .filter_map(|hour| self.at_hour(hour))
            .fold((0.0, 0_u32), |(sum, count), level| (sum + level, count + 1));
        (count > 0).then(|| sum / f64::from(count))
    }
}

/// Produces crowd curves for places.
pub trait CrowdModel: Send + Sync {
    /// Hourly curve for `place` on `date`, or `None` when the model has no
    /// estimate.
    fn hourly(&self, place: &Place, date: NaiveDate, events: &[SeasonalEvent])
    -> Option<HourlyCrowd>;
}

/// Deterministic crowd model built from a handful of additive effects.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicCrowdModel {
    /// Load present at every hour.
    pub base: f64,
    /// Ratings strictly above this count as popular.
    pub popular_rating: f64,
    /// Boost for popular places.
    pub popular_boost: f64,
    /// Boost on Saturdays and Sundays.
    pub weekend_boost: f64,
    /// Inclusive hour windows of peak visiting.
    pub peak_windows: Vec<(u32, u32)>,
    /// Boost during peak windows.
    pub peak_boost: f64,
    /// Hours strictly before this are early morning.
    pub dawn_until: u32,
    /// Reduction for temples and shrines in the early morning.
    pub dawn_discount: f64,
    /// Hours at which food places fill up.
    pub meal_hours: Vec<u32>,
    /// Boost for food places at meal hours.
    pub meal_boost: f64,
    /// Boost for places affected by a seasonal event.
    pub event_boost: f64,
}

impl Default for HeuristicCrowdModel {
    fn default() -> Self {
        Self {
            base: 0.3,
            popular_rating: 4.5,
            popular_boost: 0.2,
            weekend_boost: 0.2,
            peak_windows: vec![(10, 14), (17, 19)],
            peak_boost: 0.3,
            dawn_until: 9,
            dawn_discount: 0.3,
            meal_hours: vec![12, 19],
            meal_boost: 0.4,
            event_boost: 0.2,
        }
    }
}

impl HeuristicCrowdModel {
    fn level_at(&self, place: &Place, hour: u32, day_load: f64) -> f64 {
        let mut level = day_load;
        if self
            .peak_windows
            .iter()
            .any(|(from, to)| (*from..=*to).contains(&hour))
        {
            level += self.peak_boost;
        }
        if place.category.is_quiet_at_dawn() && hour < self.dawn_until {
            level -= self.dawn_discount;
        }
        if place.category == Category::Food && self.meal_hours.contains(&hour) {
            level += self.meal_boost;
        }
        level
    }
}

impl CrowdModel for HeuristicCrowdModel {
    fn hourly(
        &self,
        place: &Place,
        date: NaiveDate,
        events: &[SeasonalEvent],
    ) -> Option<HourlyCrowd> {
        let mut day_load = self.base;
        if place.rating.is_some_and(|rating| rating > self.popular_rating) {
            day_load += self.popular_boost;
        }
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            day_load += self.weekend_boost;
        }
        if events.iter().any(|event| event.affects(place)) {
            day_load += self.event_boost;
        }
        Some(HourlyCrowd::from_fn(|hour| {
            self.level_at(place, hour, day_load)
        }))
    }
}
