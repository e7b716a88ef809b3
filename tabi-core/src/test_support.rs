//! Fixtures shared by unit, behaviour and solver tests.

use chrono::NaiveDate;

use crate::{
    Category, CrowdModel, HourlyCrowd, OptimizationContext, OptimizationRequest, Place,
    SeasonalEvent, lat_lng,
};

/// Crowd model that never has an estimate.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCrowdData;

impl CrowdModel for NoCrowdData {
    fn hourly(
        &self,
        _place: &Place,
        _date: NaiveDate,
        _events: &[SeasonalEvent],
    ) -> Option<HourlyCrowd> {
        None
    }
}

/// Build a date, panicking on invalid input.
///
/// # Panics
/// Panics when the date does not exist.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| panic!("invalid date"))
}

/// A Wednesday in June, outside every seasonal event.
#[must_use]
pub fn weekday() -> NaiveDate {
    date(2025, 6, 4)
}

/// Request for `places` in Tokyo on `on`.
#[must_use]
pub fn request(places: Vec<Place>, on: NaiveDate) -> OptimizationRequest {
    OptimizationRequest::new(places, OptimizationContext::new("tokyo", on))
}

/// Three points on a near-equilateral triangle of roughly 1 km sides.
#[must_use]
pub fn triangle() -> Vec<Place> {
    vec![
        Place::new("A", lat_lng(35.6812, 139.7671)),
        Place::new("B", lat_lng(35.6900, 139.7700)),
        Place::new("C", lat_lng(35.6850, 139.7750)),
    ]
}

/// A sightseeing day across central Tokyo.
#[must_use]
pub fn tokyo_day() -> Vec<Place> {
    vec![
        Place::new("sensoji", lat_lng(35.7148, 139.7967))
            .with_name("Senso-ji")
            .with_category(Category::Temple)
            .with_rating(4.6),
        Place::new("shibuya_crossing", lat_lng(35.6595, 139.7004))
            .with_name("Shibuya Crossing")
            .with_category(Category::Urban)
            .with_rating(4.5),
        Place::new("ueno_park", lat_lng(35.7148, 139.7734))
            .with_name("Ueno Park")
            .with_category(Category::Park)
            .with_rating(4.4),
        Place::new("meiji_jingu", lat_lng(35.6764, 139.6993))
            .with_name("Meiji Jingu")
            .with_category(Category::Shrine)
            .with_rating(4.6),
        Place::new("tokyo_national_museum", lat_lng(35.7188, 139.7765))
            .with_name("Tokyo National Museum")
            .with_category(Category::Museum)
            .with_rating(4.5)
            .indoor()
            .with_hours(9, 17),
        Place::new("tsukiji_outer_market", lat_lng(35.6655, 139.7707))
            .with_name("Tsukiji Outer Market")
            .with_category(Category::Food)
            .with_rating(4.3),
        Place::new("tokyo_tower", lat_lng(35.6586, 139.7454))
            .with_name("Tokyo Tower")
            .with_category(Category::Landmark)
            .with_rating(4.4),
    ]
}
