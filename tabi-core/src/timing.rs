//! Arrival and departure times, crowd levels and advisories for a finished
//! ordering.

use crate::clock::round_minutes;
use crate::{Category, ClockTime, ConstraintMatrix, DetailedRoute, Place, RouteStop};

/// Crowd level above which a stop is flagged as very crowded.
pub const CROWDED_ABOVE: f64 = 0.7;
/// Crowd level below which a stop is recommended as quiet.
pub const QUIET_BELOW: f64 = 0.3;

const SUNSET_FROM_HOUR: u32 = 17;
const SUNRISE_UNTIL_HOUR: u32 = 9;

/// Minutes spent at `place`: its own estimate, else the category default.
///
/// # Examples
/// ```
/// use tabi_core::{Category, Place, lat_lng, visit_duration_minutes};
///
/// let museum = Place::new("m", lat_lng(35.0, 139.0)).with_category(Category::Museum);
/// assert_eq!(visit_duration_minutes(&museum), 120);
/// assert_eq!(visit_duration_minutes(&museum.with_visit_minutes(45)), 45);
/// ```
#[must_use]
pub fn visit_duration_minutes(place: &Place) -> u32 {
    place
        .visit_minutes
        .unwrap_or_else(|| place.category.default_visit_minutes())
}

/// Simulated timing of one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Leg {
    pub(crate) index: usize,
    pub(crate) travel_minutes: u32,
    pub(crate) arrival: ClockTime,
    pub(crate) visit_minutes: u32,
    pub(crate) departure: ClockTime,
}

/// Walk `route` from `start`, adding travel then visit time at each stop.
pub(crate) fn schedule(
    route: &[usize],
    places: &[Place],
    constraints: &ConstraintMatrix,
    start: ClockTime,
) -> Vec<Leg> {
    let mut clock = start;
    let mut previous: Option<usize> = None;
    let mut legs = Vec::with_capacity(route.len());
    for &index in route {
        let travel_minutes =
            previous.map_or(0, |from| round_minutes(constraints.minutes(from, index)));
        let arrival = clock.plus_minutes(travel_minutes);
        let visit_minutes = places.get(index).map_or(0, visit_duration_minutes);
        let departure = arrival.plus_minutes(visit_minutes);
        legs.push(Leg {
            index,
            travel_minutes,
            arrival,
            visit_minutes,
            departure,
        });
        clock = departure;
        previous = Some(index);
    }
    legs
}

/// Attach clock times, crowd levels and advisories to `route`.
///
/// `route` holds indices into `places`, which must be the places
/// `constraints` was built from. Crowd levels come from the hourly curve at
/// the arrival hour, neutral when the curve has no value for that hour.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tabi_core::{ClockTime, Conditions, ConstraintBuilder, Place, annotate, lat_lng};
///
/// let places = vec![
///     Place::new("a", lat_lng(35.0, 135.0)),
///     Place::new("b", lat_lng(35.0, 135.0)),
/// ];
/// let date = NaiveDate::from_ymd_opt(2025, 6, 4).expect("valid date");
/// let constraints = ConstraintBuilder::default().build(&places, date, &Conditions::neutral());
/// let route = annotate(&[1, 0], &places, &constraints, ClockTime::DAY_START);
/// assert_eq!(route.place_ids(), ["b", "a"]);
/// assert_eq!(route.stops[1].arrival_time.to_string(), "10:00");
/// ```
#[must_use]
pub fn annotate(
    route: &[usize],
    places: &[Place],
    constraints: &ConstraintMatrix,
    start: ClockTime,
) -> DetailedRoute {
    let stops = schedule(route, places, constraints, start)
        .into_iter()
        .filter_map(|leg| {
            let place = places.get(leg.index)?;
            let crowd_level = constraints.crowd_at(leg.index, leg.arrival.hour());
            Some(RouteStop {
                place_id: place.id.clone(),
                arrival_time: leg.arrival,
                departure_time: leg.departure,
                visit_duration_min: leg.visit_minutes,
                travel_time_from_prev_min: leg.travel_minutes,
                crowd_level,
                advisories: advisories(place, leg.arrival, crowd_level),
            })
        })
        .collect();
    DetailedRoute { stops }
}

fn advisories(place: &Place, arrival: ClockTime, crowd_level: f64) -> Vec<String> {
    let mut notes = Vec::new();
    if crowd_level > CROWDED_ABOVE {
        notes.push("Expected to be very crowded at this hour".to_owned());
    } else if crowd_level < QUIET_BELOW {
        notes.push("Good time to visit, low crowds".to_owned());
    }
    let hour = arrival.hour();
    if place.category.is_quiet_at_dawn() && hour < SUNRISE_UNTIL_HOUR {
        notes.push("Early enough for a calm sunrise visit".to_owned());
    }
    if place.category == Category::Urban && hour >= SUNSET_FROM_HOUR {
        notes.push("Best seen at sunset".to_owned());
    }
    if let Some(hours) = place.hours
        && !hours.contains(arrival)
    {
        notes.push(format!(
            "Arrives outside opening hours ({:02}:00-{:02}:00)",
            hours.open, hours.close
        ));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Conditions, ConstraintBuilder, lat_lng};
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn weekday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).expect("valid date")
    }

    #[fixture]
    fn temple() -> Vec<Place> {
        vec![Place::new("sensoji", lat_lng(35.7148, 139.7967)).with_category(Category::Temple)]
    }

    fn annotate_at(places: &[Place], start: ClockTime) -> DetailedRoute {
        let constraints =
            ConstraintBuilder::default().build(places, weekday(), &Conditions::neutral());
        annotate(&[0], places, &constraints, start)
    }

    #[rstest]
    fn temples_are_quieter_at_seven_than_at_noon(temple: Vec<Place>) {
        let dawn = annotate_at(&temple, ClockTime::from_hm(7, 0));
        let noon = annotate_at(&temple, ClockTime::from_hm(12, 0));
        let dawn_stop = dawn.stops.first().expect("one stop");
        let noon_stop = noon.stops.first().expect("one stop");
        assert!(dawn_stop.crowd_level < noon_stop.crowd_level);
        assert!(dawn_stop.advisories.iter().any(|a| a.contains("low crowds")));
        assert!(dawn_stop.advisories.iter().any(|a| a.contains("sunrise")));
    }

    #[rstest]
    fn late_arrivals_read_the_last_hour_on_the_curve(temple: Vec<Place>) {
        let closing = annotate_at(&temple, ClockTime::from_hm(22, 0));
        let night = annotate_at(&temple, ClockTime::from_hm(23, 30));
        let closing_stop = closing.stops.first().expect("one stop");
        let night_stop = night.stops.first().expect("one stop");
        assert!((night_stop.crowd_level - closing_stop.crowd_level).abs() < f64::EPSILON);
    }

    #[rstest]
    fn arrivals_before_six_read_the_first_hour_on_the_curve(temple: Vec<Place>) {
        let early = annotate_at(&temple, ClockTime::from_hm(5, 0));
        let six = annotate_at(&temple, ClockTime::from_hm(6, 0));
        let noon = annotate_at(&temple, ClockTime::from_hm(12, 0));
        let early_stop = early.stops.first().expect("one stop");
        let six_stop = six.stops.first().expect("one stop");
        let noon_stop = noon.stops.first().expect("one stop");
        assert!((early_stop.crowd_level - six_stop.crowd_level).abs() < f64::EPSILON);
        assert!(early_stop.crowd_level < noon_stop.crowd_level);
    }

    #[test]
    fn clock_accumulates_travel_and_visits() {
        let places = vec![
            Place::new("shibuya", lat_lng(35.6595, 139.7004)).with_category(Category::Shopping),
            Place::new("shinjuku", lat_lng(35.6938, 139.7034)).with_category(Category::Museum),
        ];
        let constraints =
            ConstraintBuilder::default().build(&places, weekday(), &Conditions::neutral());
        let route = annotate(&[0, 1], &places, &constraints, ClockTime::DAY_START);
        let second = route.stops.get(1).expect("two stops");
        // 90 minutes shopping plus 5 curated minutes to Shinjuku.
        assert_eq!(second.travel_time_from_prev_min, 5);
        assert_eq!(second.arrival_time, ClockTime::from_hm(10, 35));
        assert_eq!(second.departure_time, ClockTime::from_hm(12, 35));
        assert_eq!(route.end_time(), Some(ClockTime::from_hm(12, 35)));
    }

    #[test]
    fn closed_arrivals_get_an_advisory() {
        let places = vec![Place::new("museum", lat_lng(35.0, 135.0)).with_hours(10, 17)];
        let route = annotate_at(&places, ClockTime::DAY_START);
        let stop = route.stops.first().expect("one stop");
        assert!(stop.advisories.iter().any(|a| a.contains("10:00-17:00")));
    }

    #[test]
    fn crowded_arrivals_get_a_warning_advisory() {
        let places = vec![Place::new("ramen", lat_lng(35.0, 135.0)).with_category(Category::Food)];
        let route = annotate_at(&places, ClockTime::from_hm(12, 0));
        let stop = route.stops.first().expect("one stop");
        assert!(stop.crowd_level > CROWDED_ABOVE);
        assert!(stop.advisories.iter().any(|a| a.contains("very crowded")));
    }
}
