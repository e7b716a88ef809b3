//! Advisory scan of a route for detours and long hops.
//!
//! The detector never changes a route. It works on any ordering, including
//! the caller's own, and skips legs involving places without coordinates.

use geo::Coord;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::clock::round_minutes;
use crate::{Place, PlaceId, Severity, distance_km};

/// Limits used by [`detect_inefficiencies_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InefficiencyThresholds {
    /// A triple A, B, C is a detour when `AB + BC` exceeds this multiple of
    /// `AC`.
    pub backtrack_ratio: f64,
    /// Hops longer than this many kilometres are flagged.
    pub long_hop_km: f64,
    /// Estimated minutes lost per excess kilometre.
    pub minutes_per_excess_km: f64,
}

impl Default for InefficiencyThresholds {
    fn default() -> Self {
        Self {
            backtrack_ratio: 1.5,
            long_hop_km: 10.0,
            minutes_per_excess_km: 10.0,
        }
    }
}

/// Kind of inefficiency found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InefficiencyKind {
    /// The route doubles back on itself.
    Backtracking,
    /// Two consecutive stops are far apart.
    LongDistance,
}

/// A diagnostic about part of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inefficiency {
    /// Kind of problem.
    #[serde(rename = "type")]
    pub kind: InefficiencyKind,
    /// Severity.
    pub severity: Severity,
    /// Places involved, in route order.
    pub place_ids: Vec<PlaceId>,
    /// Detour kilometres for backtracking, hop kilometres for long hops.
    pub distance_km: f64,
    /// Estimated minutes lost to a detour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost_minutes: Option<u32>,
    /// Suggested reordering of `place_ids`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_order: Option<Vec<PlaceId>>,
    /// Description of the problem.
    pub message: String,
    /// Suggested remedy.
    pub suggestion: String,
}

/// Scan `route` with default thresholds.
///
/// # Examples
/// ```
/// use tabi_core::{InefficiencyKind, Place, detect_inefficiencies, lat_lng};
///
/// let route = vec![
///     Place::new("west", lat_lng(0.0, 0.0)),
///     Place::new("east", lat_lng(0.0, 0.02)),
///     Place::new("middle", lat_lng(0.0, 0.01)),
/// ];
/// let found = detect_inefficiencies(&route);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].kind, InefficiencyKind::Backtracking);
/// ```
#[must_use]
pub fn detect_inefficiencies(route: &[Place]) -> Vec<Inefficiency> {
    detect_inefficiencies_with(route, &InefficiencyThresholds::default())
}

/// Scan `route` for detours and long hops.
#[must_use]
pub fn detect_inefficiencies_with(
    route: &[Place],
    thresholds: &InefficiencyThresholds,
) -> Vec<Inefficiency> {
    let mut found: Vec<Inefficiency> = route
        .windows(3)
        .filter_map(|triple| match triple {
            [a, b, c] => backtracking(a, b, c, thresholds),
            _ => None,
        })
        .collect();
    found.extend(route.windows(2).filter_map(|pair| match pair {
        [a, b] => long_hop(a, b, thresholds),
        _ => None,
    }));
    debug!(
        "Found {} inefficiencies in a route of {} stops",
        found.len(),
        route.len()
    );
    found
}

fn label(place: &Place) -> &str {
    if place.name.is_empty() {
        &place.id
    } else {
        &place.name
    }
}

fn located(place: &Place) -> Option<Coord<f64>> {
    place
        .location
        .filter(|coord| coord.x.is_finite() && coord.y.is_finite())
}

fn backtracking(
    a: &Place,
    b: &Place,
    c: &Place,
    thresholds: &InefficiencyThresholds,
) -> Option<Inefficiency> {
    let (pa, pb, pc) = (located(a)?, located(b)?, located(c)?);
    let ab = distance_km(pa, pb);
    let bc = distance_km(pb, pc);
    let ac = distance_km(pa, pc);
    if ab + bc <= thresholds.backtrack_ratio * ac {
        return None;
    }
    let excess = ab + bc - ac;
    let (la, lb, lc) = (label(a), label(b), label(c));
    Some(Inefficiency {
        kind: InefficiencyKind::Backtracking,
        severity: Severity::Medium,
        place_ids: vec![a.id.clone(), b.id.clone(), c.id.clone()],
        distance_km: excess,
        time_cost_minutes: Some(round_minutes(excess * thresholds.minutes_per_excess_km)),
        suggested_order: Some(vec![a.id.clone(), c.id.clone(), b.id.clone()]),
        message: format!("Going {la} -> {lb} -> {lc} doubles back on itself"),
        suggestion: format!("Consider reordering: {la} -> {lc} -> {lb}"),
    })
}

fn long_hop(a: &Place, b: &Place, thresholds: &InefficiencyThresholds) -> Option<Inefficiency> {
    let km = distance_km(located(a)?, located(b)?);
    if km <= thresholds.long_hop_km {
        return None;
    }
    let (la, lb) = (label(a), label(b));
    Some(Inefficiency {
        kind: InefficiencyKind::LongDistance,
        severity: Severity::High,
        place_ids: vec![a.id.clone(), b.id.clone()],
        distance_km: km,
        time_cost_minutes: None,
        suggested_order: None,
        message: format!("{la} and {lb} are {km:.1} km apart"),
        suggestion: format!("Consider moving {lb} to another day or adding stops in between"),
    })
}
