//! Greedy nearest-neighbour tours.
//!
//! The baseline is both a cheap answer for tiny inputs and the seed and
//! fallback of the colony search.

use crate::{Place, SquareMatrix, distance_km};

/// Nearest-neighbour tour over `places`, returned as indices.
///
/// Distances are great-circle kilometres; places without coordinates are
/// unreachable and left out. See [`nearest_neighbor_by`] for how the start
/// is chosen.
///
/// # Examples
/// ```
/// use tabi_core::{Place, lat_lng, nearest_neighbor};
///
/// let places = vec![
///     Place::new("west", lat_lng(0.0, 0.0)),
///     Place::new("east", lat_lng(0.0, 0.02)),
///     Place::new("middle", lat_lng(0.0, 0.01)),
/// ];
/// assert_eq!(nearest_neighbor(&places, Some(0)), vec![0, 2, 1]);
/// ```
#[must_use]
pub fn nearest_neighbor(places: &[Place], start: Option<usize>) -> Vec<usize> {
    let distances = SquareMatrix::from_fn(places.len(), |i, j| {
        match (
            places.get(i).and_then(|p| p.location),
            places.get(j).and_then(|p| p.location),
        ) {
            (Some(a), Some(b)) => distance_km(a, b),
            _ => f64::INFINITY,
        }
    });
    nearest_neighbor_by(&distances, start)
}

/// Nearest-neighbour tour over a distance matrix.
///
/// With a valid `start` the tour is grown once from there. Otherwise every
/// index is tried as a start and the tour reaching the most places wins,
/// then the shortest one, then the lowest start index. Infinite distances
/// are unreachable, so a tour may stop before covering every index.
#[must_use]
pub fn nearest_neighbor_by(distances: &SquareMatrix, start: Option<usize>) -> Vec<usize> {
    let n = distances.size();
    if let Some(origin) = start.filter(|origin| *origin < n) {
        return grow_from(distances, origin).0;
    }
    let mut best: Option<(Vec<usize>, f64)> = None;
    for origin in 0..n {
        let (route, length) = grow_from(distances, origin);
        let better = best.as_ref().is_none_or(|(best_route, best_length)| {
            route.len() > best_route.len()
                || (route.len() == best_route.len() && length < *best_length)
        });
        if better {
            best = Some((route, length));
        }
    }
    best.map(|(route, _)| route).unwrap_or_default()
}

fn grow_from(distances: &SquareMatrix, origin: usize) -> (Vec<usize>, f64) {
    let n = distances.size();
    let mut visited = vec![false; n];
    let mut route = Vec::with_capacity(n);
    let mut length = 0.0;
    let mut current = origin;
    if let Some(seen) = visited.get_mut(origin) {
        *seen = true;
    }
    route.push(origin);
    loop {
        let next = (0..n)
            .filter(|j| !visited.get(*j).copied().unwrap_or(true))
            .map(|j| (j, distances.at(current, j)))
            .filter(|(_, km)| km.is_finite())
            .min_by(|(ja, a), (jb, b)| a.total_cmp(b).then(ja.cmp(jb)));
        let Some((j, km)) = next else { break };
        if let Some(seen) = visited.get_mut(j) {
            *seen = true;
        }
        route.push(j);
        length += km;
        current = j;
    }
    (route, length)
}
