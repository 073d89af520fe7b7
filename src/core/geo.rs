use crate::core::{distance::haversine_distance, error::CoreError};
use crate::models::{Coordinates, Station};

/// Default search radius for nearest-station lookups
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;

/// A station together with its distance from the query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestStation<'a> {
    pub station: &'a Station,
    pub distance_km: f64,
}

/// Find the station closest to a point, if one lies within `max_distance_km`
///
/// Stations without coordinates are skipped. When two stations are equally
/// close, the one appearing first in `stations` wins.
///
/// # Errors
/// `InvalidInput` for out-of-range coordinates or a negative / non-finite
/// radius. An empty result is `Ok(None)`.
pub fn find_nearest_station<'a>(
    lat: f64,
    lng: f64,
    stations: &'a [Station],
    max_distance_km: f64,
) -> Result<Option<&'a Station>, CoreError> {
    Ok(nearest_station_with_distance(lat, lng, stations, max_distance_km)?.map(|n| n.station))
}

/// Same lookup as [`find_nearest_station`], also reporting the distance
pub fn nearest_station_with_distance<'a>(
    lat: f64,
    lng: f64,
    stations: &'a [Station],
    max_distance_km: f64,
) -> Result<Option<NearestStation<'a>>, CoreError> {
    if !Coordinates::new(lat, lng).is_valid() {
        return Err(CoreError::invalid(format!(
            "coordinates out of range: lat={}, lng={}",
            lat, lng
        )));
    }
    if !max_distance_km.is_finite() || max_distance_km < 0.0 {
        return Err(CoreError::invalid(format!(
            "max distance must be a non-negative number of km, got {}",
            max_distance_km
        )));
    }

    let mut best: Option<NearestStation<'a>> = None;

    for station in stations {
        let Some(coords) = station.coordinates else {
            continue;
        };

        let distance_km = haversine_distance(lat, lng, coords.lat, coords.lng);

        // Strict comparison keeps the earlier station on ties
        let closer = best.map_or(true, |b| distance_km < b.distance_km);
        if closer {
            best = Some(NearestStation { station, distance_km });
        }
    }

    let nearest = best.filter(|b| b.distance_km <= max_distance_km);

    match &nearest {
        Some(n) => tracing::debug!(
            "Nearest station to ({}, {}) is {} at {:.2} km",
            lat,
            lng,
            n.station.id,
            n.distance_km
        ),
        None => tracing::debug!(
            "No station within {} km of ({}, {})",
            max_distance_km,
            lat,
            lng
        ),
    }

    Ok(nearest)
}
