// Unit tests for Chavruta Match

use chavruta_match::core::{
    distance::haversine_distance,
    geo::{find_nearest_station, nearest_station_with_distance},
    schedule::{available_times, base_time_slots},
    scoring::compatibility_score,
    CoreError, MatchEngine,
};
use chavruta_match::models::{CandidateInput, Coordinates, Region, RiderProfile, ScoringPolicy, Station, TimeSlot};
use chavruta_match::services::ReferenceCatalog;
use chrono::NaiveDate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn station(id: &str, region: Region, lat: f64, lng: f64) -> Station {
    Station::new(id, id, region, Some(Coordinates::new(lat, lng)))
}

#[test]
fn test_station_a_and_b_are_about_nine_km_apart() {
    let distance = haversine_distance(32.08, 34.80, 32.16, 34.83);
    assert!(distance > 9.0 && distance < 9.6, "Expected ~9.2km, got {}", distance);
}

#[test]
fn test_nearest_station_prefers_exact_match() {
    let stations = vec![
        station("A", Region::Center, 32.08, 34.80),
        station("B", Region::Center, 32.16, 34.83),
    ];

    let found = nearest_station_with_distance(32.08, 34.80, &stations, 10.0)
        .unwrap()
        .unwrap();

    assert_eq!(found.station.id, "A");
    assert_eq!(found.distance_km, 0.0);
}

#[test]
fn test_nearest_station_never_exceeds_radius() {
    let catalog = ReferenceCatalog::builtin();
    let radii = [0.5, 2.0, 10.0, 25.0];

    // Grid over Israel and some water to the west
    for lat_step in 0..20 {
        for lng_step in 0..10 {
            let lat = 30.8 + lat_step as f64 * 0.12;
            let lng = 34.2 + lng_step as f64 * 0.12;

            for &radius in &radii {
                let found = find_nearest_station(lat, lng, catalog.stations(), radius).unwrap();

                let closest = catalog
                    .stations()
                    .iter()
                    .filter_map(|s| s.coordinates.map(|c| haversine_distance(lat, lng, c.lat, c.lng)))
                    .fold(f64::INFINITY, f64::min);

                match found {
                    Some(s) => {
                        let c = s.coordinates.unwrap();
                        let d = haversine_distance(lat, lng, c.lat, c.lng);
                        assert!(d <= radius);
                        assert_eq!(d, closest);
                    }
                    None => assert!(closest > radius),
                }
            }
        }
    }
}

#[test]
fn test_nearest_station_in_builtin_catalog() {
    let catalog = ReferenceCatalog::builtin();

    // Standing on the platform at Jerusalem Yitzhak Navon
    let found = find_nearest_station(31.7886, 35.2028, catalog.stations(), 10.0).unwrap();
    assert_eq!(found.unwrap().id, "jerusalem-yitzhak-navon");

    // Middle of the Mediterranean
    let found = find_nearest_station(33.0, 33.0, catalog.stations(), 10.0).unwrap();
    assert!(found.is_none());
}

#[test]
fn test_duplicate_coordinates_resolve_to_first_station() {
    let catalog = ReferenceCatalog::builtin();
    let found = find_nearest_station(32.7936, 34.9571, catalog.stations(), 10.0).unwrap();
    assert_eq!(found.unwrap().id, "hof-hacarmel");
}

#[test]
fn test_available_times_ascending_for_every_pair() {
    let catalog = ReferenceCatalog::builtin();

    for departure in catalog.stations() {
        for arrival in catalog.stations() {
            if departure.id == arrival.id {
                continue;
            }
            let times = available_times(departure, arrival, date());
            assert!(!times.is_empty());
            assert!(times.windows(2).all(|w| w[0] < w[1]));

            let rendered: Vec<String> = times.iter().map(|t| t.to_string()).collect();
            assert!(rendered.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_same_region_at_least_as_dense_as_inter_region() {
    let a = station("a", Region::Center, 0.0, 0.0);
    let b = station("b", Region::Center, 0.0, 0.0);
    let north = station("n", Region::North, 0.0, 0.0);
    let jerusalem = station("j", Region::Jerusalem, 0.0, 0.0);

    let same = available_times(&a, &b, date()).len();
    let inter = available_times(&a, &north, date()).len();
    let branch = available_times(&a, &jerusalem, date()).len();

    assert!(same >= inter);
    assert!(inter >= branch);
}

#[test]
fn test_jerusalem_route_is_about_a_third() {
    let catalog = ReferenceCatalog::builtin();
    let lod = catalog.station("lod").unwrap();
    let navon = catalog.station("jerusalem-yitzhak-navon").unwrap();
    let netanya = catalog.station("netanya").unwrap();

    let to_jerusalem = available_times(lod, navon, date()).len();
    let within_center = available_times(lod, netanya, date()).len();

    assert_eq!(within_center, base_time_slots().len());
    assert_eq!(to_jerusalem, (within_center + 2) / 3);
}

#[test]
fn test_schedule_ignores_date() {
    let catalog = ReferenceCatalog::builtin();
    let dep = catalog.station("haifa-center").unwrap();
    let arr = catalog.station("ashkelon").unwrap();

    let weekday = available_times(dep, arr, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
    let other = available_times(dep, arr, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(weekday, other);
}

#[test]
fn test_talmud_halacha_scenario_scores_eighty() {
    assert_eq!(compatibility_score(1, 2, &ScoringPolicy::default()), Ok(80));
}

fn rider(topics: &[&str]) -> RiderProfile {
    RiderProfile {
        id: "rider".to_string(),
        selected_topics: topics.iter().map(|s| s.to_string()).collect(),
        departure_station: "lod".to_string(),
        arrival_station: "jerusalem-malha".to_string(),
        departure_time: TimeSlot::new(7, 0).unwrap(),
        current_coordinates: None,
    }
}

fn candidate(id: &str, topics: &[&str]) -> CandidateInput {
    CandidateInput {
        id: id.to_string(),
        nickname: None,
        topics: topics.iter().map(|s| s.to_string()).collect(),
        departure_station: "lod".to_string(),
        arrival_station: "jerusalem-malha".to_string(),
        departure_time: TimeSlot::new(7, 0).unwrap(),
        coordinates: None,
        distance_km: None,
    }
}

#[test]
fn test_find_matches_sorted_descending() {
    let engine = MatchEngine::with_default_policy();
    let rider = rider(&["talmud", "halacha", "mishna"]);

    let pool = vec![
        candidate("1", &["talmud"]),
        candidate("2", &["talmud", "halacha", "mishna"]),
        candidate("3", &["chassidut"]),
        candidate("4", &["mishna", "halacha"]),
    ];

    let matches = engine.find_matches(&rider, pool).unwrap();
    assert!(matches
        .windows(2)
        .all(|w| w[0].compatibility_score >= w[1].compatibility_score));
    assert_eq!(matches[0].id, "2");
    assert_eq!(matches[0].compatibility_score, 100);
}

#[test]
fn test_find_matches_without_topics_fails() {
    let engine = MatchEngine::with_default_policy();
    let result = engine.find_matches(&rider(&[]), vec![candidate("1", &["talmud"])]);
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}
