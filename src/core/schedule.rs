use crate::models::{Region, Station, TimeSlot, TrainTrip};
use chrono::NaiveDate;
use rand::Rng;

/// First and last service hours, inclusive
const FIRST_HOUR: u32 = 5;
const LAST_HOUR: u32 = 23;

/// Travel times used for trip details, in minutes
const SAME_REGION_MINUTES: u32 = 20;
const INTER_REGION_MINUTES: u32 = 60;
const JERUSALEM_LINE_MINUTES: u32 = 90;

/// Service frequency for an hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTier {
    /// 06-09 and 16-19: every 20 minutes
    Rush,
    /// 10-15: every 30 minutes
    Midday,
    /// Everything else: once an hour
    OffPeak,
}

impl FrequencyTier {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            6..=9 | 16..=19 => FrequencyTier::Rush,
            10..=15 => FrequencyTier::Midday,
            _ => FrequencyTier::OffPeak,
        }
    }

    pub fn minutes(&self) -> &'static [u32] {
        match self {
            FrequencyTier::Rush => &[0, 20, 40],
            FrequencyTier::Midday => &[0, 30],
            FrequencyTier::OffPeak => &[0],
        }
    }
}

/// Keep every n-th slot of the base timetable for this station pair.
///
/// Jerusalem branch service is the sparsest and wins over the inter-region
/// reduction; the two do not compound.
pub fn service_stride(departure: &Station, arrival: &Station) -> usize {
    if departure.region == Region::Jerusalem || arrival.region == Region::Jerusalem {
        3
    } else if departure.region != arrival.region {
        2
    } else {
        1
    }
}

/// Full-frequency timetable before any regional reduction, ascending
pub fn base_time_slots() -> Vec<TimeSlot> {
    (FIRST_HOUR..=LAST_HOUR)
        .flat_map(|hour| {
            FrequencyTier::for_hour(hour)
                .minutes()
                .iter()
                .filter_map(move |&minute| TimeSlot::new(hour, minute).ok())
        })
        .collect()
}

/// Departure times offered between two stations on a date
///
/// The result is strictly ascending. Callers must reject identical
/// departure/arrival stations before asking.
pub fn available_times(departure: &Station, arrival: &Station, date: NaiveDate) -> Vec<TimeSlot> {
    let stride = service_stride(departure, arrival);

    let mut times: Vec<TimeSlot> = base_time_slots().into_iter().step_by(stride).collect();
    times.sort();
    times.dedup();

    tracing::debug!(
        "Generated {} departures from {} to {} on {} (stride {})",
        times.len(),
        departure.id,
        arrival.id,
        date,
        stride
    );

    times
}

/// Scheduled travel time between two stations
pub fn travel_minutes(departure: &Station, arrival: &Station) -> u32 {
    if departure.region == arrival.region {
        SAME_REGION_MINUTES
    } else if departure.region == Region::Jerusalem || arrival.region == Region::Jerusalem {
        JERUSALEM_LINE_MINUTES
    } else {
        INTER_REGION_MINUTES
    }
}

/// Trip details for a chosen departure.
///
/// The train number is drawn from `rng` so callers control determinism.
pub fn trip_details<R: Rng + ?Sized>(
    departure: &Station,
    arrival: &Station,
    departure_time: TimeSlot,
    date: NaiveDate,
    rng: &mut R,
) -> TrainTrip {
    let minutes = travel_minutes(departure, arrival);
    let train_number: u16 = rng.gen_range(100..1000);

    TrainTrip {
        departure_station_id: departure.id.clone(),
        arrival_station_id: arrival.id.clone(),
        departure_time,
        arrival_time: departure_time.add_minutes(minutes),
        date,
        travel_minutes: minutes,
        train_number: train_number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn station(id: &str, region: Region) -> Station {
        Station::new(id, id, region, None)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_frequency_tiers() {
        assert_eq!(FrequencyTier::for_hour(5), FrequencyTier::OffPeak);
        assert_eq!(FrequencyTier::for_hour(6), FrequencyTier::Rush);
        assert_eq!(FrequencyTier::for_hour(9), FrequencyTier::Rush);
        assert_eq!(FrequencyTier::for_hour(10), FrequencyTier::Midday);
        assert_eq!(FrequencyTier::for_hour(15), FrequencyTier::Midday);
        assert_eq!(FrequencyTier::for_hour(19), FrequencyTier::Rush);
        assert_eq!(FrequencyTier::for_hour(20), FrequencyTier::OffPeak);
    }

    #[test]
    fn test_base_timetable_shape() {
        let slots = base_time_slots();
        // 8 rush hours x3, 6 midday hours x2, 5 off-peak hours x1
        assert_eq!(slots.len(), 41);
        assert_eq!(slots.first().unwrap().to_string(), "05:00");
        assert_eq!(slots.last().unwrap().to_string(), "23:00");
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_region_keeps_everything() {
        let times = available_times(
            &station("a", Region::Center),
            &station("b", Region::Center),
            date(),
        );
        assert_eq!(times, base_time_slots());
        let rendered: Vec<String> = times.iter().take(4).map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["05:00", "06:00", "06:20", "06:40"]);
    }

    #[test]
    fn test_inter_region_keeps_every_second_slot() {
        let times = available_times(
            &station("a", Region::North),
            &station("b", Region::Center),
            date(),
        );
        assert_eq!(times.len(), 21);
        assert_eq!(times[0].to_string(), "05:00");
        assert_eq!(times[1].to_string(), "06:20");
    }

    #[test]
    fn test_jerusalem_keeps_every_third_slot() {
        let center = station("a", Region::Center);
        let jerusalem = station("j", Region::Jerusalem);

        let times = available_times(&center, &jerusalem, date());
        assert_eq!(times.len(), 14);
        assert_eq!(times[1].to_string(), "06:40");

        // Both ends on the branch still use the sparse pattern
        let local = available_times(&jerusalem, &station("k", Region::Jerusalem), date());
        assert_eq!(local.len(), 14);
    }

    #[test]
    fn test_travel_minutes() {
        let center = station("a", Region::Center);
        assert_eq!(travel_minutes(&center, &station("b", Region::Center)), 20);
        assert_eq!(travel_minutes(&center, &station("n", Region::North)), 60);
        assert_eq!(travel_minutes(&center, &station("j", Region::Jerusalem)), 90);
        assert_eq!(
            travel_minutes(&station("j", Region::Jerusalem), &station("k", Region::Jerusalem)),
            20
        );
    }

    #[test]
    fn test_trip_details_deterministic_with_seed() {
        let dep = station("lod", Region::Center);
        let arr = station("jerusalem-malha", Region::Jerusalem);
        let time = TimeSlot::new(23, 0).unwrap();

        let first = trip_details(&dep, &arr, time, date(), &mut StdRng::seed_from_u64(7));
        let second = trip_details(&dep, &arr, time, date(), &mut StdRng::seed_from_u64(7));

        assert_eq!(first, second);
        assert_eq!(first.arrival_time.to_string(), "00:30");
        assert_eq!(first.travel_minutes, 90);
        assert_eq!(first.train_number.len(), 3);
    }
}
