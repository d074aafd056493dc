use cdi_calendar::{CalendarKey, MonthSlices, is_contiguous, monthly_sequence};

#[test]
fn forty_years_of_months_partition_evenly() {
    let start = CalendarKey::new(1981, 1).unwrap();
    let keys = monthly_sequence(start, 480);
    assert!(is_contiguous(&keys));

    let slices = MonthSlices::partition(&keys).unwrap();
    for month in 1..=12u8 {
        let positions = slices.slice(month).unwrap();
        assert_eq!(positions.len(), 40);
        // Offset within the first year, then +12 per subsequent year.
        for (year, &pos) in positions.iter().enumerate() {
            assert_eq!(pos, (month as usize - 1) + 12 * year);
            assert_eq!(keys[pos].month(), month);
            assert_eq!(keys[pos].year(), 1981 + year as i32);
        }
    }
}

#[test]
fn series_starting_mid_year() {
    let start = CalendarKey::new(2000, 7).unwrap();
    let keys = monthly_sequence(start, 18);
    let slices = MonthSlices::partition(&keys).unwrap();

    // July appears twice (2000, 2001), June once (2001).
    assert_eq!(slices.slice(7).unwrap(), &[0, 12]);
    assert_eq!(slices.slice(6).unwrap(), &[11]);
}

#[test]
fn interleave_round_trips_through_day_offsets() {
    let start = CalendarKey::new(1995, 4).unwrap();
    let keys = monthly_sequence(start, 30);
    let offsets: Vec<i64> = keys.iter().map(|k| k.day_offset().unwrap()).collect();

    let slices = MonthSlices::partition(&keys).unwrap();
    let grouped: Vec<(u8, Vec<i64>)> = slices
        .iter()
        .map(|(month, positions)| {
            let group: Vec<i64> = positions.iter().map(|&p| offsets[p]).collect();
            for &days in &group {
                assert_eq!(CalendarKey::from_day_offset(days).unwrap().month(), month);
            }
            (month, group)
        })
        .collect();
    assert_eq!(slices.interleave(grouped).unwrap(), offsets);
}

#[test]
fn unsorted_keys_are_rejected() {
    let keys = vec![
        CalendarKey::new(2001, 5).unwrap(),
        CalendarKey::new(2001, 4).unwrap(),
    ];
    let err = MonthSlices::partition(&keys).unwrap_err();
    assert!(err.to_string().contains("strictly increasing"));
}
