//! Trip duration and distance for a single log file.

use chrono::NaiveDateTime;
use serde::Serialize;
use sigviz_core::haversine_m;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrackSummary {
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub duration_secs: i64,
    pub distance_m: f64,
}

/// Summarizes a track of `(timestamp, latitude, longitude)` fixes.
///
/// The track is sorted by timestamp in place (stable, so fixes sharing a
/// timestamp keep log order). Distance is the sum of haversine legs between
/// consecutive fixes.
pub fn summarize_track(track: &mut [(NaiveDateTime, f64, f64)]) -> TrackSummary {
    track.sort_by_key(|(ts, _, _)| *ts);

    let (Some(first), Some(last)) = (track.first(), track.last()) else {
        return TrackSummary::default();
    };

    let distance_m = track
        .windows(2)
        .map(|pair| haversine_m(pair[0].1, pair[0].2, pair[1].1, pair[1].2))
        .sum();

    TrackSummary {
        first_timestamp: Some(first.0),
        last_timestamp: Some(last.0),
        duration_secs: (last.0 - first.0).num_seconds(),
        distance_m,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(i64::from(secs))
    }

    #[test]
    fn empty_track_is_zero() {
        let summary = summarize_track(&mut []);
        assert_eq!(summary, TrackSummary::default());
    }

    #[test]
    fn single_fix_has_no_distance() {
        let mut track = vec![(at(0), 12.0, 77.0)];
        let summary = summarize_track(&mut track);
        assert_eq!(summary.duration_secs, 0);
        assert!(summary.distance_m.abs() < f64::EPSILON);
        assert_eq!(summary.first_timestamp, Some(at(0)));
    }

    #[test]
    fn out_of_order_fixes_are_sorted_before_measuring() {
        // Equator, 0.001 degree legs of longitude (~111 m each).
        let mut track = vec![
            (at(120), 0.001, 0.002),
            (at(0), 0.001, 0.0001),
            (at(60), 0.001, 0.001),
        ];
        let summary = summarize_track(&mut track);
        assert_eq!(summary.duration_secs, 120);
        assert_eq!(summary.first_timestamp, Some(at(0)));
        assert_eq!(summary.last_timestamp, Some(at(120)));
        let expected = haversine_m(0.001, 0.0001, 0.001, 0.001)
            + haversine_m(0.001, 0.001, 0.001, 0.002);
        assert!((summary.distance_m - expected).abs() < 1e-6);
    }
}
