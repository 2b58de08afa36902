use super::corpus::Corpus;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Activity counts per (weekday, hour of day), derived from start times
/// in the local zone the records were captured in. The shape is always
/// the full 7x24 grid; buckets without observations stay 0.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Heatmap {
    pub counts: [[u64; 24]; 7],
}

impl Heatmap {
    fn bump(&mut self, at: NaiveDateTime) {
        let weekday = at.weekday().num_days_from_monday() as usize;
        let hour = at.hour() as usize;
        self.counts[weekday][hour] += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            counts: [[0; 24]; 7],
        }
    }
}

/// Every record with a start instant counts as one activity: flight
/// starts, round starts and pause starts.
pub fn heatmap(corpus: &Corpus) -> Heatmap {
    let mut map = Heatmap::default();

    for f in &corpus.flights {
        map.bump(f.start_time);
    }
    for r in &corpus.rounds {
        map.bump(r.start_time);
    }
    for p in &corpus.pauses {
        map.bump(p.start_time);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::area::Area;
    use crate::models::round::{RoundRecord, RoundStatus};
    use chrono::NaiveDate;

    #[test]
    fn empty_corpus_yields_full_zero_grid() {
        let map = heatmap(&Corpus::default());

        assert_eq!(map.counts.len(), 7);
        assert!(map.counts.iter().all(|day| day.len() == 24));
        assert_eq!(map.total(), 0);
    }

    #[test]
    fn round_start_lands_in_weekday_hour_bucket() {
        // 2026-03-11 is a Wednesday.
        let start = NaiveDate::from_ymd_opt(2026, 3, 11)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let corpus = Corpus {
            rounds: vec![RoundRecord {
                id: 1,
                flight_id: 1,
                area: Area::Perimeter,
                operator: "ada".into(),
                start_time: start,
                end_time: None,
                duration_secs: None,
                status: RoundStatus::Open,
                anomalous: false,
                auto_closed: false,
            }],
            ..Default::default()
        };

        let map = heatmap(&corpus);

        assert_eq!(map.counts[2][14], 1);
        assert_eq!(map.total(), 1);
    }
}
