use super::corpus::Corpus;
use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "day" => Some(Granularity::Day),
            "month" => Some(Granularity::Month),
            _ => None,
        }
    }

    fn key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
            Granularity::Month => date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeriodBucket {
    pub period: String,
    pub flight_count: usize,
    pub round_count: usize,
}

/// Flight and round volume per period, ascending. Sparse by default:
/// periods without activity appear only when `zero_fill` is requested.
pub fn temporal_rollup(corpus: &Corpus, granularity: Granularity, zero_fill: bool) -> Vec<PeriodBucket> {
    let mut flights_per: BTreeMap<String, usize> = BTreeMap::new();
    let mut rounds_per: BTreeMap<String, usize> = BTreeMap::new();

    for f in &corpus.flights {
        *flights_per.entry(granularity.key(f.date)).or_default() += 1;
    }
    for r in &corpus.rounds {
        *rounds_per.entry(granularity.key(r.start_time.date())).or_default() += 1;
    }

    let mut periods: BTreeMap<String, ()> = BTreeMap::new();
    for k in flights_per.keys().chain(rounds_per.keys()) {
        periods.insert(k.clone(), ());
    }

    if zero_fill && !periods.is_empty() {
        let dates: Vec<NaiveDate> = corpus
            .flights
            .iter()
            .map(|f| f.date)
            .chain(corpus.rounds.iter().map(|r| r.start_time.date()))
            .collect();
        let first = *dates.iter().min().unwrap();
        let last = *dates.iter().max().unwrap();

        let mut cursor = first;
        while cursor <= last {
            periods.insert(granularity.key(cursor), ());
            cursor = match granularity {
                Granularity::Day => cursor + Days::new(1),
                Granularity::Month => cursor + Months::new(1),
            };
        }
    }

    periods
        .into_keys()
        .map(|period| PeriodBucket {
            flight_count: flights_per.get(&period).copied().unwrap_or(0),
            round_count: rounds_per.get(&period).copied().unwrap_or(0),
            period,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::flight::{FlightRecord, FlightStatus};
    use chrono::NaiveDate;

    fn flight_on(day: u32) -> FlightRecord {
        let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
        FlightRecord {
            id: day as i64,
            flight_number: 1,
            date,
            operator: "ada".into(),
            start_time: date.and_hms_opt(8, 0, 0).unwrap(),
            end_time: None,
            status: FlightStatus::Open,
        }
    }

    #[test]
    fn rollup_is_sparse_by_default() {
        let corpus = Corpus {
            flights: vec![flight_on(1), flight_on(4)],
            ..Default::default()
        };

        let buckets = temporal_rollup(&corpus, Granularity::Day, false);
        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();

        assert_eq!(periods, ["2026-02-01", "2026-02-04"]);
    }

    #[test]
    fn zero_fill_synthesizes_missing_periods() {
        let corpus = Corpus {
            flights: vec![flight_on(1), flight_on(4)],
            ..Default::default()
        };

        let buckets = temporal_rollup(&corpus, Granularity::Day, true);

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[1].period, "2026-02-02");
        assert_eq!(buckets[1].flight_count, 0);
    }
}
