use super::corpus::Corpus;
use super::quantile::median_sorted;
use serde::Serialize;
use std::collections::BTreeMap;

/// Volume vs speed, one row per operator. Operators with no closed,
/// non-anomalous round are omitted rather than zero-filled: a median of
/// nothing is not 0.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OperatorEfficiency {
    pub operator: String,
    pub round_count: usize,
    pub median_duration_secs: f64,
}

pub fn operator_efficiency(corpus: &Corpus) -> Vec<OperatorEfficiency> {
    let mut durations: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for r in corpus.rounds.iter().filter(|r| r.is_closed()) {
        *counts.entry(r.operator.as_str()).or_default() += 1;
    }
    for (r, d) in corpus.valid_durations() {
        durations
            .entry(r.operator.as_str())
            .or_default()
            .push(d as f64);
    }

    durations
        .into_iter()
        .map(|(operator, mut sample)| {
            sample.sort_by(|a, b| a.total_cmp(b));
            OperatorEfficiency {
                operator: operator.to_string(),
                round_count: counts.get(operator).copied().unwrap_or(0),
                // sample is non-empty by construction
                median_duration_secs: median_sorted(&sample).unwrap_or(0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::area::Area;
    use crate::models::round::{RoundRecord, RoundStatus};
    use chrono::NaiveDate;

    fn closed_round(operator: &str, duration_secs: i64, anomalous: bool) -> RoundRecord {
        let start = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        RoundRecord {
            id: 0,
            flight_id: 1,
            area: Area::Perimeter,
            operator: operator.into(),
            start_time: start,
            end_time: Some(start + chrono::Duration::seconds(duration_secs)),
            duration_secs: Some(duration_secs),
            status: RoundStatus::Closed,
            anomalous,
            auto_closed: false,
        }
    }

    #[test]
    fn median_over_non_anomalous_durations() {
        let corpus = Corpus {
            rounds: vec![
                closed_round("ada", 600, false),
                closed_round("ada", 900, false),
                closed_round("ada", 1200, false),
                closed_round("ada", 0, true), // anomalous, ignored for the median
            ],
            ..Default::default()
        };

        let matrix = operator_efficiency(&corpus);

        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0].round_count, 4);
        assert_eq!(matrix[0].median_duration_secs, 900.0);
    }

    #[test]
    fn operator_without_valid_rounds_is_excluded() {
        let corpus = Corpus {
            rounds: vec![closed_round("bob", 0, true)],
            ..Default::default()
        };

        assert!(operator_efficiency(&corpus).is_empty());
    }
}
