use super::corpus::Corpus;
use super::quantile::{median_sorted, quantile_sorted};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Operator,
    Area,
}

impl GroupBy {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "operator" => Some(GroupBy::Operator),
            "area" => Some(GroupBy::Area),
            _ => None,
        }
    }
}

/// Five-number spread per group plus the Tukey outlier set
/// (value < Q1 - 1.5*IQR or value > Q3 + 1.5*IQR). Groups with fewer
/// than 4 observations get quartiles by the same interpolation rule but
/// no outliers: the fences are meaningless on that little data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupSpread {
    pub group: String,
    pub observations: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub low_fence: f64,
    pub high_fence: f64,
    pub outliers: Vec<f64>,
}

pub fn variability_stats(corpus: &Corpus, group_by: GroupBy) -> Vec<GroupSpread> {
    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for (r, d) in corpus.valid_durations() {
        let key = match group_by {
            GroupBy::Operator => r.operator.clone(),
            GroupBy::Area => r.area.label().to_string(),
        };
        samples.entry(key).or_default().push(d as f64);
    }

    samples
        .into_iter()
        .map(|(group, mut sample)| {
            sample.sort_by(|a, b| a.total_cmp(b));

            // sample is non-empty by construction
            let q1 = quantile_sorted(&sample, 0.25).unwrap_or(0.0);
            let median = median_sorted(&sample).unwrap_or(0.0);
            let q3 = quantile_sorted(&sample, 0.75).unwrap_or(0.0);
            let iqr = q3 - q1;
            let low_fence = q1 - 1.5 * iqr;
            let high_fence = q3 + 1.5 * iqr;

            let outliers = if sample.len() < 4 {
                Vec::new()
            } else {
                sample
                    .iter()
                    .copied()
                    .filter(|v| *v < low_fence || *v > high_fence)
                    .collect()
            };

            GroupSpread {
                group,
                observations: sample.len(),
                q1,
                median,
                q3,
                low_fence,
                high_fence,
                outliers,
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

    fn closed_round(area: Area, duration_secs: i64) -> RoundRecord {
        let start = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        RoundRecord {
            id: 0,
            flight_id: 1,
            area,
            operator: "ada".into(),
            start_time: start,
            end_time: Some(start + chrono::Duration::seconds(duration_secs)),
            duration_secs: Some(duration_secs),
            status: RoundStatus::Closed,
            anomalous: false,
            auto_closed: false,
        }
    }

    #[test]
    fn outlier_beyond_high_fence_is_reported() {
        let mut rounds: Vec<RoundRecord> = (0..8)
            .map(|i| closed_round(Area::Perimeter, 600 + i * 10))
            .collect();
        rounds.push(closed_round(Area::Perimeter, 7200));

        let corpus = Corpus {
            rounds,
            ..Default::default()
        };

        let stats = variability_stats(&corpus, GroupBy::Area);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].outliers, vec![7200.0]);
    }

    #[test]
    fn tiny_group_gets_quartiles_but_no_outliers() {
        let corpus = Corpus {
            rounds: vec![
                closed_round(Area::Parking, 100),
                closed_round(Area::Parking, 100_000),
            ],
            ..Default::default()
        };

        let stats = variability_stats(&corpus, GroupBy::Area);

        assert_eq!(stats[0].observations, 2);
        assert_eq!(stats[0].median, 50_050.0);
        assert!(stats[0].outliers.is_empty());
    }

    #[test]
    fn groups_are_sorted_and_deterministic() {
        let corpus = Corpus {
            rounds: vec![
                closed_round(Area::Slope05, 500),
                closed_round(Area::Parking, 400),
            ],
            ..Default::default()
        };

        let stats = variability_stats(&corpus, GroupBy::Area);
        let names: Vec<&str> = stats.iter().map(|s| s.group.as_str()).collect();

        assert_eq!(names, ["Parking", "Slope 05"]);
    }
}
