use super::corpus::Corpus;
use serde::Serialize;

/// Headline figures for the dashboard. An empty corpus yields zeros,
/// never an error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KpiSummary {
    pub total_flights: usize,
    pub total_operation_hours: f64,
    /// Mean active duration (seconds) over closed rounds with a positive
    /// duration; anomalous rounds are excluded.
    pub avg_round_duration_secs: f64,
    pub round_count: usize,
    pub justification_count: usize,
    pub skipped_records: usize,
}

pub fn kpi_summary(corpus: &Corpus) -> KpiSummary {
    let total_secs: i64 = corpus
        .rounds
        .iter()
        .filter(|r| r.is_closed())
        .filter_map(|r| r.duration_secs)
        .sum();

    let valid: Vec<i64> = corpus.valid_durations().map(|(_, d)| d).collect();
    let avg = if valid.is_empty() {
        0.0
    } else {
        valid.iter().sum::<i64>() as f64 / valid.len() as f64
    };

    KpiSummary {
        total_flights: corpus.flights.len(),
        total_operation_hours: total_secs as f64 / 3600.0,
        avg_round_duration_secs: avg,
        round_count: corpus.rounds.len(),
        justification_count: corpus.justifications.len(),
        skipped_records: corpus.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus_yields_all_zero_fields() {
        let summary = kpi_summary(&Corpus::default());

        assert_eq!(summary.total_flights, 0);
        assert_eq!(summary.total_operation_hours, 0.0);
        assert_eq!(summary.avg_round_duration_secs, 0.0);
        assert_eq!(summary.round_count, 0);
        assert_eq!(summary.justification_count, 0);
    }
}
