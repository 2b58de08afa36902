//! Flat tabular projection of flights, rounds and pauses: one row per
//! round or justification, with the derived duration and the anomaly
//! flag as plain columns. The same shape is accepted back by `import`.

use crate::analytics::corpus::Corpus;
use crate::models::round::RoundStatus;
use serde::Serialize;

pub const STATUS_JUSTIFIED: &str = "justified";

#[derive(Serialize, Clone, Debug)]
pub struct PatrolRow {
    pub flight_number: i64,
    pub flight_date: String,
    pub flight_start: String,
    pub flight_end: String,
    pub operator: String,
    pub area: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: String,
    pub paused_secs: String,
    pub status: String,
    pub anomalous: String,
    pub auto_closed: String,
    pub reason: String,
}

/// Header for CSV / JSON, kept in one place so export and import cannot
/// drift apart.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "flight_number",
        "flight_date",
        "flight_start",
        "flight_end",
        "operator",
        "area",
        "start_time",
        "end_time",
        "duration_secs",
        "paused_secs",
        "status",
        "anomalous",
        "auto_closed",
        "reason",
    ]
}

pub(crate) fn row_to_record(row: &PatrolRow) -> Vec<String> {
    vec![
        row.flight_number.to_string(),
        row.flight_date.clone(),
        row.flight_start.clone(),
        row.flight_end.clone(),
        row.operator.clone(),
        row.area.clone(),
        row.start_time.clone(),
        row.end_time.clone(),
        row.duration_secs.clone(),
        row.paused_secs.clone(),
        row.status.clone(),
        row.anomalous.clone(),
        row.auto_closed.clone(),
        row.reason.clone(),
    ]
}

/// Project the corpus into rows, rounds first, then justifications,
/// each block in chronological order.
pub fn corpus_to_rows(corpus: &Corpus) -> Vec<PatrolRow> {
    let mut rows = Vec::new();

    for r in &corpus.rounds {
        let Some(flight) = corpus.flight(r.flight_id) else {
            continue;
        };

        let paused: i64 = corpus
            .pauses
            .iter()
            .filter(|p| p.round_id == Some(r.id))
            .filter_map(|p| p.duration_secs())
            .sum();

        rows.push(PatrolRow {
            flight_number: flight.flight_number,
            flight_date: flight.date_str(),
            flight_start: flight.start_str(),
            flight_end: flight.end_str(),
            operator: r.operator.clone(),
            area: r.area.to_db_str().to_string(),
            start_time: r.start_str(),
            end_time: r.end_str(),
            duration_secs: r
                .duration_secs
                .map(|d| d.to_string())
                .unwrap_or_default(),
            paused_secs: paused.to_string(),
            status: match r.status {
                RoundStatus::Open => "open".into(),
                RoundStatus::Closed => "closed".into(),
            },
            anomalous: (r.anomalous as i64).to_string(),
            auto_closed: (r.auto_closed as i64).to_string(),
            reason: String::new(),
        });
    }

    for j in &corpus.justifications {
        let Some(flight) = corpus.flight(j.flight_id) else {
            continue;
        };

        rows.push(PatrolRow {
            flight_number: flight.flight_number,
            flight_date: flight.date_str(),
            flight_start: flight.start_str(),
            flight_end: flight.end_str(),
            operator: j.operator.clone(),
            area: j.area.to_db_str().to_string(),
            start_time: String::new(),
            end_time: String::new(),
            duration_secs: String::new(),
            paused_secs: String::new(),
            status: STATUS_JUSTIFIED.into(),
            anomalous: "0".into(),
            auto_closed: "0".into(),
            reason: j.reason.clone(),
        });
    }

    rows
}
