//! Bulk import of the flat export shape. Import is not a raw table
//! load: every row is validated against the same invariants the session
//! state machine enforces (area vocabulary, non-overlapping rounds per
//! operator, one open flight per operator, justified rows carrying a
//! reason). A bad row is rejected and reported; the rest continue. Each
//! row commits in its own transaction, so a storage failure aborts only
//! the row it hit.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::area::Area;
use crate::models::flight::{FlightRecord, FlightStatus};
use crate::models::justification::JustificationRecord;
use crate::models::pause::{PauseRecord, PauseReason};
use crate::models::round::{RoundRecord, RoundStatus};
use crate::utils::time::{fmt_ts, parse_date, parse_ts};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::collections::HashMap;

#[derive(Debug)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: Vec<(usize, String)>,
}

struct ParsedRow {
    flight_number: i64,
    flight_date: NaiveDate,
    flight_start: NaiveDateTime,
    flight_end: Option<NaiveDateTime>,
    operator: String,
    area: Area,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    paused_secs: i64,
    status: String,
    auto_closed: bool,
    reason: String,
}

pub fn run_import(pool: &mut DbPool, file: &str) -> AppResult<ImportSummary> {
    let mut reader = csv::Reader::from_path(file)
        .map_err(|e| AppError::Import(format!("cannot open '{}': {}", file, e)))?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::Import(format!("cannot read header: {}", e)))?
        .clone();
    let index: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();

    for required in crate::export::model::get_headers() {
        if !index.contains_key(required) {
            return Err(AppError::Import(format!(
                "missing column '{}' in '{}'",
                required, file
            )));
        }
    }

    let mut summary = ImportSummary {
        imported: 0,
        rejected: Vec::new(),
    };

    for (i, record) in reader.records().enumerate() {
        let line = i + 1;

        let result = record
            .map_err(|e| AppError::Import(format!("unreadable row: {}", e)))
            .and_then(|rec| {
                let field = |name: &str| rec.get(index[name]).unwrap_or("").trim().to_string();
                parse_row(&field_map(field))
            })
            .and_then(|row| insert_row(pool, &row));

        match result {
            Ok(()) => summary.imported += 1,
            Err(e) => summary.rejected.push((line, e.to_string())),
        }
    }

    ttlog(
        &pool.conn,
        "import",
        file,
        &format!(
            "{} row(s) imported, {} rejected",
            summary.imported,
            summary.rejected.len()
        ),
    )?;

    Ok(summary)
}

fn field_map<F: Fn(&str) -> String>(field: F) -> HashMap<&'static str, String> {
    crate::export::model::get_headers()
        .into_iter()
        .map(|h| (h, field(h)))
        .collect()
}

fn parse_row(fields: &HashMap<&'static str, String>) -> AppResult<ParsedRow> {
    let get = |name: &str| fields.get(name).cloned().unwrap_or_default();

    let flight_number: i64 = get("flight_number")
        .parse()
        .map_err(|_| AppError::Import(format!("invalid flight_number '{}'", get("flight_number"))))?;

    let flight_date = parse_date(&get("flight_date"))
        .ok_or_else(|| AppError::InvalidDate(get("flight_date")))?;

    let flight_start = parse_ts(&get("flight_start"))
        .ok_or_else(|| AppError::InvalidTimestamp(get("flight_start")))?;

    let flight_end = opt_ts(&get("flight_end"))?;

    let operator = get("operator");
    if operator.is_empty() {
        return Err(AppError::Import("missing operator".into()));
    }

    let area_raw = get("area");
    let area = Area::from_code(&area_raw).ok_or(AppError::InvalidArea(area_raw))?;

    let paused_secs: i64 = match get("paused_secs").as_str() {
        "" => 0,
        s => s
            .parse()
            .map_err(|_| AppError::Import(format!("invalid paused_secs '{}'", s)))?,
    };

    Ok(ParsedRow {
        flight_number,
        flight_date,
        flight_start,
        flight_end,
        operator,
        area,
        start_time: opt_ts(&get("start_time"))?,
        end_time: opt_ts(&get("end_time"))?,
        paused_secs,
        status: get("status").to_lowercase(),
        auto_closed: get("auto_closed") == "1",
        reason: get("reason"),
    })
}

fn opt_ts(s: &str) -> AppResult<Option<NaiveDateTime>> {
    if s.is_empty() {
        Ok(None)
    } else {
        Ok(Some(
            parse_ts(s).ok_or_else(|| AppError::InvalidTimestamp(s.to_string()))?,
        ))
    }
}

fn insert_row(pool: &mut DbPool, row: &ParsedRow) -> AppResult<()> {
    let tx = pool.conn.transaction()?;

    let flight_id = resolve_flight(&tx, row)?;

    match row.status.as_str() {
        "closed" => {
            let start = row
                .start_time
                .ok_or_else(|| AppError::Import("closed round without start_time".into()))?;
            let end = row
                .end_time
                .ok_or_else(|| AppError::Import("closed round without end_time".into()))?;
            if end < start {
                return Err(AppError::Import("end_time precedes start_time".into()));
            }

            check_no_overlap(&tx, &row.operator, start, end)?;

            // Duration is re-derived, not trusted from the file, so the
            // anomaly flag always matches the stored value.
            let raw = (end - start).num_seconds() - row.paused_secs;
            let (duration, anomalous) = (raw.max(0), raw <= 0);

            let round_id = queries::insert_round_record(
                &tx,
                &RoundRecord {
                    id: 0,
                    flight_id,
                    area: row.area,
                    operator: row.operator.clone(),
                    start_time: start,
                    end_time: Some(end),
                    duration_secs: Some(duration),
                    status: RoundStatus::Closed,
                    anomalous,
                    auto_closed: row.auto_closed,
                },
            )?;

            // The flat projection carries pause time only as a total, so
            // one aggregate pause is recreated at the start of the round,
            // capped to the round span. Re-exporting then reproduces the
            // same paused_secs column.
            if row.paused_secs > 0 {
                let paused = row.paused_secs.min((end - start).num_seconds());
                queries::insert_pause_record(
                    &tx,
                    &PauseRecord {
                        id: 0,
                        flight_id,
                        round_id: Some(round_id),
                        reason: PauseReason::Other,
                        start_time: start,
                        end_time: Some(start + chrono::Duration::seconds(paused)),
                    },
                )?;
            }
        }

        "justified" => {
            if row.reason.is_empty() {
                return Err(AppError::InvalidReason(
                    "justified row without a reason".into(),
                ));
            }

            let covered: i64 = tx.query_row(
                "SELECT (SELECT COUNT(*) FROM rounds
                          WHERE flight_id = ?1 AND area = ?2 AND status = 'closed')
                      + (SELECT COUNT(*) FROM justifications
                          WHERE flight_id = ?1 AND area = ?2)",
                rusqlite::params![flight_id, row.area.to_db_str()],
                |r| r.get(0),
            )?;
            if covered > 0 {
                return Err(AppError::IllegalTransition(format!(
                    "{} already patrolled or justified in flight {:02}",
                    row.area.label(),
                    row.flight_number
                )));
            }

            queries::insert_justification_record(
                &tx,
                &JustificationRecord {
                    id: 0,
                    flight_id,
                    area: row.area,
                    operator: row.operator.clone(),
                    date: row.flight_date,
                    reason: row.reason.clone(),
                },
            )?;
        }

        "open" => {
            return Err(AppError::Import(
                "open rounds cannot be imported; close them before exporting".into(),
            ));
        }

        other => {
            return Err(AppError::InvalidStatus(other.to_string()));
        }
    }

    tx.commit()?;
    Ok(())
}

/// Find the owning flight by its stable (date, number) identity, or
/// recreate it from the row's flight columns.
fn resolve_flight(conn: &Connection, row: &ParsedRow) -> AppResult<i64> {
    if let Some(existing) = queries::find_flight_by_number(conn, row.flight_date, row.flight_number)?
    {
        if existing.operator != row.operator {
            return Err(AppError::DataIntegrity(format!(
                "flight {:02} on {} belongs to '{}', row says '{}'",
                row.flight_number,
                row.flight_date,
                existing.operator,
                row.operator
            )));
        }
        return Ok(existing.id);
    }

    let status = if row.flight_end.is_some() {
        FlightStatus::Closed
    } else {
        FlightStatus::Open
    };

    if status == FlightStatus::Open {
        let open_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM flights WHERE operator = ?1 AND status = 'open'",
            [&row.operator],
            |r| r.get(0),
        )?;
        if open_count > 0 {
            return Err(AppError::IllegalTransition(format!(
                "operator '{}' already has an open flight",
                row.operator
            )));
        }
    }

    queries::insert_flight_record(
        conn,
        &FlightRecord {
            id: 0,
            flight_number: row.flight_number,
            date: row.flight_date,
            operator: row.operator.clone(),
            start_time: row.flight_start,
            end_time: row.flight_end,
            status,
        },
    )
}

fn check_no_overlap(
    conn: &Connection,
    operator: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> AppResult<()> {
    let overlapping: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rounds
         WHERE operator = ?1 AND end_time IS NOT NULL
           AND start_time < ?3 AND end_time > ?2",
        rusqlite::params![operator, fmt_ts(start), fmt_ts(end)],
        |r| r.get(0),
    )?;

    if overlapping > 0 {
        return Err(AppError::IllegalTransition(format!(
            "round {} -> {} overlaps an existing round for operator '{}'",
            start, end, operator
        )));
    }
    Ok(())
}
