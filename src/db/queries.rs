//! Persistence gateway. The session state machine and the aggregation
//! engine touch SQLite only through the functions in this module.

use crate::core::session::{OperatorSnapshot, RecordDelta};
use crate::errors::{AppError, AppResult};
use crate::models::area::Area;
use crate::models::flight::{FlightRecord, FlightStatus};
use crate::models::justification::JustificationRecord;
use crate::models::pause::{PauseRecord, PauseReason};
use crate::models::round::{RoundRecord, RoundStatus};
use crate::utils::time::{fmt_date, fmt_ts, parse_date, parse_ts};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn bad_text(field: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::DataIntegrity(format!(
            "invalid {}: '{}'",
            field, value
        ))),
    )
}

fn get_ts(row: &Row, field: &str) -> Result<NaiveDateTime> {
    let raw: String = row.get(field)?;
    parse_ts(&raw).ok_or_else(|| bad_text(field, &raw))
}

fn get_opt_ts(row: &Row, field: &str) -> Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(field)?;
    match raw {
        Some(s) => Ok(Some(parse_ts(&s).ok_or_else(|| bad_text(field, &s))?)),
        None => Ok(None),
    }
}

pub fn map_flight_row(row: &Row) -> Result<FlightRecord> {
    let date_str: String = row.get("date")?;
    let date = parse_date(&date_str).ok_or_else(|| bad_text("date", &date_str))?;

    let status_str: String = row.get("status")?;
    let status =
        FlightStatus::from_db_str(&status_str).ok_or_else(|| bad_text("status", &status_str))?;

    Ok(FlightRecord {
        id: row.get("id")?,
        flight_number: row.get("flight_number")?,
        date,
        operator: row.get("operator")?,
        start_time: get_ts(row, "start_time")?,
        end_time: get_opt_ts(row, "end_time")?,
        status,
    })
}

pub fn map_round_row(row: &Row) -> Result<RoundRecord> {
    let area_str: String = row.get("area")?;
    let area = Area::from_db_str(&area_str).ok_or_else(|| bad_text("area", &area_str))?;

    let status_str: String = row.get("status")?;
    let status =
        RoundStatus::from_db_str(&status_str).ok_or_else(|| bad_text("status", &status_str))?;

    Ok(RoundRecord {
        id: row.get("id")?,
        flight_id: row.get("flight_id")?,
        area,
        operator: row.get("operator")?,
        start_time: get_ts(row, "start_time")?,
        end_time: get_opt_ts(row, "end_time")?,
        duration_secs: row.get("duration_secs")?,
        status,
        anomalous: row.get::<_, i64>("anomalous")? == 1,
        auto_closed: row.get::<_, i64>("auto_closed")? == 1,
    })
}

pub fn map_pause_row(row: &Row) -> Result<PauseRecord> {
    let reason_str: String = row.get("reason")?;
    let reason =
        PauseReason::from_db_str(&reason_str).ok_or_else(|| bad_text("reason", &reason_str))?;

    Ok(PauseRecord {
        id: row.get("id")?,
        flight_id: row.get("flight_id")?,
        round_id: row.get("round_id")?,
        reason,
        start_time: get_ts(row, "start_time")?,
        end_time: get_opt_ts(row, "end_time")?,
    })
}

pub fn map_justification_row(row: &Row) -> Result<JustificationRecord> {
    let area_str: String = row.get("area")?;
    let area = Area::from_db_str(&area_str).ok_or_else(|| bad_text("area", &area_str))?;

    let date_str: String = row.get("date")?;
    let date = parse_date(&date_str).ok_or_else(|| bad_text("date", &date_str))?;

    Ok(JustificationRecord {
        id: row.get("id")?,
        flight_id: row.get("flight_id")?,
        area,
        operator: row.get("operator")?,
        date,
        reason: row.get("reason")?,
    })
}

// ---------------------------------------------------------------
// Snapshot loading (strict: malformed state rows are hard errors)
// ---------------------------------------------------------------

/// Load the operator's current session state. Called inside the same
/// transaction that later commits the resulting delta, so one apply call
/// holds exclusive access to the snapshot for its whole duration.
pub fn load_snapshot(conn: &Connection, operator: &str) -> AppResult<OperatorSnapshot> {
    let open_flight: Option<FlightRecord> = conn
        .query_row(
            "SELECT * FROM flights
             WHERE operator = ?1 AND status = 'open'
             ORDER BY id DESC LIMIT 1",
            [operator],
            map_flight_row,
        )
        .optional()?;

    let mut open_round = None;
    let mut round_pauses = Vec::new();
    let mut covered_areas = Vec::new();

    if let Some(flight) = &open_flight {
        open_round = conn
            .query_row(
                "SELECT * FROM rounds
                 WHERE flight_id = ?1 AND status = 'open'
                 ORDER BY id DESC LIMIT 1",
                [flight.id],
                map_round_row,
            )
            .optional()?;

        if let Some(round) = &open_round {
            let mut stmt = conn.prepare(
                "SELECT * FROM pauses WHERE round_id = ?1 ORDER BY start_time ASC, id ASC",
            )?;
            let rows = stmt.query_map([round.id], map_pause_row)?;
            for r in rows {
                round_pauses.push(r?);
            }
        }

        let mut stmt = conn.prepare(
            "SELECT area FROM rounds WHERE flight_id = ?1 AND status = 'closed'
             UNION
             SELECT area FROM justifications WHERE flight_id = ?1",
        )?;
        let rows = stmt.query_map([flight.id], |row| row.get::<_, String>(0))?;
        for r in rows {
            let code = r?;
            let area = Area::from_db_str(&code)
                .ok_or_else(|| AppError::DataIntegrity(format!("invalid area: '{}'", code)))?;
            covered_areas.push(area);
        }
    }

    let open_pause: Option<PauseRecord> = conn
        .query_row(
            "SELECT p.* FROM pauses p
             JOIN flights f ON f.id = p.flight_id
             WHERE f.operator = ?1 AND p.end_time IS NULL
             ORDER BY p.id DESC LIMIT 1",
            [operator],
            map_pause_row,
        )
        .optional()?;

    let last_event_at = load_last_event_at(conn, operator)?;

    Ok(OperatorSnapshot {
        operator: operator.to_string(),
        open_flight,
        open_round,
        open_pause,
        round_pauses,
        covered_areas,
        last_event_at,
    })
}

/// Latest start/end instant across the operator's records. Timestamps are
/// stored as sortable ISO text, so MAX over TEXT is chronological.
fn load_last_event_at(conn: &Connection, operator: &str) -> AppResult<Option<NaiveDateTime>> {
    let raw: Option<String> = conn.query_row(
        "SELECT MAX(t) FROM (
             SELECT MAX(start_time) AS t FROM flights WHERE operator = ?1
             UNION ALL SELECT MAX(end_time) FROM flights WHERE operator = ?1
             UNION ALL SELECT MAX(start_time) FROM rounds WHERE operator = ?1
             UNION ALL SELECT MAX(end_time) FROM rounds WHERE operator = ?1
             UNION ALL SELECT MAX(p.start_time) FROM pauses p
                 JOIN flights f ON f.id = p.flight_id WHERE f.operator = ?1
             UNION ALL SELECT MAX(p.end_time) FROM pauses p
                 JOIN flights f ON f.id = p.flight_id WHERE f.operator = ?1
         )",
        [operator],
        |row| row.get(0),
    )?;

    match raw {
        Some(s) => Ok(Some(parse_ts(&s).ok_or_else(|| {
            AppError::DataIntegrity(format!("invalid timestamp: '{}'", s))
        })?)),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------
// Delta commit
// ---------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CommitOutcome {
    pub flight_id: Option<i64>,
    pub flight_number: Option<i64>,
    pub round_id: Option<i64>,
    pub pause_id: Option<i64>,
    pub justification_id: Option<i64>,
}

/// Persist one state-machine delta. Must run inside the transaction that
/// loaded the snapshot; the nested MAX+1 keeps daily flight numbering
/// race-free across concurrent writers.
pub fn commit_delta(conn: &Connection, delta: &RecordDelta) -> AppResult<CommitOutcome> {
    let mut outcome = CommitOutcome::default();

    match delta {
        RecordDelta::OpenFlight {
            operator,
            date,
            start_time,
        } => {
            conn.execute(
                "INSERT INTO flights (flight_number, date, operator, start_time, end_time, status)
                 VALUES (
                     (SELECT COALESCE(MAX(flight_number), 0) + 1 FROM flights WHERE date = ?1),
                     ?1, ?2, ?3, NULL, 'open'
                 )",
                params![fmt_date(*date), operator, fmt_ts(*start_time)],
            )?;
            let id = conn.last_insert_rowid();
            let number: i64 =
                conn.query_row("SELECT flight_number FROM flights WHERE id = ?1", [id], |r| {
                    r.get(0)
                })?;
            outcome.flight_id = Some(id);
            outcome.flight_number = Some(number);
        }

        RecordDelta::CloseFlight {
            flight_id,
            end_time,
            close_pause,
            auto_close,
        } => {
            if let Some(pause_id) = close_pause {
                close_pause_row(conn, *pause_id, *end_time)?;
            }
            if let Some(auto) = auto_close {
                conn.execute(
                    "UPDATE rounds
                     SET end_time = ?1, duration_secs = ?2, status = 'closed',
                         anomalous = ?3, auto_closed = 1
                     WHERE id = ?4",
                    params![
                        fmt_ts(auto.end_time),
                        auto.duration_secs,
                        auto.anomalous as i64,
                        auto.round_id
                    ],
                )?;
                outcome.round_id = Some(auto.round_id);
            }
            conn.execute(
                "UPDATE flights SET end_time = ?1, status = 'closed' WHERE id = ?2",
                params![fmt_ts(*end_time), flight_id],
            )?;
            outcome.flight_id = Some(*flight_id);
            outcome.flight_number = Some(conn.query_row(
                "SELECT flight_number FROM flights WHERE id = ?1",
                [flight_id],
                |r| r.get(0),
            )?);
        }

        RecordDelta::OpenRound {
            flight_id,
            area,
            operator,
            start_time,
        } => {
            conn.execute(
                "INSERT INTO rounds (flight_id, area, operator, start_time, status)
                 VALUES (?1, ?2, ?3, ?4, 'open')",
                params![flight_id, area.to_db_str(), operator, fmt_ts(*start_time)],
            )?;
            outcome.round_id = Some(conn.last_insert_rowid());
        }

        RecordDelta::CloseRound {
            round_id,
            end_time,
            duration_secs,
            anomalous,
            close_pause,
        } => {
            if let Some(pause_id) = close_pause {
                close_pause_row(conn, *pause_id, *end_time)?;
            }
            conn.execute(
                "UPDATE rounds
                 SET end_time = ?1, duration_secs = ?2, status = 'closed', anomalous = ?3
                 WHERE id = ?4",
                params![fmt_ts(*end_time), duration_secs, *anomalous as i64, round_id],
            )?;
            outcome.round_id = Some(*round_id);
        }

        RecordDelta::OpenPause {
            flight_id,
            round_id,
            reason,
            start_time,
        } => {
            conn.execute(
                "INSERT INTO pauses (flight_id, round_id, reason, start_time)
                 VALUES (?1, ?2, ?3, ?4)",
                params![flight_id, round_id, reason.to_db_str(), fmt_ts(*start_time)],
            )?;
            outcome.pause_id = Some(conn.last_insert_rowid());
        }

        RecordDelta::ClosePause { pause_id, end_time } => {
            close_pause_row(conn, *pause_id, *end_time)?;
            outcome.pause_id = Some(*pause_id);
        }

        RecordDelta::AddJustification {
            flight_id,
            area,
            operator,
            date,
            reason,
        } => {
            conn.execute(
                "INSERT INTO justifications (flight_id, area, operator, date, reason)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    flight_id,
                    area.to_db_str(),
                    operator,
                    fmt_date(*date),
                    reason
                ],
            )?;
            outcome.justification_id = Some(conn.last_insert_rowid());
        }
    }

    Ok(outcome)
}

fn close_pause_row(conn: &Connection, pause_id: i64, end_time: NaiveDateTime) -> AppResult<()> {
    conn.execute(
        "UPDATE pauses SET end_time = ?1 WHERE id = ?2",
        params![fmt_ts(end_time), pause_id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------
// Corpus loading (lenient: malformed rows are counted, not fatal)
// ---------------------------------------------------------------

fn window_clause(column: &str, window: Option<(NaiveDate, NaiveDate)>) -> (String, Vec<String>) {
    match window {
        Some((from, to)) => (
            format!(
                " WHERE substr({col}, 1, 10) >= ?1 AND substr({col}, 1, 10) <= ?2",
                col = column
            ),
            vec![fmt_date(from), fmt_date(to)],
        ),
        None => (String::new(), Vec::new()),
    }
}

fn load_lenient<T>(
    conn: &Connection,
    sql: &str,
    bind: &[String],
    map: fn(&Row) -> Result<T>,
) -> AppResult<(Vec<T>, usize)> {
    let mut stmt = conn.prepare(sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = bind.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let rows = stmt.query_map(rusqlite::params_from_iter(params), map)?;

    let mut out = Vec::new();
    let mut skipped = 0;
    for r in rows {
        match r {
            Ok(v) => out.push(v),
            Err(_) => skipped += 1,
        }
    }
    Ok((out, skipped))
}

pub fn load_flights(
    conn: &Connection,
    window: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<(Vec<FlightRecord>, usize)> {
    let (clause, bind) = window_clause("start_time", window);
    let sql = format!(
        "SELECT * FROM flights{} ORDER BY start_time ASC, id ASC",
        clause
    );
    load_lenient(conn, &sql, &bind, map_flight_row)
}

pub fn load_rounds(
    conn: &Connection,
    window: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<(Vec<RoundRecord>, usize)> {
    let (clause, bind) = window_clause("start_time", window);
    let sql = format!(
        "SELECT * FROM rounds{} ORDER BY start_time ASC, id ASC",
        clause
    );
    load_lenient(conn, &sql, &bind, map_round_row)
}

pub fn load_pauses(
    conn: &Connection,
    window: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<(Vec<PauseRecord>, usize)> {
    let (clause, bind) = window_clause("start_time", window);
    let sql = format!(
        "SELECT * FROM pauses{} ORDER BY start_time ASC, id ASC",
        clause
    );
    load_lenient(conn, &sql, &bind, map_pause_row)
}

pub fn load_justifications(
    conn: &Connection,
    window: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<(Vec<JustificationRecord>, usize)> {
    let (clause, bind) = window_clause("date", window);
    let sql = format!(
        "SELECT * FROM justifications{} ORDER BY date ASC, id ASC",
        clause
    );
    load_lenient(conn, &sql, &bind, map_justification_row)
}

// ---------------------------------------------------------------
// Import inserts (records arrive already closed)
// ---------------------------------------------------------------

pub fn insert_flight_record(conn: &Connection, f: &FlightRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO flights (flight_number, date, operator, start_time, end_time, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            f.flight_number,
            f.date_str(),
            f.operator,
            f.start_str(),
            f.end_time.map(fmt_ts),
            f.status.to_db_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_round_record(conn: &Connection, r: &RoundRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO rounds (flight_id, area, operator, start_time, end_time,
                             duration_secs, status, anomalous, auto_closed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            r.flight_id,
            r.area.to_db_str(),
            r.operator,
            r.start_str(),
            r.end_time.map(fmt_ts),
            r.duration_secs,
            r.status.to_db_str(),
            r.anomalous as i64,
            r.auto_closed as i64
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_pause_record(conn: &Connection, p: &PauseRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO pauses (flight_id, round_id, reason, start_time, end_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            p.flight_id,
            p.round_id,
            p.reason.to_db_str(),
            fmt_ts(p.start_time),
            p.end_time.map(fmt_ts)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_justification_record(
    conn: &Connection,
    j: &JustificationRecord,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO justifications (flight_id, area, operator, date, reason)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            j.flight_id,
            j.area.to_db_str(),
            j.operator,
            fmt_date(j.date),
            j.reason
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Locate a flight by its stable identity (day + number), used by import.
pub fn find_flight_by_number(
    conn: &Connection,
    date: NaiveDate,
    flight_number: i64,
) -> AppResult<Option<FlightRecord>> {
    Ok(conn
        .query_row(
            "SELECT * FROM flights WHERE date = ?1 AND flight_number = ?2",
            params![fmt_date(date), flight_number],
            map_flight_row,
        )
        .optional()?)
}

// ---------------------------------------------------------------
// Administrative clear
// ---------------------------------------------------------------

/// Remove every operational record. The audit log is kept: the clear
/// itself must remain visible after the fact.
pub fn clear_all(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "DELETE FROM pauses;
         DELETE FROM justifications;
         DELETE FROM rounds;
         DELETE FROM flights;",
    )?;
    Ok(())
}
