//! High-level event recording: snapshot load, state-machine apply and
//! delta commit, all inside one IMMEDIATE transaction per event.
//!
//! The transaction gives each apply call exclusive access to the
//! operator's snapshot (single logical writer per operator) and makes
//! the nested MAX+1 flight numbering race-free under concurrent starts.

use crate::core::session::{self, RecordDelta};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::action::ActionEvent;
use crate::utils::time::fmt_ts;
use rusqlite::TransactionBehavior;

#[derive(Debug)]
pub struct AppliedEvent {
    pub delta: RecordDelta,
    pub flight_number: Option<i64>,
    pub warnings: Vec<String>,
}

pub fn record_event(pool: &mut DbPool, event: &ActionEvent) -> AppResult<AppliedEvent> {
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)?;

    let snapshot = queries::load_snapshot(&tx, &event.operator)?;
    let delta = session::apply(&snapshot, event)?;
    let outcome = queries::commit_delta(&tx, &delta)?;

    let mut warnings = Vec::new();
    if let RecordDelta::CloseFlight {
        close_pause,
        auto_close,
        ..
    } = &delta
    {
        if let (Some(auto), Some(round)) = (auto_close, &snapshot.open_round) {
            warnings.push(format!(
                "round over {} was still open and has been auto-closed at {}",
                round.area.label(),
                fmt_ts(auto.end_time)
            ));
        }
        if close_pause.is_some() {
            warnings.push("an open pause has been closed at flight end".into());
        }
    }
    if let RecordDelta::CloseRound {
        anomalous: true, ..
    } = &delta
    {
        warnings.push("round has zero active duration and was flagged anomalous".into());
    }

    ttlog(
        &tx,
        event.kind.as_str(),
        &event.operator,
        &describe(&delta, outcome.flight_number),
    )?;

    tx.commit()?;

    Ok(AppliedEvent {
        delta,
        flight_number: outcome.flight_number,
        warnings,
    })
}

fn describe(delta: &RecordDelta, flight_number: Option<i64>) -> String {
    match delta {
        RecordDelta::OpenFlight { start_time, .. } => format!(
            "flight {:02} opened at {}",
            flight_number.unwrap_or(0),
            fmt_ts(*start_time)
        ),
        RecordDelta::CloseFlight {
            end_time,
            auto_close,
            ..
        } => {
            let suffix = if auto_close.is_some() {
                " (dangling round auto-closed)"
            } else {
                ""
            };
            format!(
                "flight {:02} closed at {}{}",
                flight_number.unwrap_or(0),
                fmt_ts(*end_time),
                suffix
            )
        }
        RecordDelta::OpenRound {
            area, start_time, ..
        } => format!("round over {} started at {}", area.label(), fmt_ts(*start_time)),
        RecordDelta::CloseRound {
            end_time,
            duration_secs,
            anomalous,
            ..
        } => format!(
            "round closed at {} (active {} s{})",
            fmt_ts(*end_time),
            duration_secs,
            if *anomalous { ", anomalous" } else { "" }
        ),
        RecordDelta::OpenPause {
            reason, start_time, ..
        } => format!("{} started at {}", reason.label(), fmt_ts(*start_time)),
        RecordDelta::ClosePause { end_time, .. } => {
            format!("pause closed at {}", fmt_ts(*end_time))
        }
        RecordDelta::AddJustification { area, reason, .. } => {
            format!("round over {} justified: {}", area.label(), reason)
        }
    }
}
