//! Session state machine: turns one operator's action events into valid
//! record transitions.
//!
//! `apply` is a pure function of the operator's current snapshot and one
//! event. It returns the persistence delta to commit, or an error; it
//! never mutates the snapshot, so a failed apply leaves prior state
//! untouched by construction. The caller commits the delta inside a
//! single database transaction and reloads the snapshot afterwards.

use crate::errors::{AppError, AppResult};
use crate::models::action::{ActionEvent, ActionKind};
use crate::models::area::Area;
use crate::models::flight::FlightRecord;
use crate::models::pause::{PauseRecord, PauseReason};
use crate::models::round::RoundRecord;
use chrono::{NaiveDate, NaiveDateTime};

/// Per-operator state read from the store before each apply call.
#[derive(Debug, Clone, Default)]
pub struct OperatorSnapshot {
    pub operator: String,
    pub open_flight: Option<FlightRecord>,
    pub open_round: Option<RoundRecord>,
    pub open_pause: Option<PauseRecord>,
    /// All pauses of the open round (closed and open), for duration math.
    pub round_pauses: Vec<PauseRecord>,
    /// Areas already closed or justified within the open flight.
    pub covered_areas: Vec<Area>,
    /// Latest timestamp of any applied event for this operator.
    pub last_event_at: Option<NaiveDateTime>,
}

/// Closure of a still-open round forced by a flight end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoClose {
    pub round_id: i64,
    pub end_time: NaiveDateTime,
    pub duration_secs: i64,
    pub anomalous: bool,
}

/// The persistence intent produced by one successful apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDelta {
    OpenFlight {
        operator: String,
        date: NaiveDate,
        start_time: NaiveDateTime,
    },
    CloseFlight {
        flight_id: i64,
        end_time: NaiveDateTime,
        /// Pause still open at flight end, closed at the same instant.
        close_pause: Option<i64>,
        /// Round still open at flight end, closed with a marker.
        auto_close: Option<AutoClose>,
    },
    OpenRound {
        flight_id: i64,
        area: Area,
        operator: String,
        start_time: NaiveDateTime,
    },
    CloseRound {
        round_id: i64,
        end_time: NaiveDateTime,
        duration_secs: i64,
        anomalous: bool,
        /// Pause still open inside the round, closed at the same instant.
        close_pause: Option<i64>,
    },
    OpenPause {
        flight_id: i64,
        round_id: Option<i64>,
        reason: PauseReason,
        start_time: NaiveDateTime,
    },
    ClosePause {
        pause_id: i64,
        end_time: NaiveDateTime,
    },
    AddJustification {
        flight_id: i64,
        area: Area,
        operator: String,
        date: NaiveDate,
        reason: String,
    },
}

pub fn apply(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    if let Some(last) = snapshot.last_event_at
        && event.at < last
    {
        return Err(AppError::NonMonotonicTime(format!(
            "event at {} precedes last event at {} for operator '{}'",
            event.at, last, event.operator
        )));
    }

    match event.kind {
        ActionKind::FlightStart => apply_flight_start(snapshot, event),
        ActionKind::FlightEnd => apply_flight_end(snapshot, event),
        ActionKind::RoundStart => apply_round_start(snapshot, event),
        ActionKind::RoundEnd => apply_round_end(snapshot, event),
        ActionKind::PauseStart => apply_pause_start(snapshot, event),
        ActionKind::PauseEnd => apply_pause_end(snapshot, event),
        ActionKind::Justify => apply_justify(snapshot, event),
    }
}

fn apply_flight_start(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    if let Some(open) = &snapshot.open_flight {
        return Err(AppError::IllegalTransition(format!(
            "flight {} already open for operator '{}'",
            open.flight_number, event.operator
        )));
    }

    Ok(RecordDelta::OpenFlight {
        operator: event.operator.clone(),
        date: event.at.date(),
        start_time: event.at,
    })
}

fn apply_flight_end(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    let flight = snapshot.open_flight.as_ref().ok_or_else(|| {
        AppError::IllegalTransition(format!("no open flight for operator '{}'", event.operator))
    })?;

    let close_pause = snapshot.open_pause.as_ref().map(|p| p.id);

    // A round left open at flight end is closed at the flight's end time
    // and marked auto-closed, rather than being lost or left dangling.
    let auto_close = match &snapshot.open_round {
        Some(round) => {
            let (duration_secs, anomalous) =
                active_duration(round, &snapshot.round_pauses, event.at);
            Some(AutoClose {
                round_id: round.id,
                end_time: event.at,
                duration_secs,
                anomalous,
            })
        }
        None => None,
    };

    Ok(RecordDelta::CloseFlight {
        flight_id: flight.id,
        end_time: event.at,
        close_pause,
        auto_close,
    })
}

fn apply_round_start(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    let flight = snapshot.open_flight.as_ref().ok_or_else(|| {
        AppError::IllegalTransition(format!(
            "cannot start a round without an open flight (operator '{}')",
            event.operator
        ))
    })?;

    if let Some(round) = &snapshot.open_round {
        return Err(AppError::IllegalTransition(format!(
            "round over {} already open since {}",
            round.area.label(),
            round.start_str()
        )));
    }

    if snapshot.open_pause.is_some() {
        return Err(AppError::IllegalTransition(
            "cannot start a round while a pause is in progress".into(),
        ));
    }

    let area = event
        .area
        .ok_or_else(|| AppError::InvalidArea("round start requires an area".into()))?;

    Ok(RecordDelta::OpenRound {
        flight_id: flight.id,
        area,
        operator: event.operator.clone(),
        start_time: event.at,
    })
}

fn apply_round_end(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    let round = snapshot.open_round.as_ref().ok_or_else(|| {
        AppError::IllegalTransition(format!("no open round for operator '{}'", event.operator))
    })?;

    // A pause still running is assumed ended at round end.
    let close_pause = snapshot.open_pause.as_ref().map(|p| p.id);

    let (duration_secs, anomalous) = active_duration(round, &snapshot.round_pauses, event.at);

    Ok(RecordDelta::CloseRound {
        round_id: round.id,
        end_time: event.at,
        duration_secs,
        anomalous,
        close_pause,
    })
}

fn apply_pause_start(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    let flight = snapshot.open_flight.as_ref().ok_or_else(|| {
        AppError::IllegalTransition(format!(
            "cannot start a pause without an open flight (operator '{}')",
            event.operator
        ))
    })?;

    if let Some(pause) = &snapshot.open_pause {
        return Err(AppError::IllegalTransition(format!(
            "{} already in progress",
            pause.reason.label()
        )));
    }

    let reason = event
        .pause_reason
        .ok_or_else(|| AppError::InvalidReason("pause start requires a reason".into()))?;

    Ok(RecordDelta::OpenPause {
        flight_id: flight.id,
        round_id: snapshot.open_round.as_ref().map(|r| r.id),
        reason,
        start_time: event.at,
    })
}

fn apply_pause_end(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    let pause = snapshot.open_pause.as_ref().ok_or_else(|| {
        AppError::IllegalTransition(format!("no open pause for operator '{}'", event.operator))
    })?;

    Ok(RecordDelta::ClosePause {
        pause_id: pause.id,
        end_time: event.at,
    })
}

fn apply_justify(snapshot: &OperatorSnapshot, event: &ActionEvent) -> AppResult<RecordDelta> {
    let flight = snapshot.open_flight.as_ref().ok_or_else(|| {
        AppError::IllegalTransition(format!(
            "cannot justify a skipped round without an open flight (operator '{}')",
            event.operator
        ))
    })?;

    if snapshot.open_round.is_some() {
        return Err(AppError::IllegalTransition(
            "cannot justify a skipped round while a round is in progress".into(),
        ));
    }

    let area = event
        .area
        .ok_or_else(|| AppError::InvalidArea("justification requires an area".into()))?;

    if snapshot.covered_areas.contains(&area) {
        return Err(AppError::IllegalTransition(format!(
            "{} was already patrolled or justified in this flight",
            area.label()
        )));
    }

    let reason = event
        .reason
        .clone()
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::InvalidReason("justification requires a reason".into()))?;

    Ok(RecordDelta::AddJustification {
        flight_id: flight.id,
        area,
        operator: event.operator.clone(),
        date: event.at.date(),
        reason,
    })
}

/// Active duration of a round ending at `end`: wall-clock span minus the
/// pause intervals overlapping [start, end]. A raw result <= 0 is clamped
/// to 0 and flagged anomalous, never rejected.
fn active_duration(
    round: &RoundRecord,
    pauses: &[PauseRecord],
    end: NaiveDateTime,
) -> (i64, bool) {
    let span = (end - round.start_time).num_seconds();

    let paused: i64 = pauses
        .iter()
        .filter(|p| p.round_id == Some(round.id))
        .map(|p| {
            let p_start = p.start_time.max(round.start_time);
            let p_end = p.end_time.unwrap_or(end).min(end);
            (p_end - p_start).num_seconds().max(0)
        })
        .sum();

    let raw = span - paused;
    (raw.max(0), raw <= 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::flight::FlightStatus;
    use crate::models::round::RoundStatus;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn open_flight(id: i64) -> FlightRecord {
        FlightRecord {
            id,
            flight_number: 1,
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            operator: "ada".into(),
            start_time: ts(8, 0, 0),
            end_time: None,
            status: FlightStatus::Open,
        }
    }

    fn open_round(id: i64, start: NaiveDateTime) -> RoundRecord {
        RoundRecord {
            id,
            flight_id: 1,
            area: Area::Perimeter,
            operator: "ada".into(),
            start_time: start,
            end_time: None,
            duration_secs: None,
            status: RoundStatus::Open,
            anomalous: false,
            auto_closed: false,
        }
    }

    fn snapshot_with_flight() -> OperatorSnapshot {
        OperatorSnapshot {
            operator: "ada".into(),
            open_flight: Some(open_flight(1)),
            last_event_at: Some(ts(8, 0, 0)),
            ..Default::default()
        }
    }

    #[test]
    fn flight_start_rejected_while_flight_open() {
        let snapshot = snapshot_with_flight();
        let ev = ActionEvent::new("ada", ActionKind::FlightStart, ts(9, 0, 0));

        assert!(matches!(
            apply(&snapshot, &ev),
            Err(AppError::IllegalTransition(_))
        ));
    }

    #[test]
    fn flight_end_without_flight_rejected() {
        let snapshot = OperatorSnapshot::default();
        let ev = ActionEvent::new("ada", ActionKind::FlightEnd, ts(9, 0, 0));

        assert!(matches!(
            apply(&snapshot, &ev),
            Err(AppError::IllegalTransition(_))
        ));
    }

    #[test]
    fn round_end_without_round_rejected() {
        let snapshot = snapshot_with_flight();
        let ev = ActionEvent::new("ada", ActionKind::RoundEnd, ts(9, 0, 0));

        assert!(matches!(
            apply(&snapshot, &ev),
            Err(AppError::IllegalTransition(_))
        ));
    }

    #[test]
    fn non_monotonic_event_rejected() {
        let snapshot = snapshot_with_flight();
        let ev = ActionEvent::new("ada", ActionKind::FlightEnd, ts(7, 59, 59));

        assert!(matches!(
            apply(&snapshot, &ev),
            Err(AppError::NonMonotonicTime(_))
        ));
    }

    #[test]
    fn round_duration_excludes_contained_pause() {
        // Start 08:01, battery pause 08:05 for 3 minutes, end 08:16.
        let mut snapshot = snapshot_with_flight();
        snapshot.open_round = Some(open_round(7, ts(8, 1, 0)));
        snapshot.round_pauses = vec![PauseRecord {
            id: 3,
            flight_id: 1,
            round_id: Some(7),
            reason: PauseReason::BatterySwap,
            start_time: ts(8, 5, 0),
            end_time: Some(ts(8, 8, 0)),
        }];
        snapshot.last_event_at = Some(ts(8, 8, 0));

        let ev = ActionEvent::new("ada", ActionKind::RoundEnd, ts(8, 16, 0));
        let delta = apply(&snapshot, &ev).unwrap();

        match delta {
            RecordDelta::CloseRound {
                duration_secs,
                anomalous,
                close_pause,
                ..
            } => {
                assert_eq!(duration_secs, 12 * 60);
                assert!(!anomalous);
                assert_eq!(close_pause, None);
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }

    #[test]
    fn round_end_closes_open_pause_implicitly() {
        let mut snapshot = snapshot_with_flight();
        snapshot.open_round = Some(open_round(7, ts(8, 0, 0)));
        let pause = PauseRecord {
            id: 4,
            flight_id: 1,
            round_id: Some(7),
            reason: PauseReason::Meal,
            start_time: ts(8, 10, 0),
            end_time: None,
        };
        snapshot.open_pause = Some(pause.clone());
        snapshot.round_pauses = vec![pause];
        snapshot.last_event_at = Some(ts(8, 10, 0));

        let ev = ActionEvent::new("ada", ActionKind::RoundEnd, ts(8, 20, 0));
        let delta = apply(&snapshot, &ev).unwrap();

        match delta {
            RecordDelta::CloseRound {
                duration_secs,
                close_pause,
                ..
            } => {
                // 20 min span minus the 10 min open pause.
                assert_eq!(duration_secs, 10 * 60);
                assert_eq!(close_pause, Some(4));
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }

    #[test]
    fn zero_duration_round_flagged_not_rejected() {
        let mut snapshot = snapshot_with_flight();
        snapshot.open_round = Some(open_round(7, ts(8, 0, 0)));
        snapshot.last_event_at = Some(ts(8, 0, 0));

        let ev = ActionEvent::new("ada", ActionKind::RoundEnd, ts(8, 0, 0));
        let delta = apply(&snapshot, &ev).unwrap();

        match delta {
            RecordDelta::CloseRound {
                duration_secs,
                anomalous,
                ..
            } => {
                assert_eq!(duration_secs, 0);
                assert!(anomalous);
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }

    #[test]
    fn flight_end_auto_closes_dangling_round() {
        let mut snapshot = snapshot_with_flight();
        snapshot.open_round = Some(open_round(7, ts(8, 30, 0)));
        snapshot.last_event_at = Some(ts(8, 30, 0));

        let ev = ActionEvent::new("ada", ActionKind::FlightEnd, ts(9, 0, 0));
        let delta = apply(&snapshot, &ev).unwrap();

        match delta {
            RecordDelta::CloseFlight {
                end_time,
                auto_close: Some(auto),
                ..
            } => {
                assert_eq!(auto.end_time, end_time);
                assert_eq!(auto.duration_secs, 30 * 60);
                assert!(!auto.anomalous);
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }

    #[test]
    fn round_start_requires_area() {
        let snapshot = snapshot_with_flight();
        let ev = ActionEvent::new("ada", ActionKind::RoundStart, ts(8, 5, 0));

        assert!(matches!(apply(&snapshot, &ev), Err(AppError::InvalidArea(_))));
    }

    #[test]
    fn pause_start_while_paused_rejected() {
        let mut snapshot = snapshot_with_flight();
        snapshot.open_pause = Some(PauseRecord {
            id: 9,
            flight_id: 1,
            round_id: None,
            reason: PauseReason::BatterySwap,
            start_time: ts(8, 10, 0),
            end_time: None,
        });
        snapshot.last_event_at = Some(ts(8, 10, 0));

        let ev = ActionEvent::new("ada", ActionKind::PauseStart, ts(8, 12, 0))
            .with_pause_reason(PauseReason::Meal);

        assert!(matches!(
            apply(&snapshot, &ev),
            Err(AppError::IllegalTransition(_))
        ));
    }

    #[test]
    fn justify_covered_area_rejected() {
        let mut snapshot = snapshot_with_flight();
        snapshot.covered_areas = vec![Area::Parking];

        let ev = ActionEvent::new("ada", ActionKind::Justify, ts(8, 5, 0))
            .with_area(Area::Parking)
            .with_reason("high wind");

        assert!(matches!(
            apply(&snapshot, &ev),
            Err(AppError::IllegalTransition(_))
        ));
    }
}
