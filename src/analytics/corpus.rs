//! The record corpus every report is computed from.
//!
//! Reading is lenient: rows that fail to map, and records referencing a
//! flight that does not exist, are dropped and counted in `skipped`
//! instead of aborting the whole report.

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::flight::FlightRecord;
use crate::models::justification::JustificationRecord;
use crate::models::pause::PauseRecord;
use crate::models::round::RoundRecord;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Corpus {
    pub flights: Vec<FlightRecord>,
    pub rounds: Vec<RoundRecord>,
    pub pauses: Vec<PauseRecord>,
    pub justifications: Vec<JustificationRecord>,
    /// Records excluded from the corpus (unreadable or orphaned).
    pub skipped: usize,
    pub(crate) flight_index: BTreeMap<i64, FlightRecord>,
}

impl Corpus {
    /// Read every record inside the optional date window, already sorted
    /// by (start_time, id) so downstream aggregation is deterministic.
    pub fn load(conn: &Connection, window: Option<(NaiveDate, NaiveDate)>) -> AppResult<Corpus> {
        let (flights, skipped_f) = queries::load_flights(conn, window)?;
        let (rounds, skipped_r) = queries::load_rounds(conn, window)?;
        let (pauses, skipped_p) = queries::load_pauses(conn, window)?;
        let (justifications, skipped_j) = queries::load_justifications(conn, window)?;

        // References resolve against every flight, not just the windowed
        // set, so a round whose flight started before the window is not
        // treated as orphaned.
        let (all_flights, _) = queries::load_flights(conn, None)?;
        let flight_index: BTreeMap<i64, FlightRecord> =
            all_flights.into_iter().map(|f| (f.id, f)).collect();

        let mut skipped = skipped_f + skipped_r + skipped_p + skipped_j;

        // Orphaned references are excluded, not fatal.
        let (rounds, orphan_rounds): (Vec<_>, Vec<_>) = rounds
            .into_iter()
            .partition(|r| flight_index.contains_key(&r.flight_id));
        let (pauses, orphan_pauses): (Vec<_>, Vec<_>) = pauses
            .into_iter()
            .partition(|p| flight_index.contains_key(&p.flight_id));
        let (justifications, orphan_justs): (Vec<_>, Vec<_>) = justifications
            .into_iter()
            .partition(|j| flight_index.contains_key(&j.flight_id));

        skipped += orphan_rounds.len() + orphan_pauses.len() + orphan_justs.len();

        Ok(Corpus {
            flights,
            rounds,
            pauses,
            justifications,
            skipped,
            flight_index,
        })
    }

    pub fn flight(&self, id: i64) -> Option<&FlightRecord> {
        self.flight_index.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
            && self.rounds.is_empty()
            && self.pauses.is_empty()
            && self.justifications.is_empty()
    }

    /// Active durations of closed, non-anomalous rounds, the observation
    /// set used by every duration-based metric.
    pub fn valid_durations(&self) -> impl Iterator<Item = (&RoundRecord, i64)> {
        self.rounds.iter().filter_map(|r| match r.duration_secs {
            Some(d) if r.is_closed() && !r.anomalous && d > 0 => Some((r, d)),
            _ => None,
        })
    }
}
