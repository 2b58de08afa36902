use super::area::Area;
use crate::utils::time::fmt_ts;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RoundStatus {
    Open,
    Closed,
}

impl RoundStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RoundStatus::Open => "open",
            RoundStatus::Closed => "closed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(RoundStatus::Open),
            "closed" => Some(RoundStatus::Closed),
            _ => None,
        }
    }
}

/// One timed patrol pass over a named area, nested within a flight.
///
/// `duration_secs` is the active duration: wall-clock span minus the
/// pause intervals contained in it. A raw value <= 0 is clamped to 0 and
/// the record is flagged `anomalous` instead of being rejected.
/// `auto_closed` marks rounds that were closed implicitly when the owning
/// flight ended while the round was still open.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub id: i64,
    pub flight_id: i64,
    pub area: Area,
    pub operator: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration_secs: Option<i64>,
    pub status: RoundStatus,
    pub anomalous: bool,
    pub auto_closed: bool,
}

impl RoundRecord {
    pub fn start_str(&self) -> String {
        fmt_ts(self.start_time)
    }

    pub fn end_str(&self) -> String {
        self.end_time.map(fmt_ts).unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == RoundStatus::Closed
    }
}
