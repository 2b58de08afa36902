use crate::utils::time::{fmt_date, fmt_ts};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FlightStatus {
    Open,
    Closed,
}

impl FlightStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FlightStatus::Open => "open",
            FlightStatus::Closed => "closed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(FlightStatus::Open),
            "closed" => Some(FlightStatus::Closed),
            _ => None,
        }
    }
}

/// One continuous drone-operation session, bounded by flight start/end.
/// `flight_number` restarts at 1 each calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct FlightRecord {
    pub id: i64,
    pub flight_number: i64,
    pub date: NaiveDate,
    pub operator: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub status: FlightStatus,
}

impl FlightRecord {
    pub fn date_str(&self) -> String {
        fmt_date(self.date)
    }

    pub fn start_str(&self) -> String {
        fmt_ts(self.start_time)
    }

    pub fn end_str(&self) -> String {
        self.end_time.map(fmt_ts).unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.status == FlightStatus::Open
    }
}
