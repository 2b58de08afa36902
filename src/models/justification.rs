use super::area::Area;
use chrono::NaiveDate;
use serde::Serialize;

/// Stands in for a round that was scheduled but did not occur.
/// Never carries a duration.
#[derive(Debug, Clone, Serialize)]
pub struct JustificationRecord {
    pub id: i64,
    pub flight_id: i64,
    pub area: Area,
    pub operator: String,
    pub date: NaiveDate,
    pub reason: String,
}
