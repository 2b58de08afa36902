use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PauseReason {
    BatterySwap, // battery
    Meal,        // meal
    Other,       // other
}

impl PauseReason {
    pub fn code(&self) -> &'static str {
        match self {
            PauseReason::BatterySwap => "battery",
            PauseReason::Meal => "meal",
            PauseReason::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PauseReason::BatterySwap => "Battery swap",
            PauseReason::Meal => "Meal break",
            PauseReason::Other => "Other",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "battery" => Some(PauseReason::BatterySwap),
            "meal" => Some(PauseReason::Meal),
            "other" => Some(PauseReason::Other),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.to_lowercase())
    }
}

/// An operational interruption. Pauses opened while a round is running
/// carry the owning `round_id` and subtract from that round's active
/// duration; pauses between rounds belong to the flight alone.
#[derive(Debug, Clone, Serialize)]
pub struct PauseRecord {
    pub id: i64,
    pub flight_id: i64,
    pub round_id: Option<i64>,
    pub reason: PauseReason,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

impl PauseRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn duration_secs(&self) -> Option<i64> {
        self.end_time.map(|end| (end - self.start_time).num_seconds())
    }
}
