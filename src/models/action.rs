use super::area::Area;
use super::pause::PauseReason;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ActionKind {
    FlightStart,
    FlightEnd,
    RoundStart,
    RoundEnd,
    PauseStart,
    PauseEnd,
    Justify,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::FlightStart => "flight_start",
            ActionKind::FlightEnd => "flight_end",
            ActionKind::RoundStart => "round_start",
            ActionKind::RoundEnd => "round_end",
            ActionKind::PauseStart => "pause_start",
            ActionKind::PauseEnd => "pause_end",
            ActionKind::Justify => "justify",
        }
    }
}

/// One operator action, immutable once created. The session state machine
/// consumes these and nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct ActionEvent {
    pub operator: String,
    pub kind: ActionKind,
    pub area: Option<Area>,        // required for RoundStart and Justify
    pub at: NaiveDateTime,
    pub reason: Option<String>,    // required for Justify
    pub pause_reason: Option<PauseReason>, // required for PauseStart
}

impl ActionEvent {
    pub fn new(operator: &str, kind: ActionKind, at: NaiveDateTime) -> Self {
        Self {
            operator: operator.to_string(),
            kind,
            area: None,
            at,
            reason: None,
            pause_reason: None,
        }
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn with_pause_reason(mut self, reason: PauseReason) -> Self {
        self.pause_reason = Some(reason);
        self
    }
}
