use super::{open_pool, resolve_at, resolve_operator};
use crate::cli::parser::{Commands, FlightAction};
use crate::config::Config;
use crate::core::ops::record_event;
use crate::errors::AppResult;
use crate::models::action::{ActionEvent, ActionKind};
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Flight { action } = cmd {
        let mut pool = open_pool(cfg)?;

        let (operator, at, kind) = match action {
            FlightAction::Start { operator, at } => (
                resolve_operator(operator, cfg)?,
                resolve_at(at)?,
                ActionKind::FlightStart,
            ),
            FlightAction::End { operator, at } => (
                resolve_operator(operator, cfg)?,
                resolve_at(at)?,
                ActionKind::FlightEnd,
            ),
        };

        let event = ActionEvent::new(&operator, kind, at);
        let applied = record_event(&mut pool, &event)?;

        for w in &applied.warnings {
            warning(w);
        }

        let number = applied.flight_number.unwrap_or(0);
        match kind {
            ActionKind::FlightStart => success(format!("Flight {:02} opened.", number)),
            _ => success(format!("Flight {:02} closed.", number)),
        }
    }
    Ok(())
}
