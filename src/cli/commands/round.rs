use super::{open_pool, resolve_area, resolve_at, resolve_operator};
use crate::cli::parser::{Commands, RoundAction};
use crate::config::Config;
use crate::core::ops::record_event;
use crate::core::session::RecordDelta;
use crate::errors::AppResult;
use crate::models::action::{ActionEvent, ActionKind};
use crate::ui::messages::{success, warning};
use crate::utils::time::format_secs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Round { action } = cmd {
        let mut pool = open_pool(cfg)?;

        let event = match action {
            RoundAction::Start { operator, area, at } => ActionEvent::new(
                &resolve_operator(operator, cfg)?,
                ActionKind::RoundStart,
                resolve_at(at)?,
            )
            .with_area(resolve_area(area)?),
            RoundAction::End { operator, at } => ActionEvent::new(
                &resolve_operator(operator, cfg)?,
                ActionKind::RoundEnd,
                resolve_at(at)?,
            ),
        };

        let applied = record_event(&mut pool, &event)?;

        for w in &applied.warnings {
            warning(w);
        }

        match &applied.delta {
            RecordDelta::OpenRound { area, .. } => {
                success(format!("Round over {} started.", area.label()));
            }
            RecordDelta::CloseRound { duration_secs, .. } => {
                success(format!(
                    "Round closed (active {}).",
                    format_secs(*duration_secs)
                ));
            }
            _ => {}
        }
    }
    Ok(())
}
