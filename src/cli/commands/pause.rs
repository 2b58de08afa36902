use super::{open_pool, resolve_at, resolve_operator};
use crate::cli::parser::{Commands, PauseAction};
use crate::config::Config;
use crate::core::ops::record_event;
use crate::errors::{AppError, AppResult};
use crate::models::action::{ActionEvent, ActionKind};
use crate::models::pause::PauseReason;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Pause { action } = cmd {
        let mut pool = open_pool(cfg)?;

        match action {
            PauseAction::Start { operator, reason, at } => {
                let parsed = PauseReason::from_code(reason).ok_or_else(|| {
                    AppError::InvalidReason(format!(
                        "'{}' is not a pause reason. Use battery, meal or other",
                        reason
                    ))
                })?;

                let event = ActionEvent::new(
                    &resolve_operator(operator, cfg)?,
                    ActionKind::PauseStart,
                    resolve_at(at)?,
                )
                .with_pause_reason(parsed);

                record_event(&mut pool, &event)?;
                success(format!("{} started.", parsed.label()));
            }
            PauseAction::End { operator, at } => {
                let event = ActionEvent::new(
                    &resolve_operator(operator, cfg)?,
                    ActionKind::PauseEnd,
                    resolve_at(at)?,
                );

                record_event(&mut pool, &event)?;
                success("Pause closed.");
            }
        }
    }
    Ok(())
}
