use super::{open_pool, resolve_area, resolve_at, resolve_operator};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ops::record_event;
use crate::errors::AppResult;
use crate::models::action::{ActionEvent, ActionKind};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Justify {
        operator,
        area,
        reason,
        at,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;

        let parsed_area = resolve_area(area)?;
        let event = ActionEvent::new(
            &resolve_operator(operator, cfg)?,
            ActionKind::Justify,
            resolve_at(at)?,
        )
        .with_area(parsed_area)
        .with_reason(reason);

        record_event(&mut pool, &event)?;
        success(format!(
            "Skipped round over {} justified.",
            parsed_area.label()
        ));
    }
    Ok(())
}
