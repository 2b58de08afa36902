use super::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::queries::clear_all;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Administrative bulk clear: removes every operational record in one
/// destructive operation. There is no partial clear.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear { yes } = cmd {
        if !*yes {
            warning("This deletes ALL flights, rounds, pauses and justifications.");
            warning("Re-run with --yes to confirm.");
            return Ok(());
        }

        let pool = open_pool(cfg)?;
        clear_all(&pool.conn)?;
        ttlog(&pool.conn, "clear", "", "all operational records deleted")?;

        success("All records deleted.");
    }
    Ok(())
}
