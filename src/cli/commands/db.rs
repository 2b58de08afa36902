use super::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::stats::print_db_info;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db { migrate, info: show_info } = cmd {
        let mut pool = open_pool(cfg)?;

        if *migrate {
            run_pending_migrations(&pool.conn)?;
            success("Migrations up to date.");
        }

        if *show_info {
            print_db_info(&mut pool, &cfg.database)?;
        }

        if !*migrate && !*show_info {
            info("Nothing to do: pass --migrate or --info.");
        }
    }
    Ok(())
}
