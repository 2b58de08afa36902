use super::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::run_import;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let mut pool = open_pool(cfg)?;

        let summary = run_import(&mut pool, file)?;

        success(format!("Imported {} row(s) from {}.", summary.imported, file));

        if !summary.rejected.is_empty() {
            warning(format!("{} row(s) rejected:", summary.rejected.len()));
            for (line, error) in &summary.rejected {
                println!("    row {}: {}", line, error);
            }
        }
    }
    Ok(())
}
