use super::{open_pool, resolve_window};
use crate::analytics::corpus::Corpus;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::model::corpus_to_rows;
use crate::ui::messages::{info, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::table::Table;
use crate::utils::time::format_secs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period, operator } = cmd {
        let pool = open_pool(cfg)?;

        let window = resolve_window(period)?;
        let corpus = Corpus::load(&pool.conn, window)?;

        let mut rows = corpus_to_rows(&corpus);
        if let Some(op) = operator {
            rows.retain(|r| &r.operator == op);
        }

        if rows.is_empty() {
            info("No records found.");
            return Ok(());
        }

        let table_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                let duration = r
                    .duration_secs
                    .parse::<i64>()
                    .map(format_secs)
                    .unwrap_or_else(|_| "--:--:--".into());

                let mut flags = Vec::new();
                if r.anomalous == "1" {
                    flags.push("anomalous");
                }
                if r.auto_closed == "1" {
                    flags.push("auto-closed");
                }

                vec![
                    r.flight_date.clone(),
                    format!("{:02}", r.flight_number),
                    r.area.clone(),
                    r.operator.clone(),
                    colorize_optional(&time_of(&r.start_time)),
                    colorize_optional(&time_of(&r.end_time)),
                    colorize_optional(&duration),
                    r.status.clone(),
                    if r.reason.is_empty() {
                        flags.join(",")
                    } else {
                        r.reason.clone()
                    },
                ]
            })
            .collect();

        let table = Table::auto(
            &[
                "Date", "Flight", "Area", "Operator", "Start", "End", "Duration", "Status",
                "Notes",
            ],
            table_rows,
        );
        println!("{}", table.render());

        if corpus.skipped > 0 {
            warning(format!(
                "{} malformed record(s) were skipped",
                corpus.skipped
            ));
        }
    }
    Ok(())
}

/// Keep only the HH:MM:SS part of a full timestamp for display.
fn time_of(ts: &str) -> String {
    match ts.split_once(' ') {
        Some((_, time)) => time.to_string(),
        None => "--:--:--".into(),
    }
}
