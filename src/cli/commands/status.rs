use super::{open_pool, resolve_operator};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::load_snapshot;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::time::{fmt_ts, format_secs};
use chrono::{Local, Timelike};

/// Show the operator's current session state: the original control-panel
/// view, reduced to a query.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { operator } = cmd {
        let pool = open_pool(cfg)?;
        let operator = resolve_operator(operator, cfg)?;

        let snapshot = load_snapshot(&pool.conn, &operator)?;
        let now = Local::now()
            .naive_local()
            .with_nanosecond(0)
            .expect("zero nanoseconds is always valid");

        let Some(flight) = &snapshot.open_flight else {
            info(format!(
                "No open flight for operator '{}'. Start one with `flight start`.",
                operator
            ));
            return Ok(());
        };

        println!();
        println!(
            "✈️  Flight {:02} - open since {}",
            flight.flight_number,
            fmt_ts(flight.start_time)
        );
        println!(
            "    Areas covered this flight: {}",
            if snapshot.covered_areas.is_empty() {
                "none".to_string()
            } else {
                snapshot
                    .covered_areas
                    .iter()
                    .map(|a| a.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );

        match &snapshot.open_round {
            Some(round) => {
                let elapsed = (now - round.start_time).num_seconds().max(0);
                println!(
                    "🔴 Round over {} running since {} (elapsed {})",
                    round.area.label(),
                    fmt_ts(round.start_time),
                    format_secs(elapsed)
                );
            }
            None => println!("🟢 No round in progress."),
        }

        if let Some(pause) = &snapshot.open_pause {
            let elapsed = (now - pause.start_time).num_seconds().max(0);
            warning(format!(
                "{} in progress since {} (elapsed {})",
                pause.reason.label(),
                fmt_ts(pause.start_time),
                format_secs(elapsed)
            ));
        }

        println!();
    }
    Ok(())
}
