use super::{open_pool, resolve_window};
use crate::analytics::corpus::Corpus;
use crate::analytics::efficiency::operator_efficiency;
use crate::analytics::heatmap::{WEEKDAYS, heatmap};
use crate::analytics::kpi::kpi_summary;
use crate::analytics::rollup::{Granularity, temporal_rollup};
use crate::analytics::variability::{GroupBy, variability_stats};
use crate::cli::parser::{Commands, ReportKind};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use crate::utils::table::Table;
use crate::utils::time::format_secs;
use serde::Serialize;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report { kind } = cmd {
        let pool = open_pool(cfg)?;

        match kind {
            ReportKind::Kpi { period, json } => {
                let corpus = Corpus::load(&pool.conn, resolve_window(period)?)?;
                let summary = kpi_summary(&corpus);

                if *json {
                    print_json(&summary)?;
                } else {
                    let rows = vec![
                        vec!["Total flights".into(), summary.total_flights.to_string()],
                        vec![
                            "Operation hours".into(),
                            format!("{:.1}", summary.total_operation_hours),
                        ],
                        vec![
                            "Average round".into(),
                            format_secs(summary.avg_round_duration_secs as i64),
                        ],
                        vec!["Rounds".into(), summary.round_count.to_string()],
                        vec![
                            "Justifications".into(),
                            summary.justification_count.to_string(),
                        ],
                    ];
                    println!("{}", Table::auto(&["KPI", "Value"], rows).render());
                    warn_skipped(corpus.skipped);
                }
            }

            ReportKind::Rollup {
                granularity,
                period,
                zero_fill,
                json,
            } => {
                let gran = Granularity::from_code(granularity).ok_or_else(|| {
                    AppError::Other(format!(
                        "'{}' is not a granularity. Use day or month",
                        granularity
                    ))
                })?;
                let corpus = Corpus::load(&pool.conn, resolve_window(period)?)?;
                let buckets = temporal_rollup(&corpus, gran, *zero_fill);

                if *json {
                    print_json(&buckets)?;
                } else {
                    let rows = buckets
                        .iter()
                        .map(|b| {
                            vec![
                                b.period.clone(),
                                b.flight_count.to_string(),
                                b.round_count.to_string(),
                            ]
                        })
                        .collect();
                    println!(
                        "{}",
                        Table::auto(&["Period", "Flights", "Rounds"], rows).render()
                    );
                    warn_skipped(corpus.skipped);
                }
            }

            ReportKind::Heatmap { period, json } => {
                let corpus = Corpus::load(&pool.conn, resolve_window(period)?)?;
                let map = heatmap(&corpus);

                if *json {
                    print_json(&map)?;
                } else {
                    let mut headers = vec!["Day"];
                    let hour_labels: Vec<String> = (0..24).map(|h| format!("{:02}", h)).collect();
                    headers.extend(hour_labels.iter().map(|s| s.as_str()));

                    let rows = map
                        .counts
                        .iter()
                        .enumerate()
                        .map(|(day, counts)| {
                            let mut row = vec![WEEKDAYS[day].to_string()];
                            row.extend(counts.iter().map(|c| c.to_string()));
                            row
                        })
                        .collect();
                    println!("{}", Table::auto(&headers, rows).render());
                    warn_skipped(corpus.skipped);
                }
            }

            ReportKind::Efficiency { period, json } => {
                let corpus = Corpus::load(&pool.conn, resolve_window(period)?)?;
                let matrix = operator_efficiency(&corpus);

                if *json {
                    print_json(&matrix)?;
                } else {
                    let rows = matrix
                        .iter()
                        .map(|e| {
                            vec![
                                e.operator.clone(),
                                e.round_count.to_string(),
                                format_secs(e.median_duration_secs as i64),
                            ]
                        })
                        .collect();
                    println!(
                        "{}",
                        Table::auto(&["Operator", "Rounds", "Median duration"], rows).render()
                    );
                    warn_skipped(corpus.skipped);
                }
            }

            ReportKind::Variability {
                group_by,
                period,
                json,
            } => {
                let grouping = GroupBy::from_code(group_by).ok_or_else(|| {
                    AppError::Other(format!(
                        "'{}' is not a grouping. Use operator or area",
                        group_by
                    ))
                })?;
                let corpus = Corpus::load(&pool.conn, resolve_window(period)?)?;
                let stats = variability_stats(&corpus, grouping);

                if *json {
                    print_json(&stats)?;
                } else {
                    let rows = stats
                        .iter()
                        .map(|s| {
                            vec![
                                s.group.clone(),
                                s.observations.to_string(),
                                format_secs(s.q1 as i64),
                                format_secs(s.median as i64),
                                format_secs(s.q3 as i64),
                                s.outliers.len().to_string(),
                            ]
                        })
                        .collect();
                    println!(
                        "{}",
                        Table::auto(
                            &["Group", "N", "Q1", "Median", "Q3", "Outliers"],
                            rows
                        )
                        .render()
                    );
                    warn_skipped(corpus.skipped);
                }
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Other(format!("cannot serialize report: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

fn warn_skipped(skipped: usize) {
    if skipped > 0 {
        warning(format!("{} malformed record(s) were skipped", skipped));
    }
}
