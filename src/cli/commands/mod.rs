pub mod clear;
pub mod config;
pub mod db;
pub mod export;
pub mod flight;
pub mod import;
pub mod init;
pub mod justify;
pub mod list;
pub mod log;
pub mod pause;
pub mod report;
pub mod round;
pub mod status;

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::range::parse_range;
use crate::models::area::Area;
use crate::utils::time::parse_ts;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Shared helpers for the command handlers.
pub fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    Ok(DbPool::new(&cfg.database)?)
}

/// `--operator` wins; otherwise the configured default operator.
pub fn resolve_operator(opt: &Option<String>, cfg: &Config) -> AppResult<String> {
    opt.clone()
        .or_else(|| cfg.default_operator.clone())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::Config(
                "no operator given: pass --operator or set default_operator in the config".into(),
            )
        })
}

/// `--at` wins; otherwise now, truncated to whole seconds.
pub fn resolve_at(at: &Option<String>) -> AppResult<NaiveDateTime> {
    match at {
        Some(s) => parse_ts(s).ok_or_else(|| AppError::InvalidTimestamp(s.clone())),
        None => Ok(Local::now()
            .naive_local()
            .with_nanosecond(0)
            .expect("zero nanoseconds is always valid")),
    }
}

pub fn resolve_area(code: &str) -> AppResult<Area> {
    Area::from_code(code).ok_or_else(|| {
        AppError::InvalidArea(format!(
            "'{}' is not a known area. Use P, K, S3 or S5",
            code
        ))
    })
}

pub fn resolve_window(
    period: &Option<String>,
) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    period.as_ref().map(|p| parse_range(p)).transpose()
}
