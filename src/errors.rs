//! Unified application error type.
//! All modules (db, core, analytics, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Session state machine
    // ---------------------------
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Invalid patrol area: {0}")]
    InvalidArea(String),

    #[error("Non-monotonic timestamp: {0}")]
    NonMonotonicTime(String),

    #[error("Dangling round: {0}")]
    DanglingRound(String),

    // ---------------------------
    // Corpus / aggregation
    // ---------------------------
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid pause reason: {0}")]
    InvalidReason(String),

    #[error("Invalid record status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export / import errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
