pub mod csv;
pub mod json;
pub mod logic;
pub mod model;
pub mod range;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}
