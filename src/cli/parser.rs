use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for patrologger
/// CLI application to log drone patrol operations with SQLite
#[derive(Parser)]
#[command(
    name = "patrologger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log drone patrol flights, rounds and pauses, and derive analytics from the accumulated log",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Open or close a flight session
    Flight {
        #[command(subcommand)]
        action: FlightAction,
    },

    /// Start or finish a patrol round inside the open flight
    Round {
        #[command(subcommand)]
        action: RoundAction,
    },

    /// Start or finish an operational pause (battery swap, meal, other)
    Pause {
        #[command(subcommand)]
        action: PauseAction,
    },

    /// Record a justification for a skipped round
    Justify {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Patrol area: P=Perimeter, K=Parking, S3=Slope 03, S5=Slope 05")]
        area: String,

        #[arg(long, help = "Why the round was skipped")]
        reason: String,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },

    /// Show the operator's current session state
    Status {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,
    },

    /// List recorded rounds and justifications
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long, help = "Filter by operator")]
        operator: Option<String>,
    },

    /// Derived analytics over the recorded history
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Export rounds and justifications as a flat table
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Import a previously exported flat table, re-validating every row
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Delete ALL operational records (the audit log is kept)
    Clear {
        #[arg(long, help = "Confirm the destructive clear")]
        yes: bool,
    },

    /// Manage the database (migrations, statistics)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum FlightAction {
    /// Open a new flight (numbering restarts at 1 each day)
    Start {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },
    /// Close the open flight
    End {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RoundAction {
    /// Start a round over an area
    Start {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Patrol area: P=Perimeter, K=Parking, S3=Slope 03, S5=Slope 05")]
        area: String,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },
    /// Close the open round
    End {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PauseAction {
    /// Start a pause (inside or between rounds)
    Start {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Pause reason: battery, meal or other")]
        reason: String,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },
    /// Close the open pause
    End {
        #[arg(long, help = "Operator name (defaults to the configured operator)")]
        operator: Option<String>,

        #[arg(long, help = "Event timestamp (YYYY-MM-DD HH:MM:SS, defaults to now)")]
        at: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportKind {
    /// Headline KPIs: flights, operation hours, average round duration
    Kpi {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },
    /// Flight/round volume per day or month
    Rollup {
        #[arg(long, default_value = "day", help = "Granularity: day or month")]
        granularity: String,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long = "zero-fill", help = "Synthesize empty periods in the covered range")]
        zero_fill: bool,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },
    /// Weekday by hour activity matrix
    Heatmap {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },
    /// Volume vs median round duration per operator
    Efficiency {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },
    /// Quartile spread and outliers per operator or area
    Variability {
        #[arg(long = "group-by", default_value = "operator", help = "Group by operator or area")]
        group_by: String,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },
}
