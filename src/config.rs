//! Command line configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Love Airlines - a boarding pass invitation for one special passenger
#[derive(Parser, Debug)]
#[command(name = "love-airlines")]
#[command(about = "A boarding pass invitation for one special passenger")]
pub struct Args {
    /// Name printed on the boarding pass
    #[arg(long, env = "LOVE_AIRLINES_PASSENGER", default_value = "Valentine")]
    pub passenger: String,

    /// JSON file with date options (uses the built-in catalog when omitted)
    #[arg(long, env = "LOVE_AIRLINES_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Directory the boarding pass is exported to
    #[arg(long, env = "LOVE_AIRLINES_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// How long passport approval takes, in milliseconds
    #[arg(long, env = "LOVE_AIRLINES_APPROVAL_DELAY_MS", default_value_t = 1500)]
    pub approval_delay_ms: u64,

    /// Log file (logging is off when omitted, the terminal belongs to the UI)
    #[arg(long, env = "LOVE_AIRLINES_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Resolved settings the app runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub passenger: String,
    pub catalog: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub approval_delay: Duration,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_args(args: Args) -> Self {
        let export_dir = args.export_dir.unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("love-airlines")
        });

        Self {
            passenger: args.passenger,
            catalog: args.catalog,
            export_dir,
            approval_delay: Duration::from_millis(args.approval_delay_ms),
            log_file: args.log_file,
        }
    }
}
