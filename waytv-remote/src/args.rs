//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "waytv")]
#[command(about = "Drive streaming TV apps in a Waydroid container from a numeric keypad")]
#[command(version)]
pub struct Args {
    /// Input device to grab; repeat for several (default: every event node in --input-dir)
    #[arg(long, short = 'd', value_name = "PATH")]
    pub device: Vec<PathBuf>,

    /// Directory scanned for event nodes (overrides config file)
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Do not read commands from the terminal
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "terminal_only")]
    pub no_terminal: bool,

    /// Read commands from the terminal only; no input device is opened
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "device")]
    pub terminal_only: bool,

    /// Record key events instead of calling adb and waydroid
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Set log level (error, warn, info, debug, trace)
    /// Priority: 1. Command line args, 2. RUST_LOG env var, 3. default (info)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Specify custom configuration file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub print_config: bool,
}
