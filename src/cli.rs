use crate::domain::constants::{DEFAULT_REPORT_FILE, DEFAULT_TRACE_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_INPUT_FILE: &str = "input.txt";

#[derive(Parser, Debug)]
#[command(name = "stg", version, about = "Structural trace governance CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Tracegen {
        #[arg(default_value = DEFAULT_INPUT_FILE)]
        infile: PathBuf,
        #[arg(long, default_value = DEFAULT_TRACE_FILE)]
        out: PathBuf,
        #[arg(long, default_value_t = false, help = "Embed segment text in the trace")]
        include_text: bool,
    },
    #[command(alias = "arbiterstg")]
    Arbiter {
        infile: PathBuf,
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
        out: PathBuf,
        #[arg(long, help = "Thresholds TOML (default: ~/.config/stg/thresholds.toml)")]
        thresholds: Option<PathBuf>,
    },
    Run {
        #[arg(default_value = DEFAULT_INPUT_FILE)]
        infile: PathBuf,
        #[arg(long, default_value = DEFAULT_TRACE_FILE)]
        trace_out: PathBuf,
        #[arg(long, default_value = DEFAULT_REPORT_FILE)]
        report_out: PathBuf,
        #[arg(long, default_value_t = false, help = "Embed segment text in the trace")]
        include_text: bool,
        #[arg(long, help = "Thresholds TOML (default: ~/.config/stg/thresholds.toml)")]
        thresholds: Option<PathBuf>,
    },
    Guard {
        #[arg(default_value = DEFAULT_INPUT_FILE)]
        infile: PathBuf,
    },
}
