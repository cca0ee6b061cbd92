// Wed Jan 15 2026 - Alex

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "struct-padding")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Finds Go structs that can shrink by reordering their fields", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Size and reorder every struct of each declaration document.
    Analyze(AnalyzeArgs),
    /// Print the active ABI table as JSON.
    Abi(AbiArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Preset name (amd64, arm64, 386) or path to a JSON table.
    #[arg(short, long)]
    pub abi: Option<String>,

    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub threads: Option<usize>,

    #[arg(long)]
    pub json: bool,

    #[arg(long, conflicts_with = "json")]
    pub markdown: bool,

    #[arg(long)]
    pub only_fixable: bool,

    #[arg(long)]
    pub layout: bool,

    /// Exit with status 2 when some struct can shrink.
    #[arg(long)]
    pub check: bool,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AbiArgs {
    #[arg(short, long, default_value = "amd64")]
    pub abi: String,
}

impl AnalyzeArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == Some(0) {
            return Err("Thread count must be at least 1".to_string());
        }
        if self.output.is_some() && !self.json {
            return Err("--output requires --json".to_string());
        }
        Ok(())
    }
}
