// Wed Jan 15 2026 - Alex

pub mod cli;
pub mod progress;

pub use cli::{AbiArgs, AnalyzeArgs, Args, Command, CommandHandler};
pub use progress::ProgressManager;

use colored::Colorize;

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "[WARN]".yellow(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red(), message);
}
