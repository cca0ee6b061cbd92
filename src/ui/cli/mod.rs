// Wed Jan 15 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{AbiArgs, AnalyzeArgs, Args, Command};
pub use handler::{CommandHandler, EXIT_FAILURE, EXIT_FIXABLE, EXIT_OK};

use clap::Parser;

pub fn parse_args() -> Args {
    Args::parse()
}

pub fn run() -> anyhow::Result<i32> {
    let args = parse_args();
    let mut handler = CommandHandler::new();
    handler.execute(args)
}
