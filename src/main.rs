// Tue Jan 13 2026 - Alex

use colored::Colorize;
use struct_padding::ui::cli;

fn main() {
    let code = match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            cli::EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
