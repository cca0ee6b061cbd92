// Wed Jan 15 2026 - Alex

use super::args::{AbiArgs, AnalyzeArgs, Args, Command};
use crate::config::Config;
use crate::orchestration::{BatchExecutor, BatchOutcome};
use crate::output::{BatchReport, JsonSerializer, ReportFormat, ReportGenerator};
use crate::structure::{AbiTable, LayoutEngine};
use crate::ui::progress::ProgressManager;
use crate::ui::{print_error, print_warning};
use crate::utils::{pluralize, LoggingUtils};
use colored::Colorize;

/// Exit status when every document was processed and nothing needs attention.
pub const EXIT_OK: i32 = 0;
/// Exit status when some document could not be processed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status of `analyze --check` when some struct can shrink.
pub const EXIT_FIXABLE: i32 = 2;

pub struct CommandHandler {
    quiet: bool,
    use_color: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            quiet: false,
            use_color: true,
        }
    }

    /// Runs one command and returns the process exit status.
    pub fn execute(&mut self, args: Args) -> anyhow::Result<i32> {
        self.quiet = args.quiet;
        self.use_color = !args.no_color;
        if args.no_color {
            colored::control::set_override(false);
        }
        LoggingUtils::init_logger(LoggingUtils::level_from_str(&args.log_level), self.use_color);

        match args.command {
            Command::Analyze(analyze_args) => self.handle_analyze(analyze_args),
            Command::Abi(abi_args) => self.handle_abi(abi_args),
        }
    }

    fn load_config(&self, args: &AnalyzeArgs) -> anyhow::Result<Config> {
        let mut config = match &args.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(abi) = &args.abi {
            config = config.with_abi(AbiTable::load(abi)?);
        }
        if let Some(threads) = args.threads {
            config = config.with_max_threads(threads);
        }
        config.only_fixable |= args.only_fixable;
        config.show_layout |= args.layout;
        config.json_output |= args.json;
        config.enable_progress_bars &= !self.quiet && args.files.len() > 1;
        config.validate()?;
        Ok(config)
    }

    fn handle_analyze(&self, args: AnalyzeArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;
        let config = self.load_config(&args)?;
        log::info!(
            "Analyzing {} with ABI {} on {} threads",
            pluralize(args.files.len(), "document", "documents"),
            config.abi.name,
            config.max_threads
        );

        let executor = BatchExecutor::new(LayoutEngine::new(config.abi.clone()), config.max_threads);
        let progress = ProgressManager::new()
            .with_enabled(config.enable_progress_bars)
            .documents(args.files.len() as u64);
        let outcomes = executor.execute_files(&args.files, Some(&progress));
        progress.finish_and_clear();

        let (reports, failures) = self.split(outcomes);

        if config.json_output {
            let serializer = JsonSerializer::new()
                .with_pretty_print(config.pretty_json)
                .with_before(config.show_layout)
                .with_only_fixable(config.only_fixable);
            match &args.output {
                Some(path) => {
                    serializer.serialize_to_file(&reports, path)?;
                    if !self.quiet {
                        println!("{}", format!("Report written to: {}", path.display()).green());
                    }
                }
                None => println!("{}", serializer.serialize_all(&reports)?),
            }
        } else if !self.quiet {
            let format = if args.markdown {
                ReportFormat::Markdown
            } else {
                ReportFormat::Text
            };
            let generator = ReportGenerator::new(format)
                .with_color(self.use_color)
                .with_layout(config.show_layout)
                .with_only_fixable(config.only_fixable);
            for report in &reports {
                print!("{}", generator.generate(report));
            }
        }

        let fixable: usize = reports.iter().map(BatchReport::fixable_count).sum();
        if failures > 0 {
            return Ok(EXIT_FAILURE);
        }
        if args.check && fixable > 0 {
            log::info!("{} can shrink", pluralize(fixable, "struct", "structs"));
            return Ok(EXIT_FIXABLE);
        }
        Ok(EXIT_OK)
    }

    fn split(&self, outcomes: Vec<BatchOutcome>) -> (Vec<BatchReport>, usize) {
        let mut reports = Vec::with_capacity(outcomes.len());
        let mut failures = 0;
        for outcome in outcomes {
            match outcome {
                Ok(report) => {
                    for issue in report.issues() {
                        log::warn!("{}: {}", report.source(), issue);
                    }
                    reports.push(report);
                }
                Err(failure) => {
                    failures += 1;
                    print_error(&format!("{}: {}", failure.source, failure.error));
                }
            }
        }
        if failures > 0 && !reports.is_empty() {
            print_warning(&format!(
                "{} failed, {} processed",
                pluralize(failures, "document", "documents"),
                reports.len()
            ));
        }
        (reports, failures)
    }

    fn handle_abi(&self, args: AbiArgs) -> anyhow::Result<i32> {
        let table = AbiTable::load(&args.abi)?;
        println!("{}", serde_json::to_string_pretty(&table)?);
        Ok(EXIT_OK)
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
