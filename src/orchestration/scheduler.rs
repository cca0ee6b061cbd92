// Tue Jan 13 2026 - Alex

use crate::output::BatchReport;
use crate::structure::{DeclarationDocument, LayoutEngine, LayoutError};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// One declaration document waiting to be processed.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub source: String,
    pub text: String,
}

impl BatchInput {
    pub fn new(source: &str, text: &str) -> Self {
        Self {
            source: source.to_string(),
            text: text.to_string(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        Ok(Self {
            source: path.display().to_string(),
            text: fs::read_to_string(path)?,
        })
    }
}

/// A document that could not be turned into a batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub source: String,
    pub error: LayoutError,
}

pub type BatchOutcome = Result<BatchReport, BatchFailure>;

/// Runs independent batches on a rayon pool. Batches share nothing but the engine.
pub struct BatchExecutor {
    thread_count: usize,
    engine: LayoutEngine,
}

impl BatchExecutor {
    pub fn new(engine: LayoutEngine, thread_count: usize) -> Self {
        Self {
            thread_count: thread_count.max(1),
            engine,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Parses and processes one document.
    pub fn run_one(&self, input: &BatchInput) -> BatchOutcome {
        let forest = DeclarationDocument::from_json(&input.text)
            .and_then(DeclarationDocument::into_forest)
            .map_err(|error| BatchFailure {
                source: input.source.clone(),
                error,
            })?;
        log::debug!("{}: {} declarations", input.source, forest.len());
        Ok(self.engine.process(&input.source, forest))
    }

    /// Processes every input, keeping input order in the result.
    pub fn execute(&self, inputs: &[BatchInput], progress: Option<&ProgressBar>) -> Vec<BatchOutcome> {
        let run = || -> Vec<BatchOutcome> {
            inputs
                .par_iter()
                .map(|input| {
                    let outcome = self.run_one(input);
                    if let Some(bar) = progress {
                        bar.inc(1);
                    }
                    outcome
                })
                .collect()
        };

        match rayon::ThreadPoolBuilder::new().num_threads(self.thread_count).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                log::warn!("Falling back to the global thread pool: {}", e);
                run()
            }
        }
    }

    pub fn execute_files(&self, paths: &[PathBuf], progress: Option<&ProgressBar>) -> Vec<BatchOutcome> {
        let mut outcomes: Vec<Option<BatchOutcome>> = Vec::with_capacity(paths.len());
        let mut inputs = Vec::with_capacity(paths.len());
        let mut slots = Vec::with_capacity(paths.len());
        for path in paths {
            match BatchInput::from_path(path) {
                Ok(input) => {
                    slots.push(outcomes.len());
                    outcomes.push(None);
                    inputs.push(input);
                }
                Err(error) => {
                    if let Some(bar) = progress {
                        bar.inc(1);
                    }
                    outcomes.push(Some(Err(BatchFailure {
                        source: path.display().to_string(),
                        error,
                    })));
                }
            }
        }

        for (slot, outcome) in slots.into_iter().zip(self.execute(&inputs, progress)) {
            outcomes[slot] = Some(outcome);
        }
        outcomes.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::AbiTable;

    fn executor() -> BatchExecutor {
        BatchExecutor::new(LayoutEngine::new(AbiTable::amd64()), 2)
    }

    #[test]
    fn test_batches_keep_order() {
        let inputs = vec![
            BatchInput::new("a.json", r#"{"structs":[{"name":"A","fields":[{"name":"x","type":"bool"},{"name":"y","type":"int64"},{"name":"z","type":"bool"}]}]}"#),
            BatchInput::new("bad.json", "{"),
            BatchInput::new("b.json", r#"{"structs":[{"name":"B","fields":[{"name":"x","type":"int64"}]}]}"#),
        ];
        let outcomes = executor().execute(&inputs, None);

        assert_eq!(outcomes.len(), 3);
        let first = outcomes[0].as_ref().unwrap();
        assert_eq!(first.source(), "a.json");
        assert_eq!(first.get("A").map(|s| s.after_size()), Some(16));
        assert!(matches!(outcomes[1], Err(BatchFailure { error: LayoutError::Json(_), .. })));
        assert_eq!(outcomes[2].as_ref().unwrap().source(), "b.json");
    }

    #[test]
    fn test_same_names_in_separate_batches() {
        let inputs = vec![
            BatchInput::new("one", r#"{"structs":[{"name":"T","fields":[{"name":"x","type":"int8"}]}]}"#),
            BatchInput::new("two", r#"{"structs":[{"name":"T","fields":[{"name":"x","type":"int64"}]}]}"#),
        ];
        let outcomes = executor().execute(&inputs, None);
        assert_eq!(outcomes[0].as_ref().unwrap().structs()[0].before_size(), 1);
        assert_eq!(outcomes[1].as_ref().unwrap().structs()[0].before_size(), 8);
    }

    #[test]
    fn test_missing_file() {
        let outcomes = executor().execute_files(&[PathBuf::from("/nonexistent/decls.json")], None);
        assert!(matches!(outcomes[0], Err(BatchFailure { error: LayoutError::Io(_), .. })));
    }
}
