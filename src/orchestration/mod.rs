// Tue Jan 13 2026 - Alex

pub mod scheduler;

pub use scheduler::{BatchExecutor, BatchFailure, BatchInput, BatchOutcome};
