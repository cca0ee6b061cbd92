// Tue Jan 15 2026 - Alex

pub mod config;
pub mod orchestration;
pub mod output;
pub mod structure;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use orchestration::BatchExecutor;
pub use output::{BatchReport, StructReport};
pub use structure::{AbiTable, DeclarationDocument, FieldNode, LayoutEngine, LayoutError, LayoutIssue};
