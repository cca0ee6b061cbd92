// Tue Jan 13 2026 - Alex

pub mod json;
pub mod report;

pub use json::JsonSerializer;
pub use report::{ReportFormat, ReportGenerator};

use crate::structure::{Alignment, FieldNode, LayoutIssue};

/// Before and after layouts of one struct declaration.
#[derive(Debug, Clone)]
pub struct StructReport {
    before: FieldNode,
    after: FieldNode,
}

impl StructReport {
    pub fn new(before: FieldNode, after: FieldNode) -> Self {
        Self { before, after }
    }

    pub fn name(&self) -> &str {
        self.after.name()
    }

    pub fn before(&self) -> &FieldNode {
        &self.before
    }

    pub fn after(&self) -> &FieldNode {
        &self.after
    }

    pub fn before_size(&self) -> u64 {
        self.before.size()
    }

    pub fn after_size(&self) -> u64 {
        self.after.size()
    }

    pub fn align(&self) -> Alignment {
        self.after.align()
    }

    pub fn saved(&self) -> u64 {
        self.before_size().saturating_sub(self.after_size())
    }

    pub fn needs_fix(&self) -> bool {
        self.after_size() < self.before_size()
    }
}

/// Outcome of one batch: every struct of one declaration document.
#[derive(Debug, Clone)]
pub struct BatchReport {
    source: String,
    abi: String,
    structs: Vec<StructReport>,
    issues: Vec<LayoutIssue>,
}

impl BatchReport {
    pub fn new(source: String, abi: String, structs: Vec<StructReport>, issues: Vec<LayoutIssue>) -> Self {
        Self {
            source,
            abi,
            structs,
            issues,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn abi(&self) -> &str {
        &self.abi
    }

    pub fn structs(&self) -> &[StructReport] {
        &self.structs
    }

    pub fn issues(&self) -> &[LayoutIssue] {
        &self.issues
    }

    pub fn get(&self, name: &str) -> Option<&StructReport> {
        self.structs.iter().find(|s| s.name() == name)
    }

    pub fn fixable(&self) -> impl Iterator<Item = &StructReport> {
        self.structs.iter().filter(|s| s.needs_fix())
    }

    pub fn fixable_count(&self) -> usize {
        self.fixable().count()
    }

    pub fn total_saved(&self) -> u64 {
        self.structs.iter().map(StructReport::saved).sum()
    }
}
