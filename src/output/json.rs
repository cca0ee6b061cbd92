// Tue Jan 13 2026 - Alex

use crate::output::{BatchReport, StructReport};
use crate::structure::{LayoutError, LayoutIssue, SerializableLayout};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    abi: &'a str,
    total_saved: u64,
    structs: Vec<JsonStruct<'a>>,
    issues: &'a [LayoutIssue],
}

#[derive(Debug, Serialize)]
struct JsonStruct<'a> {
    name: &'a str,
    before_size: u64,
    after_size: u64,
    saved: u64,
    align: u64,
    needs_fix: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<SerializableLayout>,
    after: SerializableLayout,
}

impl<'a> JsonStruct<'a> {
    fn new(report: &'a StructReport, include_before: bool) -> Self {
        Self {
            name: report.name(),
            before_size: report.before_size(),
            after_size: report.after_size(),
            saved: report.saved(),
            align: report.align().as_u64(),
            needs_fix: report.needs_fix(),
            before: include_before.then(|| SerializableLayout::from(report.before())),
            after: SerializableLayout::from(report.after()),
        }
    }
}

pub struct JsonSerializer {
    pretty_print: bool,
    include_before: bool,
    only_fixable: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self {
            pretty_print: true,
            include_before: false,
            only_fixable: false,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_before(mut self, include: bool) -> Self {
        self.include_before = include;
        self
    }

    pub fn with_only_fixable(mut self, only: bool) -> Self {
        self.only_fixable = only;
        self
    }

    fn build<'a>(&self, report: &'a BatchReport) -> JsonReport<'a> {
        JsonReport {
            source: report.source(),
            abi: report.abi(),
            total_saved: report.total_saved(),
            structs: report
                .structs()
                .iter()
                .filter(|s| !self.only_fixable || s.needs_fix())
                .map(|s| JsonStruct::new(s, self.include_before))
                .collect(),
            issues: report.issues(),
        }
    }

    pub fn serialize(&self, report: &BatchReport) -> Result<String, LayoutError> {
        let value = self.build(report);
        let text = if self.pretty_print {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }

    /// Serializes several batches as one JSON array.
    pub fn serialize_all(&self, reports: &[BatchReport]) -> Result<String, LayoutError> {
        let values: Vec<JsonReport> = reports.iter().map(|r| self.build(r)).collect();
        let text = if self.pretty_print {
            serde_json::to_string_pretty(&values)?
        } else {
            serde_json::to_string(&values)?
        };
        Ok(text)
    }

    pub fn serialize_to_file<P: AsRef<Path>>(&self, reports: &[BatchReport], path: P) -> Result<(), LayoutError> {
        let json_str = self.serialize_all(reports)?;
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(json_str.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}
