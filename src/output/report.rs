// Tue Jan 13 2026 - Alex

use crate::output::{BatchReport, StructReport};
use crate::structure::FieldNode;
use colored::*;
use itertools::Itertools;
use std::fmt::Write;

pub struct ReportGenerator {
    format: ReportFormat,
    use_color: bool,
    show_layout: bool,
    only_fixable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
}

impl ReportGenerator {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            use_color: true,
            show_layout: false,
            only_fixable: false,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_layout(mut self, show: bool) -> Self {
        self.show_layout = show;
        self
    }

    pub fn with_only_fixable(mut self, only: bool) -> Self {
        self.only_fixable = only;
        self
    }

    pub fn generate(&self, report: &BatchReport) -> String {
        match self.format {
            ReportFormat::Text => self.generate_text(report),
            ReportFormat::Markdown => self.generate_markdown(report),
        }
    }

    fn selected<'r>(&self, report: &'r BatchReport) -> impl Iterator<Item = &'r StructReport> {
        let only_fixable = self.only_fixable;
        report.structs().iter().filter(move |s| !only_fixable || s.needs_fix())
    }

    fn paint(&self, text: String, style: fn(ColoredString) -> ColoredString) -> String {
        if self.use_color {
            style(text.normal()).to_string()
        } else {
            text
        }
    }

    fn generate_text(&self, report: &BatchReport) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{} ({})", self.paint(report.source().to_string(), |s| s.bold()), report.abi());

        for result in self.selected(report) {
            let line = if result.needs_fix() {
                self.paint(
                    format!(
                        "  {}: {} -> {} bytes, {} saved",
                        result.name(),
                        result.before_size(),
                        result.after_size(),
                        result.saved()
                    ),
                    |s| s.yellow(),
                )
            } else {
                self.paint(format!("  {}: {} bytes, already packed", result.name(), result.before_size()), |s| {
                    s.green()
                })
            };
            let _ = writeln!(text, "{}", line);
            if result.needs_fix() {
                let order = result.after().children().iter().map(member_label).join(", ");
                let _ = writeln!(text, "    order: {}", order);
            }
            if self.show_layout {
                text.push_str(&render_layout(result.before(), 4));
                if result.needs_fix() {
                    text.push_str(&render_layout(result.after(), 4));
                }
            }
        }

        for issue in report.issues() {
            let _ = writeln!(text, "  {}", self.paint(format!("note: {}", issue), |s| s.dimmed()));
        }
        let _ = writeln!(
            text,
            "  {} structs, {} can shrink, {} bytes saved",
            report.structs().len(),
            report.fixable_count(),
            report.total_saved()
        );
        text
    }

    fn generate_markdown(&self, report: &BatchReport) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "## {} ({})\n", report.source(), report.abi());
        md.push_str("| Struct | Before | After | Saved | Order |\n");
        md.push_str("|--------|-------:|------:|------:|-------|\n");
        for result in self.selected(report) {
            let order = result.after().children().iter().map(member_label).join(", ");
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                result.name(),
                result.before_size(),
                result.after_size(),
                result.saved(),
                order
            );
        }
        if !report.issues().is_empty() {
            md.push('\n');
            for issue in report.issues() {
                let _ = writeln!(md, "- {}", issue);
            }
        }
        md
    }
}

fn member_label(node: &FieldNode) -> String {
    if node.name().is_empty() {
        node.type_name().to_string()
    } else {
        node.name().to_string()
    }
}

/// Dumps a sized struct with per-member padding, nesting inline structs.
pub fn render_layout(node: &FieldNode, indent: usize) -> String {
    let mut text = String::new();
    let pad = " ".repeat(indent);
    if node.depth() == 0 {
        let _ = writeln!(text, "{}type {} struct {{", pad, node.name());
    } else {
        let _ = writeln!(text, "{}{} struct {{", pad, member_label(node));
    }

    let name_width = node.children().iter().map(|c| member_label(c).len()).max().unwrap_or(0).max(5);
    let type_width = node.children().iter().map(|c| c.type_name().len()).max().unwrap_or(0).max(11);
    let mut last_end = 0;
    for (idx, child) in node.children().iter().enumerate() {
        let padding = child.offset().saturating_sub(last_end);
        last_end = child.end_offset();
        if child.is_composite() {
            if padding > 0 {
                let _ = writeln!(text, "{}    +{}b", pad, padding);
            }
            text.push_str(&render_layout(child, indent + 4));
            continue;
        }

        let mut info = format!("[Size: {}, Align: {}, Offset: {}]", child.size(), child.align(), child.offset());
        if padding > 0 {
            info = format!("+{}b {}", padding, info);
        }
        if idx + 1 == node.children().len() && node.size() > last_end {
            info = format!("{} +{}b", info, node.size() - last_end);
        }
        let _ = writeln!(
            text,
            "{}    {:<name_width$} {:<type_width$} {}",
            pad,
            member_label(child),
            child.type_name(),
            info,
            name_width = name_width,
            type_width = type_width
        );
    }

    if node.depth() == 0 {
        let _ = writeln!(text, "{}}} {}", pad, node.layout());
    } else {
        let _ = writeln!(text, "{}}} {} @ {}", pad, node.layout(), node.offset());
    }
    text
}
