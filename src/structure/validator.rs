// Tue Jan 13 2026 - Alex

use crate::structure::{FieldNode, LayoutError};
use ahash::AHashSet;

/// Checks the layout invariants of a sized tree.
pub struct StructureValidator;

impl StructureValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, node: &FieldNode) -> Result<(), LayoutError> {
        let align = node.align().as_u64();
        if node.size() % align != 0 {
            return Err(LayoutError::ValidationFailed(format!(
                "{}: size {} is not a multiple of alignment {}",
                node.path(),
                node.size(),
                align
            )));
        }
        if !node.is_composite() {
            return Ok(());
        }

        let max_align = node.children().iter().map(FieldNode::align).max().unwrap_or_default();
        if node.align() != max_align {
            return Err(LayoutError::ValidationFailed(format!(
                "{}: alignment {} but widest member is {}",
                node.path(),
                node.align(),
                max_align
            )));
        }

        let mut cursor = 0;
        for child in node.children() {
            let expected = child.align().align(cursor);
            if child.offset() != expected {
                return Err(LayoutError::ValidationFailed(format!(
                    "Field {} at offset {}, expected {}",
                    child.path(),
                    child.offset(),
                    expected
                )));
            }
            cursor = child.end_offset();
            self.validate(child)?;
        }

        if node.size() != max_align.align(cursor) {
            return Err(LayoutError::ValidationFailed(format!(
                "{}: size {} does not close at {}",
                node.path(),
                node.size(),
                max_align.align(cursor)
            )));
        }
        Ok(())
    }

    /// Every path in the batch must be distinct.
    pub fn validate_paths(&self, forest: &[FieldNode]) -> Result<(), LayoutError> {
        let mut seen = AHashSet::new();
        let mut stack: Vec<&FieldNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            if !seen.insert(node.path()) {
                return Err(LayoutError::ValidationFailed(format!("Duplicate path {}", node.path())));
            }
            stack.extend(node.children());
        }
        Ok(())
    }
}

impl Default for StructureValidator {
    fn default() -> Self {
        Self::new()
    }
}
