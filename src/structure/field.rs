// Tue Jan 13 2026 - Alex

use crate::structure::{Alignment, Layout, TypeDescriptor};
use std::fmt;

pub const PATH_SEPARATOR: char = '/';

/// One struct declaration, or one member of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    name: String,
    path: String,
    type_name: String,
    descriptor: TypeDescriptor,
    pub(crate) children: Vec<FieldNode>,
    pub(crate) size: u64,
    pub(crate) align: Alignment,
    pub(crate) offset: u64,
}

impl FieldNode {
    pub fn new(name: String, path: String, type_name: String, descriptor: TypeDescriptor) -> Self {
        Self {
            name,
            path,
            type_name,
            descriptor,
            children: Vec::new(),
            size: 0,
            align: Alignment::ONE,
            offset: 0,
        }
    }

    pub fn composite(name: String, path: String, type_name: String, children: Vec<FieldNode>) -> Self {
        let mut node = Self::new(name, path, type_name, TypeDescriptor::Composite);
        node.children = children;
        node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn is_composite(&self) -> bool {
        self.descriptor.is_composite()
    }

    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn align(&self) -> Alignment {
        self.align
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.size, self.align)
    }

    pub fn end_offset(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }

    /// Number of separators in the path; top-level declarations are depth 0.
    pub fn depth(&self) -> usize {
        self.path.matches(PATH_SEPARATOR).count()
    }

    pub(crate) fn set_layout(&mut self, layout: Layout) {
        self.size = layout.size;
        self.align = layout.align;
    }

    /// Bytes wasted between members, not counting the tail.
    pub fn interior_padding(&self) -> u64 {
        let mut cursor = 0;
        let mut padding = 0;
        for child in &self.children {
            padding += child.offset.saturating_sub(cursor);
            cursor = child.end_offset();
        }
        padding
    }

    pub fn trailing_padding(&self) -> u64 {
        let end = self.children.last().map_or(0, FieldNode::end_offset);
        self.size.saturating_sub(end)
    }

    pub fn total_padding(&self) -> u64 {
        self.interior_padding() + self.trailing_padding()
    }

    /// Depth-first search by path.
    pub fn find(&self, path: &str) -> Option<&FieldNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {} {}", self.name, self.type_name, self.offset, self.layout())
    }
}

/// Joins a parent path and a member segment.
pub fn child_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, segment)
    }
}
