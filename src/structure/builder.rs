// Tue Jan 13 2026 - Alex

use crate::structure::field::child_path;
use crate::structure::{FieldNode, TypeDescriptor};

/// Type name recorded for struct declarations and inline struct members.
pub const STRUCT_TYPE_NAME: &str = "struct{...}";

/// Builds an unsized field tree with unique paths.
pub struct StructureBuilder {
    name: String,
    path: String,
    children: Vec<FieldNode>,
}

impl StructureBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            children: Vec::new(),
        }
    }

    fn member(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path segment for a member: its name, its type for embedded members, a
    /// position suffix for blank members.
    pub fn segment(name: &str, type_text: &str, index: usize) -> String {
        match name {
            "" => type_text.trim().trim_start_matches('*').to_string(),
            "_" => format!("_#{}", index),
            _ => name.to_string(),
        }
    }

    pub fn field(mut self, name: &str, type_text: &str) -> Self {
        if let Some(members) = TypeDescriptor::parse_struct_members(type_text) {
            return self.nested(name, |inner| {
                members
                    .iter()
                    .fold(inner, |inner, member| inner.field(&member.name, &member.type_text))
            });
        }
        let segment = Self::segment(name, type_text, self.children.len());
        let path = child_path(&self.path, &segment);
        let descriptor = TypeDescriptor::parse_lossy(type_text);
        let node = if descriptor.is_composite() {
            FieldNode::composite(name.to_string(), path, STRUCT_TYPE_NAME.to_string(), Vec::new())
        } else {
            FieldNode::new(name.to_string(), path, type_text.trim().to_string(), descriptor)
        };
        self.children.push(node);
        self
    }

    pub fn embedded(self, type_text: &str) -> Self {
        self.field("", type_text)
    }

    /// Adds an inline struct member whose members are added by `build`.
    pub fn nested<F>(mut self, name: &str, build: F) -> Self
    where
        F: FnOnce(StructureBuilder) -> StructureBuilder,
    {
        let segment = Self::segment(name, STRUCT_TYPE_NAME, self.children.len());
        let inner = build(Self::member(name, child_path(&self.path, &segment)));
        self.children.push(inner.build());
        self
    }

    pub fn push(mut self, node: FieldNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn build(self) -> FieldNode {
        FieldNode::composite(self.name, self.path, STRUCT_TYPE_NAME.to_string(), self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let node = StructureBuilder::new("Outer")
            .field("a", "bool")
            .embedded("*Base")
            .field("_", "int32")
            .field("_", "int32")
            .nested("inner", |inner| inner.field("x", "int8"))
            .build();

        let paths: Vec<&str> = node.children().iter().map(FieldNode::path).collect();
        assert_eq!(paths, vec!["Outer/a", "Outer/Base", "Outer/_#2", "Outer/_#3", "Outer/inner"]);
        assert_eq!(node.children()[4].children()[0].path(), "Outer/inner/x");
        assert_eq!(node.children()[4].depth(), 1);
        assert!(node.children()[4].is_composite());
        assert_eq!(node.children()[1].type_name(), "*Base");
    }

    #[test]
    fn test_bare_struct_member_is_composite() {
        let node = StructureBuilder::new("S").field("empty", "struct").build();
        assert!(node.children()[0].is_composite());
        assert!(node.children()[0].children().is_empty());
        assert_eq!(node.children()[0].type_name(), STRUCT_TYPE_NAME);
    }

    #[test]
    fn test_struct_type_text_member_is_composite() {
        let node = StructureBuilder::new("S")
            .field("inner", "struct{ a bool; b, c int64 }")
            .build();
        let inner = &node.children()[0];
        assert!(inner.is_composite());
        let paths: Vec<&str> = inner.children().iter().map(FieldNode::path).collect();
        assert_eq!(paths, vec!["S/inner/a", "S/inner/b", "S/inner/c"]);
        assert_eq!(inner.children()[2].type_name(), "int64");
    }
}
