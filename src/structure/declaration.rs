// Wed Jan 14 2026 - Alex

use crate::structure::field::child_path;
use crate::structure::{FieldNode, LayoutError, StructureBuilder, TypeDescriptor, STRUCT_TYPE_NAME};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A batch of struct declarations as read from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationDocument {
    #[serde(default)]
    pub structs: Vec<StructDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructDeclaration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<MemberDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDeclaration {
    /// Empty for embedded members.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Members of an inline struct.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<MemberDeclaration>,
}

impl MemberDeclaration {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            fields: Vec::new(),
        }
    }

    fn is_inline_struct(&self) -> bool {
        !self.fields.is_empty() || TypeDescriptor::parse_lossy(&self.type_name).is_composite()
    }

    /// Members spelled out in the type text, e.g. `struct{ a bool; b int64 }`.
    fn inline_members(&self) -> Option<Vec<MemberDeclaration>> {
        let members = TypeDescriptor::parse_struct_members(&self.type_name)?;
        Some(
            members
                .iter()
                .map(|member| MemberDeclaration::new(&member.name, &member.type_text))
                .collect(),
        )
    }
}

impl DeclarationDocument {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    /// Builds one unsized tree per declared struct.
    pub fn into_forest(self) -> Result<Vec<FieldNode>, LayoutError> {
        let mut seen = AHashSet::new();
        let mut forest = Vec::with_capacity(self.structs.len());
        for decl in self.structs {
            let name = decl.name.trim().to_string();
            if name.is_empty() {
                return Err(LayoutError::MissingName);
            }
            if !seen.insert(name.clone()) {
                return Err(LayoutError::DuplicateStruct(name));
            }
            let children = build_members(&name, &decl.fields)?;
            forest.push(FieldNode::composite(name.clone(), name, STRUCT_TYPE_NAME.to_string(), children));
        }
        Ok(forest)
    }
}

fn build_members(parent: &str, members: &[MemberDeclaration]) -> Result<Vec<FieldNode>, LayoutError> {
    let mut segments = AHashSet::new();
    let mut nodes = Vec::with_capacity(members.len());
    for (index, member) in members.iter().enumerate() {
        let name = member.name.trim();
        if member.type_name.trim().is_empty() && member.fields.is_empty() {
            return Err(LayoutError::MissingType {
                parent: parent.to_string(),
                index,
            });
        }
        let segment = StructureBuilder::segment(name, &member.type_name, index);
        if segment.is_empty() || !segments.insert(segment.clone()) {
            return Err(LayoutError::DuplicateMember {
                parent: parent.to_string(),
                member: segment,
            });
        }
        let path = child_path(parent, &segment);
        let inline = if member.fields.is_empty() { member.inline_members() } else { None };
        let node = if let Some(inline) = inline {
            let children = build_members(&path, &inline)?;
            FieldNode::composite(name.to_string(), path, STRUCT_TYPE_NAME.to_string(), children)
        } else if member.is_inline_struct() {
            let children = build_members(&path, &member.fields)?;
            FieldNode::composite(name.to_string(), path, STRUCT_TYPE_NAME.to_string(), children)
        } else {
            let type_text = member.type_name.trim();
            FieldNode::new(name.to_string(), path, type_text.to_string(), TypeDescriptor::parse_lossy(type_text))
        };
        nodes.push(node);
    }
    Ok(nodes)
}
