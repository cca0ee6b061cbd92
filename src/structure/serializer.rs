// Tue Jan 13 2026 - Alex

use crate::structure::FieldNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableLayout {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub offset: u64,
    pub size: u64,
    pub alignment: u64,
    /// Padding inserted before this member.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub padding: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SerializableLayout>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl SerializableLayout {
    fn with_padding(node: &FieldNode, padding: u64) -> Self {
        let mut cursor = 0;
        let fields = node
            .children()
            .iter()
            .map(|child| {
                let padding = child.offset().saturating_sub(cursor);
                cursor = child.end_offset();
                Self::with_padding(child, padding)
            })
            .collect();
        Self {
            name: node.name().to_string(),
            type_name: node.type_name().to_string(),
            offset: node.offset(),
            size: node.size(),
            alignment: node.align().as_u64(),
            padding,
            fields,
        }
    }
}

impl From<&FieldNode> for SerializableLayout {
    fn from(node: &FieldNode) -> Self {
        Self::with_padding(node, 0)
    }
}
