// Wed Jan 14 2026 - Alex

use crate::structure::layout::Placer;
use crate::structure::{FieldNode, Layout};
use std::cmp::Reverse;

/// Reorders members to cut padding.
///
/// Members are ranked by alignment, then size, both descending; fixed arrays
/// and slices are then moved behind everything else, keeping their rank.
/// This is a greedy heuristic, not an exhaustive search over permutations.
pub struct FieldOptimizer;

impl FieldOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Returns the members in their new order with fresh offsets.
    pub fn optimize(&self, mut children: Vec<FieldNode>) -> Vec<FieldNode> {
        children.sort_by_key(|child| (Reverse(child.align()), Reverse(child.size())));

        let (mut ordered, array_like): (Vec<FieldNode>, Vec<FieldNode>) = children
            .into_iter()
            .partition(|child| !child.descriptor().is_array_like());
        ordered.extend(array_like);

        Self::place(&mut ordered);
        ordered
    }

    /// Assigns offsets in current order and returns the enclosing layout.
    pub fn place(children: &mut [FieldNode]) -> Layout {
        let mut placer = Placer::new();
        for child in children.iter_mut() {
            child.offset = placer.place(child.layout());
        }
        placer.finish()
    }

    /// Reorders the members of `node` in place and refreshes its size.
    ///
    /// The current order is kept when the reordered one would be larger.
    /// Returns true when the member order changed.
    pub fn optimize_node(&self, node: &mut FieldNode) -> bool {
        if !node.is_composite() {
            return false;
        }
        let current = Self::place(&mut node.children);
        let mut candidate = self.optimize(node.children.clone());
        let reordered = Self::place(&mut candidate);

        if reordered.size > current.size {
            log::debug!(
                "{}: keeping declared order ({} bytes, reordered would be {})",
                node.path(),
                current.size,
                reordered.size
            );
            node.set_layout(current);
            return false;
        }

        let changed = candidate
            .iter()
            .map(FieldNode::path)
            .ne(node.children.iter().map(FieldNode::path));
        node.children = candidate;
        node.set_layout(reordered);
        changed
    }
}

impl Default for FieldOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{
        AbiTable, LayoutCalculator, PassContext, StructureBuilder, StructureValidator, TypeRegistry, TypeResolver,
    };

    fn sized(node: FieldNode) -> FieldNode {
        let mut forest = vec![node];
        let registry = TypeRegistry::from_forest(&forest);
        let abi = AbiTable::amd64();
        let resolver = TypeResolver::new(&abi, &registry);
        let mut ctx = PassContext::new();
        LayoutCalculator::new(&resolver).layout_forest(&mut forest, &mut ctx);
        forest.remove(0)
    }

    fn names(children: &[FieldNode]) -> Vec<&str> {
        children.iter().map(FieldNode::name).collect()
    }

    #[test]
    fn test_sorts_by_alignment_then_size() {
        let node = sized(
            StructureBuilder::new("BadStruct")
                .field("a", "bool")
                .field("b", "int32")
                .field("c", "bool")
                .field("d", "int64")
                .build(),
        );
        let optimized = FieldOptimizer::new().optimize(node.children().to_vec());

        assert_eq!(names(&optimized), vec!["d", "b", "a", "c"]);
        let offsets: Vec<u64> = optimized.iter().map(FieldNode::offset).collect();
        assert_eq!(offsets, vec![0, 8, 12, 13]);
    }

    #[test]
    fn test_array_like_members_go_last() {
        let node = sized(
            StructureBuilder::new("S")
                .field("items", "[]string")
                .field("flag", "bool")
                .field("count", "int64")
                .build(),
        );
        let optimized = FieldOptimizer::new().optimize(node.children().to_vec());
        assert_eq!(names(&optimized), vec!["count", "flag", "items"]);
    }

    #[test]
    fn test_arrays_keep_rank_among_themselves() {
        let node = sized(
            StructureBuilder::new("S")
                .field("small", "[3]int8")
                .field("wide", "[2]int64")
                .field("x", "int16")
                .field("list", "[]int8")
                .build(),
        );
        let optimized = FieldOptimizer::new().optimize(node.children().to_vec());
        assert_eq!(names(&optimized), vec!["x", "list", "wide", "small"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(FieldOptimizer::new().optimize(Vec::new()).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let node = sized(
            StructureBuilder::new("Mixed")
                .field("a", "bool")
                .field("arr", "[4]int16")
                .field("s", "string")
                .field("b", "int32")
                .field("p", "*int8")
                .field("c", "uint8")
                .field("list", "[]bool")
                .build(),
        );
        let optimizer = FieldOptimizer::new();
        let once = optimizer.optimize(node.children().to_vec());
        let twice = optimizer.optimize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_composite_ranked_by_its_layout() {
        let node = sized(
            StructureBuilder::new("Outer")
                .field("flag", "bool")
                .nested("inner", |inner| inner.field("a", "int32").field("b", "int32").field("c", "int32"))
                .field("wide", "int64")
                .build(),
        );
        let optimized = FieldOptimizer::new().optimize(node.children().to_vec());
        // inner is 12 bytes aligned to 4: after int64, before bool.
        assert_eq!(names(&optimized), vec!["wide", "inner", "flag"]);
    }

    #[test]
    fn test_optimize_node_refreshes_size() {
        let mut node = sized(
            StructureBuilder::new("BadStruct")
                .field("a", "bool")
                .field("b", "int32")
                .field("c", "bool")
                .field("d", "int64")
                .build(),
        );
        assert_eq!(node.size(), 24);
        assert!(FieldOptimizer::new().optimize_node(&mut node));
        assert_eq!(node.size(), 16);
        assert!(StructureValidator::new().validate(&node).is_ok());
        assert!(!FieldOptimizer::new().optimize_node(&mut node));
    }

    #[test]
    fn test_optimize_node_keeps_smaller_declared_order() {
        let mut node = sized(
            StructureBuilder::new("S")
                .field("a", "[1]int64")
                .field("b", "int32")
                .field("c", "bool")
                .field("d", "[3]byte")
                .build(),
        );
        assert_eq!(node.size(), 16);

        // Moving both arrays to the tail costs 8 bytes here.
        let candidate = FieldOptimizer::new().optimize(node.children().to_vec());
        assert_eq!(names(&candidate), vec!["b", "c", "a", "d"]);

        assert!(!FieldOptimizer::new().optimize_node(&mut node));
        assert_eq!(names(node.children()), vec!["a", "b", "c", "d"]);
        assert_eq!(node.size(), 16);
        assert!(StructureValidator::new().validate(&node).is_ok());
    }
}
