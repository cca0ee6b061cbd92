// Wed Jan 14 2026 - Alex

use crate::output::{BatchReport, StructReport};
use crate::structure::{
    AbiTable, FieldNode, FieldOptimizer, LayoutCalculator, LayoutIssue, PassContext, StructureValidator,
    TypeRegistry, TypeResolver,
};
use crate::utils::logging::ScopedTimer;

/// Upper bound on reorder and resize rounds for one batch.
const MAX_REORDER_ROUNDS: usize = 8;

/// Sizes a batch of declarations, reorders every struct, sizes it again.
pub struct LayoutEngine {
    abi: AbiTable,
    optimizer: FieldOptimizer,
}

impl LayoutEngine {
    pub fn new(abi: AbiTable) -> Self {
        Self {
            abi,
            optimizer: FieldOptimizer::new(),
        }
    }

    pub fn abi(&self) -> &AbiTable {
        &self.abi
    }

    /// Runs one sizing pass over the forest with a fresh cache and registry.
    pub fn size_forest(&self, forest: &mut [FieldNode]) -> PassContext {
        let registry = TypeRegistry::from_forest(forest);
        let resolver = TypeResolver::new(&self.abi, &registry);
        let mut ctx = PassContext::new();
        LayoutCalculator::new(&resolver).layout_forest(forest, &mut ctx);
        log::debug!(
            "Sized {} declarations ({} cache entries, {} hits)",
            forest.len(),
            ctx.cache().len(),
            ctx.cache().hits()
        );
        ctx
    }

    /// Reorders every composite node, deepest first. Returns how many changed order.
    pub fn optimize_forest(&self, forest: &mut [FieldNode]) -> usize {
        let mut routes = Vec::new();
        for (index, root) in forest.iter().enumerate() {
            collect_composites(root, vec![index], &mut routes);
        }
        routes.sort_by(|a, b| b.depth.cmp(&a.depth).then_with(|| a.path.cmp(&b.path)));

        let mut changed = 0;
        for route in &routes {
            if let Some(node) = node_at_mut(forest, &route.indices) {
                if self.optimizer.optimize_node(node) {
                    changed += 1;
                }
            }
        }
        log::debug!("Reordered {} of {} composites", changed, routes.len());
        changed
    }

    pub fn process(&self, name: &str, mut forest: Vec<FieldNode>) -> BatchReport {
        let _timer = ScopedTimer::new(name);
        let validator = StructureValidator::new();
        if let Err(e) = validator.validate_paths(&forest) {
            log::warn!("{}: {}", name, e);
        }

        let before_ctx = self.size_forest(&mut forest);
        let before = forest.clone();

        // Named members only see a reordered declaration after a sizing pass,
        // so reorder and resize until no order changes.
        let mut issues: Vec<LayoutIssue> = before_ctx.into_issues();
        for round in 1..=MAX_REORDER_ROUNDS {
            let changed = self.optimize_forest(&mut forest);
            let after_ctx = self.size_forest(&mut forest);
            for issue in after_ctx.into_issues() {
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
            if changed == 0 {
                break;
            }
            if round == MAX_REORDER_ROUNDS {
                log::debug!("{}: still reordering after {} rounds", name, round);
            }
        }
        for issue in &issues {
            log::debug!("{}", issue);
        }

        let structs: Vec<StructReport> = before
            .into_iter()
            .zip(forest)
            .map(|(before, after)| {
                if let Err(e) = validator.validate(&after) {
                    log::error!("{}", e);
                }
                let report = StructReport::new(before, after);
                if report.needs_fix() {
                    log::debug!(
                        "{}: {} -> {} bytes",
                        report.name(),
                        report.before_size(),
                        report.after_size()
                    );
                }
                report
            })
            .collect();

        BatchReport::new(name.to_string(), self.abi.name.clone(), structs, issues)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(AbiTable::default())
    }
}

struct Route {
    depth: usize,
    path: String,
    indices: Vec<usize>,
}

fn collect_composites(node: &FieldNode, indices: Vec<usize>, routes: &mut Vec<Route>) {
    if !node.is_composite() {
        return;
    }
    for (index, child) in node.children().iter().enumerate() {
        let mut child_indices = indices.clone();
        child_indices.push(index);
        collect_composites(child, child_indices, routes);
    }
    routes.push(Route {
        depth: node.depth(),
        path: node.path().to_string(),
        indices,
    });
}

fn node_at_mut<'a>(forest: &'a mut [FieldNode], indices: &[usize]) -> Option<&'a mut FieldNode> {
    let (first, rest) = indices.split_first()?;
    let mut node = forest.get_mut(*first)?;
    for index in rest {
        node = node.children.get_mut(*index)?;
    }
    Some(node)
}
