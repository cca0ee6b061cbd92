// Tue Jan 13 2026 - Alex

use crate::structure::cache::{InProgress, LayoutCache, LayoutKey};
use crate::structure::type_info::is_valid_custom_type_name;
use crate::structure::{Alignment, FieldNode, Layout, LayoutIssue, TypeResolver};

/// A resolved layout, flagged when a cycle substitution went into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub layout: Layout,
    /// Tainted layouts are never cached.
    pub tainted: bool,
}

impl Resolution {
    pub fn exact(layout: Layout) -> Self {
        Self { layout, tainted: false }
    }

    pub fn cyclic(layout: Layout) -> Self {
        Self { layout, tainted: true }
    }
}

/// State owned by one pass over one batch.
#[derive(Debug, Default)]
pub struct PassContext {
    pub(crate) cache: LayoutCache,
    pub(crate) in_progress: InProgress,
    issues: Vec<LayoutIssue>,
}

impl PassContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, issue: LayoutIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn issues(&self) -> &[LayoutIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<LayoutIssue> {
        self.issues
    }
}

/// Assigns offsets to members in order.
#[derive(Debug, Clone, Copy)]
pub struct Placer {
    cursor: u64,
    max_align: Alignment,
}

impl Placer {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            max_align: Alignment::ONE,
        }
    }

    /// Returns the offset of the placed member.
    pub fn place(&mut self, layout: Layout) -> u64 {
        let offset = layout.align.align(self.cursor);
        self.cursor = offset.saturating_add(layout.size);
        self.max_align = self.max_align.max(layout.align);
        offset
    }

    /// Size of the enclosing composite, tail padding included.
    pub fn finish(&self) -> Layout {
        Layout::new(self.max_align.align(self.cursor), self.max_align)
    }
}

impl Default for Placer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lays out members bottom-up, writing size, alignment and offset into the tree.
pub struct LayoutCalculator<'r> {
    resolver: &'r TypeResolver<'r>,
}

impl<'r> LayoutCalculator<'r> {
    pub fn new(resolver: &'r TypeResolver<'r>) -> Self {
        Self { resolver }
    }

    pub fn compute_layout(&self, node: &mut FieldNode, ctx: &mut PassContext) -> Layout {
        if !node.is_composite() {
            let resolved = self.resolver.resolve(node.descriptor(), node.path(), ctx);
            node.set_layout(resolved.layout);
            return resolved.layout;
        }
        let key = if node.depth() == 0 && is_valid_custom_type_name(node.name()) {
            LayoutKey::Named(node.name().to_string())
        } else {
            LayoutKey::Positional(node.path().to_string())
        };
        self.layout_composite(node, key, ctx).layout
    }

    pub fn layout_forest(&self, forest: &mut [FieldNode], ctx: &mut PassContext) -> Vec<Layout> {
        forest.iter_mut().map(|node| self.compute_layout(node, ctx)).collect()
    }

    pub(crate) fn layout_composite(&self, node: &mut FieldNode, key: LayoutKey, ctx: &mut PassContext) -> Resolution {
        if !ctx.in_progress.enter(key.clone()) {
            ctx.record(LayoutIssue::CyclicType {
                path: node.path().to_string(),
                type_name: key.as_str().to_string(),
            });
            let layout = self.resolver.cycle_layout();
            node.set_layout(layout);
            return Resolution::cyclic(layout);
        }
        if node.children.is_empty() {
            ctx.record(LayoutIssue::DegenerateComposite {
                path: node.path().to_string(),
            });
        }

        let mut placer = Placer::new();
        let mut tainted = false;
        for child in node.children.iter_mut() {
            let resolved = if child.is_composite() {
                let child_key = LayoutKey::Positional(child.path().to_string());
                self.layout_composite(child, child_key, ctx)
            } else if let Some(layout) = ctx.cache.lookup(child) {
                Resolution::exact(layout)
            } else {
                let resolved = self.resolver.resolve(child.descriptor(), child.path(), ctx);
                if !resolved.tainted {
                    ctx.cache.insert(LayoutKey::for_member(child), resolved.layout);
                }
                resolved
            };
            child.set_layout(resolved.layout);
            child.offset = placer.place(resolved.layout);
            tainted |= resolved.tainted;
        }

        let layout = placer.finish();
        node.set_layout(layout);
        ctx.in_progress.leave(&key);
        if !tainted {
            ctx.cache.insert(key, layout);
        }
        Resolution { layout, tainted }
    }
}
