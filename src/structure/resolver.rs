// Wed Jan 14 2026 - Alex

use crate::structure::cache::LayoutKey;
use crate::structure::layout::{LayoutCalculator, PassContext, Placer, Resolution};
use crate::structure::{AbiTable, FieldNode, Layout, LayoutIssue, TypeDescriptor};
use indexmap::IndexMap;

/// Struct declarations of one batch, keyed by name.
///
/// Built from the forest at the start of every pass so a named member always
/// sees the current field order of the struct it refers to.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    declarations: IndexMap<String, FieldNode>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_forest(forest: &[FieldNode]) -> Self {
        let declarations = forest
            .iter()
            .filter(|node| node.is_composite() && !node.name().is_empty())
            .map(|node| (node.name().to_string(), node.clone()))
            .collect();
        Self { declarations }
    }

    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.declarations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Maps type descriptors to platform sizes and alignments.
pub struct TypeResolver<'a> {
    abi: &'a AbiTable,
    registry: &'a TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(abi: &'a AbiTable, registry: &'a TypeRegistry) -> Self {
        Self { abi, registry }
    }

    pub fn abi(&self) -> &AbiTable {
        self.abi
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Layout used in place of a type that is already being resolved.
    pub fn cycle_layout(&self) -> Layout {
        self.abi.pointer
    }

    /// Layout used for shapes the resolver does not understand.
    pub fn fallback_layout(&self) -> Layout {
        self.abi.string
    }

    /// Resolves `descriptor` as seen from the member at `path`.
    pub fn resolve(&self, descriptor: &TypeDescriptor, path: &str, ctx: &mut PassContext) -> Resolution {
        match descriptor {
            TypeDescriptor::Scalar(kind) => Resolution::exact(self.abi.scalar(*kind)),
            TypeDescriptor::Pointer(_) => Resolution::exact(self.abi.pointer),
            TypeDescriptor::FixedArray(elem, len) => {
                let resolved = self.resolve(elem, path, ctx);
                match resolved.layout.checked_repeat(*len) {
                    Some(layout) => Resolution { layout, ..resolved },
                    None => {
                        log::warn!("{}: `{}` does not fit in the address space", path, descriptor);
                        ctx.record(LayoutIssue::UnresolvableType {
                            path: path.to_string(),
                            type_name: descriptor.to_string(),
                        });
                        Resolution { layout: self.fallback_layout(), ..resolved }
                    }
                }
            }
            TypeDescriptor::DynamicSequence(_) => Resolution::exact(self.abi.slice),
            TypeDescriptor::Map => Resolution::exact(self.abi.map),
            TypeDescriptor::Channel => Resolution::exact(self.abi.channel),
            TypeDescriptor::Interface => Resolution::exact(self.abi.interface),
            TypeDescriptor::Function => Resolution::exact(self.abi.function),
            // Members live on the node; the calculator lays those out directly.
            TypeDescriptor::Composite => Resolution::exact(Layout::EMPTY),
            TypeDescriptor::AnonymousStruct(members) => self.resolve_anonymous(members, path, ctx),
            TypeDescriptor::NamedReference(name) => self.resolve_named(name, path, ctx),
            TypeDescriptor::Unknown(text) => {
                ctx.record(LayoutIssue::UnresolvableType {
                    path: path.to_string(),
                    type_name: text.clone(),
                });
                Resolution::exact(self.fallback_layout())
            }
        }
    }

    fn resolve_anonymous(&self, members: &[TypeDescriptor], path: &str, ctx: &mut PassContext) -> Resolution {
        if members.is_empty() {
            ctx.record(LayoutIssue::DegenerateComposite { path: path.to_string() });
        }
        let mut placer = Placer::new();
        let mut tainted = false;
        for member in members {
            let resolved = self.resolve(member, path, ctx);
            tainted |= resolved.tainted;
            placer.place(resolved.layout);
        }
        Resolution { layout: placer.finish(), tainted }
    }

    fn resolve_named(&self, name: &str, path: &str, ctx: &mut PassContext) -> Resolution {
        let key = LayoutKey::Named(name.to_string());
        if ctx.in_progress.contains(&key) {
            log::warn!("{}: `{}` refers to itself without indirection", path, name);
            ctx.record(LayoutIssue::CyclicType {
                path: path.to_string(),
                type_name: name.to_string(),
            });
            return Resolution::cyclic(self.cycle_layout());
        }
        if let Some(layout) = ctx.cache.get(&key) {
            return Resolution::exact(layout);
        }
        let Some(declaration) = self.registry.get(name) else {
            log::debug!("{}: `{}` is not declared in this batch", path, name);
            ctx.record(LayoutIssue::UnresolvableType {
                path: path.to_string(),
                type_name: name.to_string(),
            });
            return Resolution::exact(self.fallback_layout());
        };

        // Lay out a scratch copy; the declaration itself is sized on its own turn.
        let mut scratch = declaration.clone();
        LayoutCalculator::new(self).layout_composite(&mut scratch, key, ctx)
    }
}
