// Tue Jan 15 2026 - Alex

pub mod abi;
pub mod alignment;
pub mod builder;
pub mod cache;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod field;
pub mod layout;
pub mod optimizer;
pub mod resolver;
pub mod serializer;
pub mod type_info;
pub mod validator;

pub use abi::AbiTable;
pub use alignment::{Alignment, Layout};
pub use builder::{StructureBuilder, STRUCT_TYPE_NAME};
pub use cache::{InProgress, LayoutCache, LayoutKey};
pub use declaration::{DeclarationDocument, MemberDeclaration, StructDeclaration};
pub use engine::LayoutEngine;
pub use error::{LayoutError, LayoutIssue};
pub use field::FieldNode;
pub use layout::{LayoutCalculator, PassContext, Placer, Resolution};
pub use optimizer::FieldOptimizer;
pub use resolver::{TypeRegistry, TypeResolver};
pub use serializer::SerializableLayout;
pub use type_info::{ScalarKind, StructMember, TypeDescriptor};
pub use validator::StructureValidator;
