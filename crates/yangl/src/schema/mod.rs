//! The in-memory schema graph: modules, nodes, typedefs, identities, and
//! the arena [`Context`] that owns them all (spec §3/§4.2).

mod context;
mod deviation;
mod identity;
mod module;
mod nav;
mod node;
mod types;

pub use context::{Context, IdentityId, ModuleId, NodeId, TypedefId};
pub use deviation::{Deviate, DeviateKind, DeviateProps, Deviation};
pub use identity::{Feature, Identity};
pub use module::{Import, Module, Revision};
pub use nav::{NavFlags, Scope, find_sibling, next_sibling};
pub use node::{MustClause, NodeFlags, NodeTypeMask, SchemaNode, SchemaNodeKind, Subject};
pub use types::{IntBase, Refine, Type, TypeKind, Typedef};
