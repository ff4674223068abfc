use yangl_support::Status;

use super::context::{IdentityId, ModuleId, NodeId, TypedefId};
use super::types::{Refine, Type};

/// Shared header every schema node variant carries, matching spec's
/// `SchemaNode` "shared fields" (name, owning module, parent, ordered
/// children, flags). Children are owned exclusively by their parent;
/// everything else ([`super::context::Context`]-level lookups) crosses
/// this boundary through [`NodeId`] rather than a smart pointer.
#[derive(Debug, Clone)]
pub struct SchemaNode {
  pub name: yangl_support::Atom,
  pub module: ModuleId,
  pub parent: Option<NodeId>,
  pub children: Vec<NodeId>,
  pub flags: NodeFlags,
  pub kind: SchemaNodeKind,
  /// `when` condition gating this node's existence in a data tree, if
  /// any. Set after allocation since it is independent of `kind`.
  pub when: Option<String>,
  /// `must` constraints evaluated against instances of this node.
  pub must: Vec<MustClause>,
}

/// One `must` sub-statement: the XPath boolean expression plus the
/// optional diagnostic text RFC 7950 lets it override.
#[derive(Debug, Clone)]
pub struct MustClause {
  pub expr: String,
  pub error_message: Option<String>,
  pub error_app_tag: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct NodeFlags {
  pub config: bool,
  /// Whether `config` was explicitly stated on this node (`LYS_CONFIG_SET`)
  /// versus inherited from its parent; augment/refine config propagation
  /// consults this to decide whether a descendant may be overridden.
  pub config_set: bool,
  pub status: Status,
  pub mandatory: bool,
}

impl Default for NodeFlags {
  fn default() -> Self {
    Self {
      config: true,
      config_set: false,
      status: Status::Current,
      mandatory: false,
    }
  }
}

#[derive(Debug, Clone)]
pub enum SchemaNodeKind {
  Container {
    presence: Option<String>,
  },
  Leaf {
    ty: Type,
    default: Option<String>,
  },
  LeafList {
    ty: Type,
    min_elements: u32,
    max_elements: Option<u32>,
  },
  List {
    keys: Vec<NodeId>,
    key_names: String,
    unique: Vec<Vec<NodeId>>,
    min_elements: u32,
    max_elements: Option<u32>,
  },
  Choice {
    default_case: Option<NodeId>,
    default_case_name: Option<String>,
  },
  Case,
  AnyXml,
  Uses {
    grouping_name: String,
    grouping: Option<NodeId>,
    refines: Vec<Refine>,
    augments: Vec<NodeId>,
  },
  Grouping,
  Augment {
    target_name: String,
    target: Option<NodeId>,
  },
  Rpc,
  Input,
  Output,
  Notif,
}

impl SchemaNodeKind {
  #[must_use]
  pub fn type_mask_bit(&self) -> NodeTypeMask {
    match self {
      Self::Container { .. } => NodeTypeMask::CONTAINER,
      Self::Leaf { .. } => NodeTypeMask::LEAF,
      Self::LeafList { .. } => NodeTypeMask::LEAF_LIST,
      Self::List { .. } => NodeTypeMask::LIST,
      Self::Choice { .. } => NodeTypeMask::CHOICE,
      Self::Case => NodeTypeMask::CASE,
      Self::AnyXml => NodeTypeMask::ANYXML,
      Self::Uses { .. } => NodeTypeMask::USES,
      Self::Grouping => NodeTypeMask::GROUPING,
      Self::Augment { .. } => NodeTypeMask::AUGMENT,
      Self::Rpc => NodeTypeMask::RPC,
      Self::Input => NodeTypeMask::INPUT,
      Self::Output => NodeTypeMask::OUTPUT,
      Self::Notif => NodeTypeMask::NOTIF,
    }
  }

  /// Structural nodes the data tree never instantiates directly and whose
  /// children are transparently reachable through them.
  #[must_use]
  pub fn is_structural(&self) -> bool {
    matches!(
      self,
      Self::Uses { .. } | Self::Choice { .. } | Self::Case | Self::Input | Self::Output
    )
  }

  #[must_use]
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Leaf { .. } | Self::LeafList { .. } | Self::AnyXml)
  }
}

bitflags::bitflags! {
  /// Mask of acceptable terminal nodetypes for a schema-nodeid resolution,
  /// and the per-nodetype tag `find_sibling` filters on.
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct NodeTypeMask: u32 {
    const CONTAINER = 1 << 0;
    const LEAF = 1 << 1;
    const LEAF_LIST = 1 << 2;
    const LIST = 1 << 3;
    const CHOICE = 1 << 4;
    const CASE = 1 << 5;
    const ANYXML = 1 << 6;
    const USES = 1 << 7;
    const GROUPING = 1 << 8;
    const AUGMENT = 1 << 9;
    const RPC = 1 << 10;
    const INPUT = 1 << 11;
    const OUTPUT = 1 << 12;
    const NOTIF = 1 << 13;

    const DATA = Self::CONTAINER.bits() | Self::LEAF.bits() | Self::LEAF_LIST.bits()
      | Self::LIST.bits() | Self::CHOICE.bits() | Self::CASE.bits() | Self::ANYXML.bits();
    const ANY = u32::MAX;
  }
}

/// `NodeId`s a typedef/identity/leafref reference may target, decoupled
/// from [`NodeId`] so the worklist and resolver can address the three
/// arenas uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
  Node(NodeId),
  Typedef(TypedefId),
  Identity(IdentityId),
}
