use yangl_support::Status;

use super::context::{IdentityId, ModuleId, NodeId, TypedefId};
use crate::range::RangeSet;

/// A `type` statement's resolved shape. Facets are base-kind specific, as
/// spec's `Type` entity describes; range/length/pattern restrictions are
/// accumulated along the typedef derivation chain by [`crate::range`].
#[derive(Debug, Clone)]
pub struct Type {
  pub kind: TypeKind,
  /// Set when this `type` is a bare reference to a user typedef rather
  /// than a restriction of a built-in; `TypeDer` unres items resolve this.
  pub typedef: Option<TypedefId>,
}

impl Type {
  #[must_use]
  pub fn builtin(kind: TypeKind) -> Self {
    Self { kind, typedef: None }
  }
}

#[derive(Debug, Clone)]
pub enum TypeKind {
  Int8,
  Int16,
  Int32,
  Int64,
  Uint8,
  Uint16,
  Uint32,
  Uint64,
  Decimal64 {
    fraction_digits: u8,
    range: Option<RangeSet>,
  },
  String {
    length: Option<RangeSet>,
    patterns: Vec<String>,
  },
  Binary {
    length: Option<RangeSet>,
  },
  Bits {
    items: Vec<(String, u32)>,
  },
  Enumeration {
    items: Vec<(String, i64)>,
  },
  Boolean,
  Empty,
  Union(Vec<Type>),
  Leafref {
    path: String,
    target: Option<NodeId>,
    require_instance: bool,
  },
  InstanceIdentifier {
    require_instance: bool,
  },
  Identityref {
    base_name: String,
    base: Option<IdentityId>,
  },
  /// Ranged integer kinds (`int*`/`uint*`) carry their restriction
  /// separately from the fixed-width marker above so `int8 { range "1..10"; }`
  /// keeps its base kind distinguishable from a plain `int8`.
  RangedInt {
    base: IntBase,
    range: Option<RangeSet>,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntBase {
  Int8,
  Int16,
  Int32,
  Int64,
  Uint8,
  Uint16,
  Uint32,
  Uint64,
}

impl IntBase {
  #[must_use]
  pub fn domain(self) -> (i128, i128) {
    match self {
      Self::Int8 => (i8::MIN as i128, i8::MAX as i128),
      Self::Int16 => (i16::MIN as i128, i16::MAX as i128),
      Self::Int32 => (i32::MIN as i128, i32::MAX as i128),
      Self::Int64 => (i64::MIN as i128, i64::MAX as i128),
      Self::Uint8 => (0, u8::MAX as i128),
      Self::Uint16 => (0, u16::MAX as i128),
      Self::Uint32 => (0, u32::MAX as i128),
      Self::Uint64 => (0, u64::MAX as i128),
    }
  }
}

/// A `typedef` statement: a name bound to a base type, forming a DAG via
/// `der` that must terminate in a built-in.
#[derive(Debug, Clone)]
pub struct Typedef {
  pub name: yangl_support::Atom,
  pub module: ModuleId,
  pub status: Status,
  pub base: Type,
  /// Parent typedef this one restricts, if `base` is itself a named
  /// typedef rather than a built-in.
  pub der: Option<TypedefId>,
  pub default: Option<String>,
}

/// One `refine` sub-statement applied to a descendant of a `uses` site.
#[derive(Debug, Clone)]
pub struct Refine {
  pub target_name: String,
  pub target: Option<NodeId>,
  pub description: Option<String>,
  pub default: Option<String>,
  pub mandatory: Option<bool>,
  pub presence: Option<String>,
  pub min_elements: Option<u32>,
  pub max_elements: Option<u32>,
  pub config: Option<bool>,
  pub must: Vec<String>,
}
