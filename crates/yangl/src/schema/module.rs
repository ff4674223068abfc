use yangl_support::Atom;

use super::context::{IdentityId, NodeId, TypedefId};
use super::deviation::Deviation;
use super::identity::Feature;

/// One entry of a module's `revision` list, newest first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Revision {
  /// ISO `YYYY-MM-DD`, or empty when the module carries no revision.
  pub date: String,
  pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Import {
  pub module_name: Atom,
  pub prefix: Atom,
  pub revision: Option<String>,
}

/// A compilation unit: either a top-level `Module` or, once merged, the
/// contribution of a `Submodule` reached via `belongs-to`. Submodule
/// content is folded into its parent's arrays at parse time but retains
/// `origin_submodule` so status/scope checks can still tell where a
/// definition physically lives.
#[derive(Debug, Clone)]
pub struct Module {
  pub name: Atom,
  pub namespace: String,
  pub prefix: Atom,
  /// Newest revision first; empty means "no revision statement".
  pub revisions: Vec<Revision>,
  pub imports: Vec<Import>,
  pub includes: Vec<Atom>,
  pub implemented: bool,
  pub typedefs: Vec<TypedefId>,
  pub identities: Vec<IdentityId>,
  pub features: Vec<Feature>,
  pub data: Vec<NodeId>,
  pub augments: Vec<NodeId>,
  pub deviations: Vec<Deviation>,
  pub origin_submodule: Option<Atom>,
}

impl Module {
  #[must_use]
  pub fn new(name: Atom, namespace: impl Into<String>, prefix: Atom) -> Self {
    Self {
      name,
      namespace: namespace.into(),
      prefix,
      revisions: Vec::new(),
      imports: Vec::new(),
      includes: Vec::new(),
      implemented: false,
      typedefs: Vec::new(),
      identities: Vec::new(),
      features: Vec::new(),
      data: Vec::new(),
      augments: Vec::new(),
      deviations: Vec::new(),
      origin_submodule: None,
    }
  }

  #[must_use]
  pub fn revision(&self) -> &str {
    self.revisions.first().map_or("", |r| r.date.as_str())
  }

  /// Resolve a YANG prefix to the imported module's name, or `Some` of
  /// this module's own name when `prefix` matches its own prefix.
  #[must_use]
  pub fn resolve_prefix(&self, prefix: &str) -> Option<Atom> {
    if prefix.is_empty() || prefix == self.prefix.as_ref() {
      return Some(self.name.clone());
    }
    self
      .imports
      .iter()
      .find(|imp| imp.prefix.as_ref() == prefix)
      .map(|imp| imp.module_name.clone())
  }
}
