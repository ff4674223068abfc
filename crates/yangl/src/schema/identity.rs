use yangl_support::Status;

use super::context::{IdentityId, ModuleId};

/// An `identity` statement. `base` is populated by base-identity resolution
/// (§4.3.2); `der` is the back-reference list the resolver grows as other
/// identities resolve their base against this one — analogous to the
/// dynamically-grown `der` array the engine this is grounded on keeps per
/// identity, but as an owned `Vec` rather than a realloc'd C array.
#[derive(Debug, Clone)]
pub struct Identity {
  pub name: yangl_support::Atom,
  pub module: ModuleId,
  pub status: Status,
  pub base_name: Option<String>,
  pub base: Option<IdentityId>,
  pub der: Vec<IdentityId>,
}

impl Identity {
  #[must_use]
  pub fn new(name: yangl_support::Atom, module: ModuleId, base_name: Option<String>) -> Self {
    Self {
      name,
      module,
      status: Status::Current,
      base_name,
      base: None,
      der: Vec::new(),
    }
  }
}

/// A `feature` statement. `if-feature` expressions referenced elsewhere are
/// evaluated against the set of enabled features at resolution time; a
/// feature with no `if-feature` of its own is always `enabled`.
#[derive(Debug, Clone)]
pub struct Feature {
  pub name: yangl_support::Atom,
  pub module: ModuleId,
  pub status: Status,
  pub if_feature: Vec<String>,
  pub enabled: bool,
}
