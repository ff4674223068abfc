use std::path::{Path, PathBuf};

use yangl_support::{Atom, Diag, Level, SchemaSource, SourceFormat, ValidationCode};

use super::deviation::Deviation;
use super::identity::{Feature, Identity};
use super::module::Module;
use super::node::{NodeFlags, NodeTypeMask, SchemaNode, SchemaNodeKind};
use super::types::Typedef;
use crate::logger::Logger;
use crate::unres_schema::{UnresSchemaItem, Worklist};

macro_rules! arena_id {
  ($name:ident) => {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct $name(pub u32);
  };
}

arena_id!(ModuleId);
arena_id!(NodeId);
arena_id!(TypedefId);
arena_id!(IdentityId);

/// Root container owning every `Module` loaded into it plus the identifier
/// dictionary (interning is delegated to [`yangl_support::Atom`]). A
/// `Context` is a shared-nothing unit: distinct contexts never alias state,
/// and this type is deliberately not `Sync` — see spec §5.
pub struct Context {
  pub(crate) modules: Vec<Module>,
  pub(crate) nodes: Vec<SchemaNode>,
  pub(crate) typedefs: Vec<Typedef>,
  pub(crate) identities: Vec<Identity>,
  pub(crate) worklist: Worklist,
  pub(crate) search_dirs: Vec<PathBuf>,
  pub(crate) module_set_id: u64,
  logger: Logger,
  last_error: Option<Diag>,
}

impl Context {
  /// Creates a context preloaded with `ietf-inet-types`, `ietf-yang-types`,
  /// `ietf-yang-library`, and the `yang` built-in module (spec §6, scenario
  /// S1). `search_dir`, if given, is converted to an absolute path; a
  /// non-existent directory is a [`Diag::System`] error.
  pub fn new(search_dir: Option<&Path>) -> Result<Self, Diag> {
    let mut ctx = Self {
      modules: Vec::new(),
      nodes: Vec::new(),
      typedefs: Vec::new(),
      identities: Vec::new(),
      worklist: Worklist::default(),
      search_dirs: Vec::new(),
      module_set_id: 0,
      logger: Logger::default(),
      last_error: None,
    };

    if let Some(dir) = search_dir {
      ctx.add_search_dir(dir)?;
    }

    crate::builtins::install(&mut ctx);
    Ok(ctx)
  }

  /// # Errors
  /// Returns [`Diag::System`] if `dir` does not exist.
  pub fn add_search_dir(&mut self, dir: &Path) -> Result<(), Diag> {
    let absolute = dir
      .canonicalize()
      .map_err(|e| Diag::System(format!("search directory {}: {e}", dir.display())))?;
    self.search_dirs.push(absolute);
    Ok(())
  }

  #[must_use]
  pub fn search_dirs(&self) -> &[PathBuf] {
    &self.search_dirs
  }

  /// Resolves `name` (optionally pinned to `revision`) via `source`, then
  /// hands the fetched text to `parse` — the textual YANG/YIN front-end,
  /// out of this engine's scope, that turns it into a registered [`Module`]
  /// plus [`UnresSchemaItem`]s (spec §6's `ctx_load_module`).
  ///
  /// # Errors
  /// Propagates [`Diag::System`] from `source.load` or whatever `parse`
  /// returns.
  pub fn load_module(
    &mut self,
    name: &str,
    revision: Option<&str>,
    source: &dyn SchemaSource,
    parse: impl FnOnce(&mut Context, &str, SourceFormat) -> Result<ModuleId, Diag>,
  ) -> Result<ModuleId, Diag> {
    let (text, format) = source.load(name, revision)?;
    parse(self, &text, format)
  }

  /// Builds the `ietf-yang-library`-shaped `modules-state` data tree (spec
  /// §6's `ctx_info`).
  ///
  /// # Errors
  /// See [`crate::info::build_info_tree`].
  pub fn info(&self) -> Result<crate::data::DataTree, Diag> {
    crate::info::build_info_tree(self)
  }

  /// JSON-flavored schema-nodeid lookup (spec §6's `ctx_get_node`):
  /// absolute when `start` is `None`, relative to `start` otherwise. Each
  /// segment may carry its own `module:` prefix; an unprefixed segment
  /// inherits the module of the segment before it.
  ///
  /// # Errors
  /// Returns [`Diag::Validation`] (`PathInNode`) on malformed syntax or a
  /// segment with no module context, (`InMod`) for an unknown module
  /// prefix. `Ok(None)` means the path is well-formed but no such node
  /// exists.
  pub fn get_node(&self, start: Option<NodeId>, nodeid: &str) -> Result<Option<NodeId>, Diag> {
    use super::nav::{NavFlags, Scope, find_sibling};
    use crate::pathlex::{Relativity, parse_schema_nodeid};

    let mut relativity = Relativity::Unset;
    let mut offset = 0usize;
    let bytes = nodeid.as_bytes();
    let mut current = start;
    let mut current_module = start.map(|id| self.node(id).module);

    while offset < bytes.len() {
      let seg = parse_schema_nodeid(&bytes[offset..], &mut relativity)
        .map_err(|e| Diag::validation(ValidationCode::PathInNode, format!("malformed schema-nodeid at byte {}", offset + e.0)))?;

      let (mod_start, mod_end) = seg.node.mod_name;
      let (name_start, name_end) = seg.node.name;
      let module_name = (mod_end > mod_start).then(|| &nodeid[offset + mod_start..offset + mod_end]);
      let name = &nodeid[offset + name_start..offset + name_end];

      let module_id = match module_name {
        Some(m) => self
          .get_module(m, None)
          .map(|(id, _)| id)
          .ok_or_else(|| Diag::validation(ValidationCode::InMod, format!("unknown module \"{m}\" in schema-nodeid")))?,
        None => current_module.ok_or_else(|| Diag::validation(ValidationCode::PathInNode, "schema-nodeid segment has no module context"))?,
      };

      let scope = match current {
        Some(id) => Scope::Node(id),
        None => Scope::Module(module_id),
      };

      let Some(found) = find_sibling(self, scope, module_id, name, NodeTypeMask::ANY, NavFlags::empty()) else {
        return Ok(None);
      };

      current = Some(found);
      current_module = Some(module_id);
      offset += seg.consumed;
    }

    Ok(current)
  }

  /// A submodule's contribution is folded into its parent `Module` at
  /// parse time (spec §3); this looks it up by the name recorded in
  /// `origin_submodule` rather than through a separate arena.
  #[must_use]
  pub fn get_submodule(&self, name: &str) -> Option<(ModuleId, &Module)> {
    self
      .modules
      .iter()
      .enumerate()
      .find(|(_, m)| m.origin_submodule.as_ref().is_some_and(|s| s.as_ref() == name))
      .map(|(idx, m)| (ModuleId(idx as u32), m))
  }

  // -- arena allocation, the "schema input contract" a parser drives --

  pub fn new_module(&mut self, module: Module) -> ModuleId {
    self.modules.push(module);
    ModuleId((self.modules.len() - 1) as u32)
  }

  pub fn module(&self, id: ModuleId) -> &Module {
    &self.modules[id.0 as usize]
  }

  pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
    &mut self.modules[id.0 as usize]
  }

  pub fn alloc_node(
    &mut self,
    module: ModuleId,
    parent: Option<NodeId>,
    name: Atom,
    kind: SchemaNodeKind,
    flags: NodeFlags,
  ) -> NodeId {
    self.nodes.push(SchemaNode {
      name,
      module,
      parent,
      children: Vec::new(),
      flags,
      kind,
      when: None,
      must: Vec::new(),
    });
    let id = NodeId((self.nodes.len() - 1) as u32);

    if let Some(parent_id) = parent {
      self.nodes[parent_id.0 as usize].children.push(id);
    } else {
      self.module_mut(module).data.push(id);
    }

    id
  }

  pub fn node(&self, id: NodeId) -> &SchemaNode {
    &self.nodes[id.0 as usize]
  }

  pub fn node_mut(&mut self, id: NodeId) -> &mut SchemaNode {
    &mut self.nodes[id.0 as usize]
  }

  pub fn alloc_typedef(&mut self, module: ModuleId, typedef: Typedef) -> TypedefId {
    self.typedefs.push(typedef);
    let id = TypedefId((self.typedefs.len() - 1) as u32);
    self.module_mut(module).typedefs.push(id);
    id
  }

  pub fn typedef(&self, id: TypedefId) -> &Typedef {
    &self.typedefs[id.0 as usize]
  }

  pub fn typedef_mut(&mut self, id: TypedefId) -> &mut Typedef {
    &mut self.typedefs[id.0 as usize]
  }

  pub fn alloc_identity(&mut self, module: ModuleId, identity: Identity) -> IdentityId {
    self.identities.push(identity);
    let id = IdentityId((self.identities.len() - 1) as u32);
    self.module_mut(module).identities.push(id);
    id
  }

  pub fn identity(&self, id: IdentityId) -> &Identity {
    &self.identities[id.0 as usize]
  }

  pub fn identity_mut(&mut self, id: IdentityId) -> &mut Identity {
    &mut self.identities[id.0 as usize]
  }

  pub fn register_unres(&mut self, item: UnresSchemaItem) {
    self.worklist.push(item);
  }

  /// Drives the worklist to a fixpoint (spec §4.4). Takes the queue out
  /// of `self` for the duration since resolution needs `&mut Context`
  /// while walking its own pending items.
  ///
  /// # Errors
  /// See [`Worklist::drive`].
  pub fn resolve_all(&mut self) -> Result<(), Diag> {
    let worklist = std::mem::take(&mut self.worklist);
    worklist.drive(self)
  }

  pub fn add_deviation(&mut self, module: ModuleId, deviation: Deviation) {
    self.module_mut(module).deviations.push(deviation);
  }

  /// Marks `module` as fully registered: assigns it the next
  /// `module-set-id`, and if `implemented` is requested, rejects a second
  /// implemented revision of the same name.
  ///
  /// # Errors
  /// Returns [`Diag::Validation`] (`DuplicateId`) if a module with the same
  /// `(name, revision)` already exists, or if another revision of the same
  /// name is already implemented.
  pub fn finish_module(&mut self, id: ModuleId, implemented: bool) -> Result<(), Diag> {
    let (name, revision) = {
      let m = self.module(id);
      (m.name.clone(), m.revision().to_string())
    };

    for (idx, other) in self.modules.iter().enumerate() {
      if idx as u32 == id.0 {
        continue;
      }
      if other.name == name && other.revision() == revision {
        return Err(Diag::validation(
          ValidationCode::DuplicateId,
          format!("module \"{name}\" revision \"{revision}\" already loaded"),
        ));
      }
      if implemented && other.name == name && other.implemented {
        return Err(Diag::validation(
          ValidationCode::DuplicateId,
          format!("module \"{name}\" is already implemented by another revision"),
        ));
      }
    }

    self.module_mut(id).implemented = implemented;
    self.module_set_id += 1;
    Ok(())
  }

  // -- lookups (spec §6) --

  #[must_use]
  pub fn get_module(&self, name: &str, revision: Option<&str>) -> Option<(ModuleId, &Module)> {
    self
      .modules
      .iter()
      .enumerate()
      .filter(|(_, m)| m.name.as_ref() == name)
      .filter(|(_, m)| revision.is_none_or(|r| m.revision() == r))
      .max_by(|(_, a), (_, b)| a.revision().cmp(b.revision()))
      .map(|(idx, m)| (ModuleId(idx as u32), m))
  }

  #[must_use]
  pub fn get_module_by_ns(&self, ns: &str, revision: Option<&str>) -> Option<(ModuleId, &Module)> {
    self
      .modules
      .iter()
      .enumerate()
      .filter(|(_, m)| m.namespace == ns)
      .filter(|(_, m)| revision.is_none_or(|r| m.revision() == r))
      .max_by(|(_, a), (_, b)| a.revision().cmp(b.revision()))
      .map(|(idx, m)| (ModuleId(idx as u32), m))
  }

  /// The revision of `module` immediately older than it, if any other
  /// revision of the same name is loaded.
  #[must_use]
  pub fn get_module_older(&self, module: ModuleId) -> Option<(ModuleId, &Module)> {
    let name = self.module(module).name.clone();
    let this_rev = self.module(module).revision().to_string();
    self
      .modules
      .iter()
      .enumerate()
      .filter(|(idx, m)| *idx as u32 != module.0 && m.name == name && m.revision() < this_rev.as_str())
      .max_by(|(_, a), (_, b)| a.revision().cmp(b.revision()))
      .map(|(idx, m)| (ModuleId(idx as u32), m))
  }

  pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
    self
      .modules
      .iter()
      .enumerate()
      .map(|(idx, m)| (ModuleId(idx as u32), m))
  }

  #[must_use]
  pub fn module_set_id(&self) -> u64 {
    self.module_set_id
  }

  // -- logging / error state (spec §6/§7) --

  pub fn set_verbosity(&mut self, level: Level) {
    self.logger.set_verbosity(level);
  }

  pub fn set_log_callback(&mut self, callback: Option<crate::logger::LogCallback>, include_path: bool) {
    self.logger.set_callback(callback, include_path);
  }

  #[must_use]
  pub fn log_callback(&self) -> Option<&crate::logger::LogCallback> {
    self.logger.callback()
  }

  pub(crate) fn log(&self, level: Level, message: &str, path: Option<&str>) {
    self.logger.log(level, message, path);
  }

  pub fn set_last_error(&mut self, diag: Diag) {
    self.last_error = Some(diag);
  }

  #[must_use]
  pub fn last_error(&self) -> Option<&Diag> {
    self.last_error.as_ref()
  }
}
