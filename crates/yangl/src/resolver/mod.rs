//! Name-to-node/typedef/identity/feature resolution and the
//! schema-nodeid walking algorithms of spec §4.3. [`try_resolve`] is the
//! single dispatch point the worklist drives to a fixpoint; it never
//! logs (spec §9's "try_resolve never logs" design note) and reports a
//! retryable miss as `Ok(false)` rather than an error.

pub mod augment;
pub mod identity;
pub mod keys;
pub mod leafref;
pub mod uses;

use yangl_support::{Diag, Status, ValidationCode};

use crate::schema::{Context, ModuleId, SchemaNodeKind, Subject, Type};
use crate::unres_schema::{UnresKind, UnresSchemaItem};

/// # Errors
/// See module-level and per-kind documentation.
pub fn try_resolve(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  match item.kind {
    UnresKind::Ident => {
      // Batched separately by `Worklist::run_identity_phase` so cycles can
      // be detected before any identity's `base`/`der` is mutated.
      Err(Diag::Internal("Ident items are resolved as a batch, not individually".into()))
    }
    UnresKind::TypeIdentref => identity::try_resolve_identityref(ctx, item),
    UnresKind::TypeLeafref => leafref::try_resolve(ctx, item),
    UnresKind::TypeDer => try_resolve_type_der(ctx, item),
    UnresKind::TypeDflt => Ok(true),
    UnresKind::ChoiceDflt => try_resolve_choice_dflt(ctx, item),
    UnresKind::IfFeat => try_resolve_if_feature(ctx, item),
    UnresKind::Uses => uses::try_resolve(ctx, item),
    UnresKind::ListKeys => keys::try_resolve_keys(ctx, item),
    UnresKind::ListUniq => keys::try_resolve_unique(ctx, item),
    UnresKind::Augment => augment::try_resolve(ctx, item),
  }
}

/// Splits `raw` on `:` and resolves the left side as a YANG prefix
/// against `owner`'s import table (empty prefix or the module's own
/// prefix both mean "the module itself"). Returns `None` when the
/// prefix names an import that has not resolved yet — a retryable miss,
/// not a hard error.
pub(crate) fn resolve_prefixed<'a>(ctx: &Context, owner: ModuleId, raw: &'a str) -> Option<(ModuleId, &'a str)> {
  match raw.split_once(':') {
    Some((prefix, name)) => {
      let mod_name = ctx.module(owner).resolve_prefix(prefix)?;
      let (mid, _) = ctx.get_module(&mod_name, None)?;
      Some((mid, name))
    }
    None => Some((owner, raw)),
  }
}

pub(crate) fn find_typedef(ctx: &Context, module: ModuleId, name: &str) -> Option<crate::schema::TypedefId> {
  ctx
    .module(module)
    .typedefs
    .iter()
    .copied()
    .find(|&id| ctx.typedef(id).name.as_ref() == name)
}

pub(crate) fn find_identity_in(ctx: &Context, module: ModuleId, name: &str) -> Option<crate::schema::IdentityId> {
  ctx
    .module(module)
    .identities
    .iter()
    .copied()
    .find(|&id| ctx.identity(id).name.as_ref() == name)
}

pub(crate) fn find_feature(ctx: &Context, module: ModuleId, name: &str) -> Option<usize> {
  ctx.module(module).features.iter().position(|f| f.name.as_ref() == name)
}

/// Extracts the mutable [`Type`] a `TypeIdentref`/`TypeLeafref`/`TypeDer`
/// item targets: a leaf/leaf-list's own type, or a typedef's base type.
pub(crate) fn type_mut(ctx: &mut Context, subject: Subject) -> Option<&mut Type> {
  match subject {
    Subject::Node(id) => match &mut ctx.node_mut(id).kind {
      SchemaNodeKind::Leaf { ty, .. } | SchemaNodeKind::LeafList { ty, .. } => Some(ty),
      _ => None,
    },
    Subject::Typedef(id) => Some(&mut ctx.typedef_mut(id).base),
    Subject::Identity(_) => None,
  }
}

fn try_resolve_type_der(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Some((mod_id, name)) = resolve_prefixed(ctx, item.owner_module, &item.argument) else {
    return Ok(false);
  };
  let Some(base_typedef) = find_typedef(ctx, mod_id, name) else {
    return Ok(false);
  };

  let Subject::Typedef(subject_id) = item.subject else {
    return Err(Diag::Internal("TypeDer item must target a typedef".into()));
  };
  if subject_id == base_typedef {
    return Err(Diag::validation(
      ValidationCode::NoResolv,
      format!("typedef \"{}\" derives from itself", item.argument),
    ));
  }

  ctx.typedef_mut(subject_id).der = Some(base_typedef);
  let base_kind = ctx.typedef(base_typedef).base.kind.clone();
  ctx.typedef_mut(subject_id).base.kind = base_kind;
  Ok(true)
}

fn try_resolve_choice_dflt(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Subject::Node(choice_id) = item.subject else {
    return Err(Diag::Internal("ChoiceDflt item must target a node".into()));
  };
  let module = ctx.node(choice_id).module;
  let found = crate::schema::find_sibling(
    ctx,
    crate::schema::Scope::Node(choice_id),
    module,
    &item.argument,
    crate::schema::NodeTypeMask::CASE | crate::schema::NodeTypeMask::DATA,
    crate::schema::NavFlags::WITH_CASE,
  );
  let Some(case_id) = found else {
    return Ok(false);
  };

  let SchemaNodeKind::Choice { default_case, .. } = &mut ctx.node_mut(choice_id).kind else {
    return Err(Diag::Internal("ChoiceDflt item's subject is not a choice".into()));
  };
  *default_case = Some(case_id);
  Ok(true)
}

fn try_resolve_if_feature(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Some((mod_id, name)) = resolve_prefixed(ctx, item.owner_module, &item.argument) else {
    return Ok(false);
  };
  let Some(feature_idx) = find_feature(ctx, mod_id, name) else {
    return Ok(false);
  };

  let feature_status = ctx.module(mod_id).features[feature_idx].status;
  if !Status::may_reference(subject_status(ctx, item.subject), feature_status) {
    return Err(Diag::validation(
      ValidationCode::NoResolv,
      format!("if-feature \"{name}\" references a less stable status"),
    ));
  }

  Ok(true)
}

fn subject_status(ctx: &Context, subject: Subject) -> yangl_support::Status {
  match subject {
    Subject::Node(id) => ctx.node(id).flags.status,
    Subject::Typedef(id) => ctx.typedef(id).status,
    Subject::Identity(id) => ctx.identity(id).status,
  }
}

/// Deep-copies `src`'s subtree as a fresh set of arena entries owned by
/// `parent` (or `module`'s top level when `parent` is `None`) — the
/// "duplicate the grouping's subtree" step of `uses` expansion (spec
/// §4.3.2). The original subtree is left completely untouched.
pub(crate) fn duplicate_subtree(
  ctx: &mut Context,
  src: crate::schema::NodeId,
  module: ModuleId,
  parent: Option<crate::schema::NodeId>,
) -> crate::schema::NodeId {
  let name = ctx.node(src).name.clone();
  let kind = ctx.node(src).kind.clone();
  let flags = ctx.node(src).flags;
  let children = ctx.node(src).children.clone();

  let new_id = ctx.alloc_node(module, parent, name, kind, flags);
  for child in children {
    duplicate_subtree(ctx, child, module, Some(new_id));
  }
  new_id
}

/// Unlinks `node` from its owning parent's (or module's top-level)
/// children list without deallocating it; used when a `uses` directive
/// is expanded and the placeholder node is dropped from the visible
/// tree (spec property 4).
pub(crate) fn remove_from_parent(ctx: &mut Context, node: crate::schema::NodeId) {
  let parent = ctx.node(node).parent;
  let module = ctx.node(node).module;
  match parent {
    Some(p) => ctx.node_mut(p).children.retain(|&id| id != node),
    None => ctx.module_mut(module).data.retain(|&id| id != node),
  }
}

/// Resolves a `/`-joined dotted path (ignoring any `prefix:` component)
/// against `roots` and their descendants — the simplified lookup used
/// for `refine`/`uses`-owned `augment` targets, which address a
/// descendant of the just-duplicated grouping subtree rather than the
/// whole schema graph.
pub(crate) fn find_by_simple_path(ctx: &Context, roots: &[crate::schema::NodeId], path: &str) -> Option<crate::schema::NodeId> {
  let mut segments = path.split('/').filter(|s| !s.is_empty());
  let first = segments.next()?;
  let first_name = first.rsplit(':').next().unwrap_or(first);
  let mut cur = roots.iter().copied().find(|&id| ctx.node(id).name.as_ref() == first_name)?;

  for seg in segments {
    let name = seg.rsplit(':').next().unwrap_or(seg);
    cur = ctx.node(cur).children.iter().copied().find(|&id| ctx.node(id).name.as_ref() == name)?;
  }

  Some(cur)
}
