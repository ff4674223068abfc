//! `augment` resolution (spec §4.3.2): locate the target by schema-nodeid
//! and splice the augment's owned children into it. A top-level
//! `augment` statement's target is always absolute; a `uses`-owned
//! augment's target is a descendant of the grouping's freshly duplicated
//! subtree, handled by [`apply_to_subtree`] instead.

use yangl_support::{Diag, ValidationCode};

use crate::pathlex::{Relativity, parse_schema_nodeid};
use crate::schema::{Context, ModuleId, NavFlags, NodeId, NodeTypeMask, Scope, SchemaNodeKind, Subject, find_sibling};
use crate::unres_schema::UnresSchemaItem;

use super::find_by_simple_path;

/// # Errors
/// Returns [`Diag::Validation`] (`PathInNode`) for a malformed target
/// path or (`DuplicateId`) if the target already owns a same-named
/// child; `Ok(false)` when the target does not exist yet.
pub fn try_resolve(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Subject::Node(augment_id) = item.subject else {
    return Err(Diag::Internal("Augment item must target a node".into()));
  };

  let Some(target) = resolve_absolute(ctx, item.owner_module, &item.argument)? else {
    return Ok(false);
  };

  splice_children(ctx, augment_id, target)?;

  if let SchemaNodeKind::Augment { target: slot, .. } = &mut ctx.node_mut(augment_id).kind {
    *slot = Some(target);
  }

  Ok(true)
}

/// Applies a `uses`-owned augment against the just-duplicated subtree
/// `roots`, addressing its target by a plain descendant path rather
/// than the full module-rooted walk [`try_resolve`] uses.
///
/// # Errors
/// Returns [`Diag::Validation`] (`NoResolv`/`DuplicateId`) on an
/// unreachable target or a name collision.
pub fn apply_to_subtree(ctx: &mut Context, augment_id: NodeId, roots: &[NodeId]) -> Result<(), Diag> {
  let target_name = match &ctx.node(augment_id).kind {
    SchemaNodeKind::Augment { target_name, .. } => target_name.clone(),
    _ => return Err(Diag::Internal("apply_to_subtree expects an Augment node".into())),
  };

  let Some(target) = find_by_simple_path(ctx, roots, &target_name) else {
    return Err(Diag::validation(
      ValidationCode::NoResolv,
      format!("uses augment target \"{target_name}\" not found in the expanded grouping"),
    ));
  };

  splice_children(ctx, augment_id, target)?;

  if let SchemaNodeKind::Augment { target: slot, .. } = &mut ctx.node_mut(augment_id).kind {
    *slot = Some(target);
  }

  Ok(())
}

fn resolve_absolute(ctx: &Context, owner_module: ModuleId, path: &str) -> Result<Option<NodeId>, Diag> {
  let bytes = path.as_bytes();
  let mut relativity = Relativity::Unset;
  let mut pos = 0usize;
  let mut module = owner_module;
  let mut scope: Option<NodeId> = None;
  let mut last = None;

  while pos < bytes.len() {
    let remaining = &bytes[pos..];
    let seg = parse_schema_nodeid(remaining, &mut relativity)
      .map_err(|e| Diag::validation(ValidationCode::PathInNode, format!("malformed augment target: {e}")))?;

    let mod_text = std::str::from_utf8(&remaining[seg.node.mod_name.0..seg.node.mod_name.1]).unwrap_or_default();
    let name_text = std::str::from_utf8(&remaining[seg.node.name.0..seg.node.name.1]).unwrap_or_default();

    let seg_module = if mod_text.is_empty() {
      module
    } else {
      match ctx.module(module).resolve_prefix(mod_text).and_then(|n| ctx.get_module(&n, None)) {
        Some((mid, _)) => mid,
        None => return Ok(None),
      }
    };

    let nav_scope = match scope {
      Some(id) => Scope::Node(id),
      None => Scope::Module(seg_module),
    };

    let Some(found) = find_sibling(ctx, nav_scope, seg_module, name_text, NodeTypeMask::ANY, NavFlags::empty()) else {
      return Ok(None);
    };

    module = seg_module;
    scope = Some(found);
    last = Some(found);
    pos += seg.consumed;
  }

  Ok(last)
}

fn splice_children(ctx: &mut Context, augment_id: NodeId, target: NodeId) -> Result<(), Diag> {
  let target_config = ctx.node(target).flags.config;
  let owner_module = ctx.node(augment_id).module;
  let incoming = ctx.node(augment_id).children.clone();
  let existing = ctx.node(target).children.clone();

  for &new_child in &incoming {
    let new_name = ctx.node(new_child).name.clone();
    if existing.iter().any(|&e| ctx.node(e).name == new_name) {
      return Err(Diag::validation(
        ValidationCode::DuplicateId,
        format!("augment target already has a child named \"{new_name}\""),
      ));
    }
    if ctx.node(new_child).flags.mandatory && ctx.node(target).module != owner_module {
      return Err(Diag::validation(
        ValidationCode::NoResolv,
        format!("augment may not add mandatory node \"{new_name}\" to a target in another module"),
      ));
    }
  }

  for child in incoming {
    ctx.node_mut(child).parent = Some(target);
    if !ctx.node(child).flags.config_set {
      ctx.node_mut(child).flags.config = target_config;
    }
    ctx.node_mut(target).children.push(child);
  }
  ctx.node_mut(augment_id).children.clear();

  Ok(())
}
