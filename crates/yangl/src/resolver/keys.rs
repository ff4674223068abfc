//! List key and `unique` constraint checks (spec §4.3.3).

use std::collections::HashSet;

use yangl_support::{Diag, Status, ValidationCode};

use crate::schema::{Context, NodeId, SchemaNodeKind, Subject, TypeKind};
use crate::unres_schema::UnresSchemaItem;

/// # Errors
/// Returns [`Diag::Validation`] for a missing key list, a duplicate key
/// name, a key of type `empty`, a key whose `config` disagrees with its
/// list, or a key that is not an immediate-child leaf; `Ok(false)` when
/// a named key does not exist among the list's children yet.
pub fn try_resolve_keys(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Subject::Node(list_id) = item.subject else {
    return Err(Diag::Internal("ListKeys item must target a node".into()));
  };

  let names: Vec<&str> = item.argument.split_whitespace().collect();
  if names.is_empty() {
    return Err(Diag::validation(ValidationCode::KeyMissing, "list has no keys"));
  }

  let list_config = ctx.node(list_id).flags.config;
  let children = ctx.node(list_id).children.clone();
  let mut seen = HashSet::new();
  let mut resolved = Vec::with_capacity(names.len());

  for name in &names {
    if !seen.insert(*name) {
      return Err(Diag::validation(ValidationCode::KeyDup, format!("duplicate key \"{name}\"")));
    }

    let Some(&leaf_id) = children.iter().find(|&&id| ctx.node(id).name.as_ref() == *name) else {
      return Ok(false);
    };

    let node = ctx.node(leaf_id);
    let SchemaNodeKind::Leaf { ty, .. } = &node.kind else {
      return Err(Diag::validation(ValidationCode::KeyMissing, format!("key \"{name}\" is not a leaf")));
    };
    if matches!(ty.kind, TypeKind::Empty) {
      return Err(Diag::validation(ValidationCode::KeyType, format!("key \"{name}\" may not have type empty")));
    }
    if node.when.is_some() {
      return Err(Diag::validation(ValidationCode::KeyType, format!("key \"{name}\" may not have a when condition")));
    }
    if node.flags.config != list_config {
      return Err(Diag::validation(
        ValidationCode::KeyConfig,
        format!("key \"{name}\" config does not match its list's"),
      ));
    }
    if !Status::may_reference(ctx.node(list_id).flags.status, node.flags.status) {
      return Err(Diag::validation(
        ValidationCode::KeyType,
        format!("key \"{name}\" has a less stable status than its list"),
      ));
    }

    resolved.push(leaf_id);
  }

  if let SchemaNodeKind::List { keys, .. } = &mut ctx.node_mut(list_id).kind {
    *keys = resolved;
  }
  Ok(true)
}

/// # Errors
/// Returns [`Diag::Validation`] (`PathInKey`) if a `unique` path steps
/// through a descendant `List` before reaching its leaf; `Ok(false)`
/// when a segment does not exist yet.
pub fn try_resolve_unique(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Subject::Node(list_id) = item.subject else {
    return Err(Diag::Internal("ListUniq item must target a node".into()));
  };

  let mut group = Vec::new();
  for token in item.argument.split_whitespace() {
    match resolve_unique_path(ctx, list_id, token)? {
      Some(leaf_id) => group.push(leaf_id),
      None => return Ok(false),
    }
  }

  if let SchemaNodeKind::List { unique, .. } = &mut ctx.node_mut(list_id).kind {
    unique.push(group);
  }
  Ok(true)
}

fn resolve_unique_path(ctx: &Context, list_id: NodeId, path: &str) -> Result<Option<NodeId>, Diag> {
  let segments: Vec<&str> = path.split('/').collect();
  let mut cur = list_id;

  for (idx, seg) in segments.iter().enumerate() {
    let name = seg.rsplit(':').next().unwrap_or(seg);
    let Some(next) = ctx.node(cur).children.iter().copied().find(|&id| ctx.node(id).name.as_ref() == name) else {
      return Ok(None);
    };

    let is_last = idx + 1 == segments.len();
    if !is_last && matches!(ctx.node(next).kind, SchemaNodeKind::List { .. }) {
      return Err(Diag::validation(
        ValidationCode::PathInKey,
        format!("unique path \"{path}\" crosses into a descendant list"),
      ));
    }
    cur = next;
  }

  Ok(Some(cur))
}
