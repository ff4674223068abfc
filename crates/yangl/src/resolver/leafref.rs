//! `leafref` path resolution (spec §4.3.2): parse `path-arg`, walk the
//! schema tree following `..` and named segments, and require the final
//! segment to name a `Leaf` or `LeafList`.

use yangl_support::{Diag, Status, ValidationCode};

use crate::pathlex::parse_path_arg;
use crate::schema::{Context, NavFlags, NodeId, NodeTypeMask, Scope, SchemaNodeKind, Subject, TypeKind, find_sibling};
use crate::unres_schema::UnresSchemaItem;

use super::type_mut;

/// # Errors
/// Returns [`Diag::Validation`] (`PathInNode`) for a malformed path, a
/// path that ascends past the schema root, or one that terminates on a
/// non-leaf; `Ok(false)` when an intermediate segment's target does not
/// exist yet (a later pass should retry).
pub fn try_resolve(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Subject::Node(leaf_id) = item.subject else {
    return Err(Diag::Internal("TypeLeafref item must target a node".into()));
  };

  let bytes = item.argument.as_bytes();
  let parsed =
    parse_path_arg(bytes).map_err(|e| Diag::validation(ValidationCode::PathInNode, format!("malformed leafref path: {e}")))?;

  let mut scope = if let Some(times) = parsed.parent_times {
    let mut cur: Option<NodeId> = Some(leaf_id);
    for _ in 0..times {
      cur = match cur {
        Some(id) => ctx.node(id).parent,
        None => {
          return Err(Diag::validation(
            ValidationCode::PathInNode,
            "leafref path ascends above the schema root",
          ));
        }
      };
    }
    match cur {
      Some(id) => Scope::Node(id),
      None => Scope::Module(ctx.node(leaf_id).module),
    }
  } else {
    Scope::Module(ctx.node(leaf_id).module)
  };

  let mut module = ctx.node(leaf_id).module;
  let mut target: Option<NodeId> = None;
  let last_idx = parsed.segments.len().saturating_sub(1);

  for (seg_idx, (node_ident, _predicates)) in parsed.segments.iter().enumerate() {
    let mod_text = std::str::from_utf8(&bytes[node_ident.mod_name.0..node_ident.mod_name.1]).unwrap_or_default();
    let name_text = std::str::from_utf8(&bytes[node_ident.name.0..node_ident.name.1]).unwrap_or_default();

    let seg_module = if mod_text.is_empty() {
      module
    } else {
      match ctx.module(module).resolve_prefix(mod_text).and_then(|n| ctx.get_module(&n, None)) {
        Some((mid, _)) => mid,
        None => return Ok(false),
      }
    };

    let mask = if seg_idx == last_idx {
      NodeTypeMask::LEAF | NodeTypeMask::LEAF_LIST
    } else {
      NodeTypeMask::CONTAINER | NodeTypeMask::LIST | NodeTypeMask::CHOICE | NodeTypeMask::CASE
    };

    let Some(found_id) = find_sibling(ctx, scope, seg_module, name_text, mask, NavFlags::empty()) else {
      return Ok(false);
    };

    module = seg_module;
    if seg_idx == last_idx {
      target = Some(found_id);
    } else {
      scope = Scope::Node(found_id);
    }
  }

  let Some(target_id) = target else {
    return Err(Diag::Internal("leafref path had no segments".into()));
  };
  if !matches!(ctx.node(target_id).kind, SchemaNodeKind::Leaf { .. } | SchemaNodeKind::LeafList { .. }) {
    return Err(Diag::validation(
      ValidationCode::PathInNode,
      "leafref path does not resolve to a leaf or leaf-list",
    ));
  }
  if !Status::may_reference(ctx.node(leaf_id).flags.status, ctx.node(target_id).flags.status) {
    return Err(Diag::validation(
      ValidationCode::NoResolv,
      "leafref path target is less stable than the referencing leaf",
    ));
  }

  let Some(ty) = type_mut(ctx, item.subject) else {
    return Err(Diag::Internal("TypeLeafref item must target a typed node".into()));
  };
  let TypeKind::Leafref { target: slot, .. } = &mut ty.kind else {
    return Err(Diag::Internal("TypeLeafref item's type is not a leafref".into()));
  };
  *slot = Some(target_id);

  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::schema::{Module, NodeFlags, Type, TypeKind};
  use crate::unres_schema::UnresKind;

  #[test]
  fn resolves_forward_sibling_reference() {
    let mut ctx = Context::new(None).unwrap();
    let m = ctx.new_module(Module::new("t".into(), "urn:t", "t".into()));

    let a = ctx.alloc_node(
      m,
      None,
      "a".into(),
      SchemaNodeKind::Leaf {
        ty: Type::builtin(TypeKind::Leafref {
          path: "../b".to_string(),
          target: None,
          require_instance: true,
        }),
        default: None,
      },
      NodeFlags::default(),
    );
    let b = ctx.alloc_node(
      m,
      None,
      "b".into(),
      SchemaNodeKind::Leaf {
        ty: Type::builtin(TypeKind::String { length: None, patterns: Vec::new() }),
        default: None,
      },
      NodeFlags::default(),
    );

    let item = UnresSchemaItem {
      kind: UnresKind::TypeLeafref,
      owner_module: m,
      subject: Subject::Node(a),
      argument: "../b".to_string(),
    };

    assert!(try_resolve(&mut ctx, &item).unwrap());
    let SchemaNodeKind::Leaf { ty, .. } = &ctx.node(a).kind else { unreachable!() };
    let TypeKind::Leafref { target, .. } = &ty.kind else { unreachable!() };
    assert_eq!(*target, Some(b));
  }
}
