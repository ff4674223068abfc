//! `uses` expansion (spec §4.3.2): locate the named grouping by walking
//! lexical ancestors, duplicate its subtree as siblings of the `uses`
//! directive, apply `refine`s, then apply the `uses`' own owned
//! augments against the duplicate.

use yangl_support::{Diag, Status, ValidationCode};

use crate::schema::{Context, ModuleId, NodeId, Refine, SchemaNodeKind, Subject};
use crate::unres_schema::UnresSchemaItem;

use super::{duplicate_subtree, find_by_simple_path, remove_from_parent, resolve_prefixed};

/// # Errors
/// Returns [`Diag::Validation`] if a `refine` or owned `augment`
/// target cannot be found inside the expanded subtree; `Ok(false)`
/// when the grouping itself is not resolvable yet.
pub fn try_resolve(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Subject::Node(uses_id) = item.subject else {
    return Err(Diag::Internal("Uses item must target a node".into()));
  };

  let Some((grouping_module, grouping_name)) = resolve_prefixed(ctx, item.owner_module, &item.argument) else {
    return Ok(false);
  };
  let Some(grouping_id) = find_grouping(ctx, uses_id, grouping_module, grouping_name) else {
    return Ok(false);
  };
  if !Status::may_reference(ctx.node(uses_id).flags.status, ctx.node(grouping_id).flags.status) {
    return Err(Diag::validation(
      ValidationCode::NoResolv,
      format!("uses of grouping \"{grouping_name}\" references a less stable status"),
    ));
  }

  let uses_parent = ctx.node(uses_id).parent;
  let uses_module = ctx.node(uses_id).module;

  let src_children = ctx.node(grouping_id).children.clone();
  let mut copied = Vec::with_capacity(src_children.len());
  for child in src_children {
    copied.push(duplicate_subtree(ctx, child, uses_module, uses_parent));
  }

  remove_from_parent(ctx, uses_id);

  let refines = match &ctx.node(uses_id).kind {
    SchemaNodeKind::Uses { refines, .. } => refines.clone(),
    _ => return Err(Diag::Internal("Uses item's subject is not a uses node".into())),
  };
  for refine in &refines {
    apply_refine(ctx, &copied, refine)?;
  }

  let augments: Vec<NodeId> = match &ctx.node(uses_id).kind {
    SchemaNodeKind::Uses { augments, .. } => augments.clone(),
    _ => unreachable!(),
  };
  for augment_id in augments {
    crate::resolver::augment::apply_to_subtree(ctx, augment_id, &copied)?;
  }

  if let SchemaNodeKind::Uses { grouping, .. } = &mut ctx.node_mut(uses_id).kind {
    *grouping = Some(grouping_id);
  }

  Ok(true)
}

/// Walks ancestors of `uses_id` outward to the module top level looking
/// for a directly-owned `Grouping` child named `name` in `module` —
/// groupings are found by lexical scope, not schema-nodeid walking.
fn find_grouping(ctx: &Context, uses_id: NodeId, module: ModuleId, name: &str) -> Option<NodeId> {
  let mut scope = ctx.node(uses_id).parent;
  loop {
    let candidates: Vec<NodeId> = match scope {
      Some(parent) => ctx.node(parent).children.clone(),
      None => ctx.module(ctx.node(uses_id).module).data.clone(),
    };

    let hit = candidates.into_iter().find(|&id| {
      let node = ctx.node(id);
      matches!(node.kind, SchemaNodeKind::Grouping) && node.module == module && node.name.as_ref() == name
    });
    if hit.is_some() {
      return hit;
    }

    match scope {
      Some(parent) => scope = ctx.node(parent).parent,
      None => return None,
    }
  }
}

fn apply_refine(ctx: &mut Context, roots: &[NodeId], refine: &Refine) -> Result<(), Diag> {
  let Some(target) = find_by_simple_path(ctx, roots, &refine.target_name) else {
    return Err(Diag::validation(
      ValidationCode::NoResolv,
      format!("refine target \"{}\" not found in the expanded grouping", refine.target_name),
    ));
  };

  if let Some(config) = refine.config {
    ctx.node_mut(target).flags.config = config;
    ctx.node_mut(target).flags.config_set = true;
  }
  if let Some(mandatory) = refine.mandatory {
    ctx.node_mut(target).flags.mandatory = mandatory;
  }

  match &mut ctx.node_mut(target).kind {
    SchemaNodeKind::Container { presence } => {
      if let Some(p) = &refine.presence {
        *presence = Some(p.clone());
      }
    }
    SchemaNodeKind::Leaf { default, .. } => {
      if let Some(d) = &refine.default {
        *default = Some(d.clone());
      }
    }
    SchemaNodeKind::List { min_elements, max_elements, .. } | SchemaNodeKind::LeafList { min_elements, max_elements, .. } => {
      if let Some(min) = refine.min_elements {
        *min_elements = min;
      }
      if let Some(max) = refine.max_elements {
        *max_elements = Some(max);
      }
    }
    _ => {}
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::schema::{Module, NodeFlags, Type, TypeKind};
  use crate::unres_schema::UnresKind;

  #[test]
  fn expands_grouping_children_as_siblings_and_drops_the_uses_node() {
    let mut ctx = Context::new(None).unwrap();
    let m = ctx.new_module(Module::new("t".into(), "urn:t", "t".into()));

    let grouping = ctx.alloc_node(m, None, "g".into(), SchemaNodeKind::Grouping, NodeFlags::default());
    let leaf_in_grouping = ctx.alloc_node(
      m,
      Some(grouping),
      "x".into(),
      SchemaNodeKind::Leaf {
        ty: Type::builtin(TypeKind::String { length: None, patterns: Vec::new() }),
        default: None,
      },
      NodeFlags::default(),
    );

    let uses = ctx.alloc_node(
      m,
      None,
      "u".into(),
      SchemaNodeKind::Uses {
        grouping_name: "g".to_string(),
        grouping: None,
        refines: Vec::new(),
        augments: Vec::new(),
      },
      NodeFlags::default(),
    );

    let item = UnresSchemaItem {
      kind: UnresKind::Uses,
      owner_module: m,
      subject: Subject::Node(uses),
      argument: "g".to_string(),
    };

    assert!(try_resolve(&mut ctx, &item).unwrap());

    assert!(!ctx.module(m).data.contains(&uses));
    assert_eq!(ctx.module(m).data.len(), 2);
    let copied_leaf = ctx
      .module(m)
      .data
      .iter()
      .copied()
      .find(|&id| id != grouping)
      .expect("expanded leaf present");
    assert_eq!(ctx.node(copied_leaf).name.as_ref(), "x");
    assert_ne!(copied_leaf, leaf_in_grouping);

    assert_eq!(ctx.node(grouping).children, vec![leaf_in_grouping]);
  }
}
