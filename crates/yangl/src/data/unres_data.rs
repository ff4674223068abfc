//! Data-tree reference resolution (spec §4.6): `when`/`must` evaluation,
//! leafref/instance-identifier target checks, and the empty-non-presence-
//! container cleanup that follows from them.
//!
//! `when` runs first and to a fixpoint of its own: a node's `when` can only
//! be evaluated once every `when`-bearing ancestor has settled, and a false
//! verdict propagates down without evaluating descendants at all. Leafref,
//! instance-identifier, and `must` checks run in one pass afterward, since
//! none of them feed back into `when`.

use std::collections::HashSet;

use yangl_support::{Diag, EvalContext, ValidationCode, XPathEvaluator};

use super::{DataNode, DataNodeId, DataTree, WhenStatus};
use crate::schema::{Context, SchemaNodeKind, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresDataKind {
  Leafref,
  Instid,
  When,
  Must,
  /// A non-presence container the parser built with no children; removed
  /// from the tree unless it gained children via a later `uses`/augment-
  /// style expansion that this arena doesn't model, so resolution always
  /// finds it still empty.
  EmptyContainer,
}

#[derive(Debug, Clone, Copy)]
pub struct UnresDataItem {
  pub kind: UnresDataKind,
  pub node: DataNodeId,
}

/// Drives every pending item in `tree.unres` to resolution against `schema`,
/// in the `when`-then-everything-else order described above.
///
/// # Errors
/// Returns [`Diag::Validation`] (`NoWhen`) if the `when` phase cannot make
/// progress (a cycle through `current()/../...` ancestor references), or any
/// error surfaced by leafref/instance-identifier/`must` checking.
pub fn resolve_all(
  tree: &mut DataTree,
  schema: &Context,
  evaluator: &dyn XPathEvaluator,
  keep_empty_containers: bool,
) -> Result<(), Diag> {
  let items = std::mem::take(&mut tree.unres);

  let when_nodes: Vec<DataNodeId> = items
    .iter()
    .filter(|i| i.kind == UnresDataKind::When)
    .map(|i| i.node)
    .collect();
  let deleted = run_when_phase(tree, schema, evaluator, &when_nodes, keep_empty_containers)?;

  for item in &items {
    if deleted.contains(&item.node) {
      continue;
    }
    match item.kind {
      UnresDataKind::When => {}
      UnresDataKind::Leafref => resolve_leafref(tree, schema, item.node)?,
      UnresDataKind::Instid => resolve_instid(tree, schema, item.node)?,
      UnresDataKind::Must => resolve_must(tree, schema, evaluator, item.node)?,
      UnresDataKind::EmptyContainer => resolve_empty_container(tree, schema, item.node, keep_empty_containers),
    }
  }

  Ok(())
}

/// `Some(false)` if a `when`-bearing ancestor has already settled false
/// (inherited, no evaluation needed for `node` itself), `Some(true)` if
/// every such ancestor is true or absent, `None` if one hasn't settled yet.
fn ancestors_ready(tree: &DataTree, schema: &Context, node: DataNodeId) -> Option<bool> {
  let mut cur = tree.node(node).parent;
  while let Some(id) = cur {
    if schema.node(tree.node(id).schema).when.is_some() {
      match tree.node(id).when_status {
        WhenStatus::Unevaluated => return None,
        WhenStatus::False => return Some(false),
        WhenStatus::True => {}
      }
    }
    cur = tree.node(id).parent;
  }
  Some(true)
}

fn run_when_phase(
  tree: &mut DataTree,
  schema: &Context,
  evaluator: &dyn XPathEvaluator,
  when_nodes: &[DataNodeId],
  keep_empty_containers: bool,
) -> Result<HashSet<DataNodeId>, Diag> {
  let mut remaining = when_nodes.to_vec();

  loop {
    let mut progressed = false;
    let mut next_remaining = Vec::new();

    for node in remaining {
      match ancestors_ready(tree, schema, node) {
        None => next_remaining.push(node),
        Some(false) => {
          tree.node_mut(node).when_status = WhenStatus::False;
          progressed = true;
        }
        Some(true) => {
          let expr = schema.node(tree.node(node).schema).when.clone().expect("When item without a when clause");
          let value = evaluator.eval(&expr, EvalContext { node: tree.node(node) })?;
          tree.node_mut(node).when_status = if value.as_boolean() { WhenStatus::True } else { WhenStatus::False };
          progressed = true;
        }
      }
    }

    if next_remaining.is_empty() {
      break;
    }
    if !progressed {
      return Err(Diag::validation(ValidationCode::NoWhen, "when evaluation made no progress"));
    }
    remaining = next_remaining;
  }

  let false_nodes: Vec<DataNodeId> = when_nodes
    .iter()
    .copied()
    .filter(|&id| tree.node(id).when_status == WhenStatus::False)
    .collect();

  let mut deleted = HashSet::new();
  let mut frontier = Vec::new();
  for id in false_nodes {
    if deleted.insert(id) {
      collect_subtree(tree, id, &mut deleted);
      frontier.push(tree.parent_of(id));
      tree.unlink(id);
    }
  }

  if !keep_empty_containers {
    cleanup_empty_ancestors(tree, schema, frontier);
  }

  Ok(deleted)
}

/// Every descendant of `root` (not including `root` itself), so a
/// deleted `when`-false node's whole subtree is marked resolved-by-
/// inheritance rather than only the node the `when` clause sat on.
fn collect_subtree(tree: &DataTree, root: DataNodeId, out: &mut HashSet<DataNodeId>) {
  let mut stack = vec![root];
  while let Some(id) = stack.pop() {
    for &child in &tree.node(id).children {
      if out.insert(child) {
        stack.push(child);
      }
    }
  }
}

/// After removing `when`-false subtrees, a non-presence container left
/// childless has no further reason to exist; walks upward pruning them.
fn cleanup_empty_ancestors(tree: &mut DataTree, schema: &Context, mut frontier: Vec<Option<DataNodeId>>) {
  while let Some(maybe_id) = frontier.pop() {
    let Some(id) = maybe_id else { continue };
    if !tree.node(id).children.is_empty() {
      continue;
    }
    let schema_id = tree.node(id).schema;
    if !matches!(&schema.node(schema_id).kind, SchemaNodeKind::Container { presence: None }) {
      continue;
    }
    frontier.push(tree.parent_of(id));
    tree.unlink(id);
  }
}

fn resolve_empty_container(tree: &mut DataTree, schema: &Context, node: DataNodeId, keep_empty_containers: bool) {
  if keep_empty_containers || !tree.node(node).children.is_empty() {
    return;
  }
  let schema_id = tree.node(node).schema;
  if matches!(&schema.node(schema_id).kind, SchemaNodeKind::Container { presence: None }) {
    let parent = tree.parent_of(node);
    tree.unlink(node);
    cleanup_empty_ancestors(tree, schema, vec![parent]);
  }
}

fn resolve_leafref(tree: &DataTree, schema: &Context, node: DataNodeId) -> Result<(), Diag> {
  let data = tree.node(node);
  let ty = leaf_type(schema, data.schema).ok_or_else(|| Diag::Internal("leafref item on a non-leaf node".into()))?;
  let TypeKind::Leafref {
    target,
    require_instance,
    ..
  } = &ty.kind
  else {
    return Err(Diag::Internal("Leafref item on a non-leafref type".into()));
  };
  let target_id = target.ok_or_else(|| Diag::Internal("leafref checked before its schema target resolved".into()))?;

  let value = &data.value_str;
  let found = tree.nodes.iter().any(|n| n.schema == target_id && &n.value_str == value);
  if !found && *require_instance {
    return Err(Diag::validation(
      ValidationCode::NoLeafref,
      format!("leafref value {value:?} has no matching target instance"),
    ));
  }
  Ok(())
}

fn resolve_instid(tree: &DataTree, schema: &Context, node: DataNodeId) -> Result<(), Diag> {
  let data = tree.node(node);
  let ty = leaf_type(schema, data.schema).ok_or_else(|| Diag::Internal("instance-identifier item on a non-leaf node".into()))?;
  let TypeKind::InstanceIdentifier { require_instance } = &ty.kind else {
    return Err(Diag::Internal("Instid item on a non-instance-identifier type".into()));
  };
  let Some(path) = &data.value_str else {
    return Err(Diag::Internal("instance-identifier leaf has no value".into()));
  };

  crate::pathlex::parse_instance_identifier(path.as_bytes())
    .map_err(|e| Diag::validation(ValidationCode::InChar, format!("malformed instance-identifier at byte {}", e.0)))?;

  let mut candidates = tree.roots().to_vec();
  let names: Vec<&str> = instance_identifier_names(path);
  for (idx, name) in names.iter().enumerate() {
    candidates.retain(|&id| tree.node(id).name.as_ref() == *name);
    if idx + 1 < names.len() {
      candidates = candidates.iter().flat_map(|&id| tree.node(id).children.clone()).collect();
    }
  }

  match candidates.len() {
    1 => Ok(()),
    0 if !require_instance => Ok(()),
    0 => Err(Diag::validation(
      ValidationCode::NoResolv,
      format!("instance-identifier {path:?} resolved to no instance"),
    )),
    _ => Err(Diag::validation(
      ValidationCode::TooMany,
      format!("instance-identifier {path:?} resolved to more than one instance"),
    )),
  }
}

/// Plain `/`-segment split dropping any `[...]` predicate and module-name
/// prefix; a lighter-weight walk than re-deriving byte offsets out of
/// [`crate::pathlex::parse_instance_identifier`]'s segment spans, which are
/// relative to each segment's own sub-slice rather than the full string.
fn instance_identifier_names(path: &str) -> Vec<&str> {
  path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(|seg| {
      let seg = seg.split('[').next().unwrap_or(seg);
      seg.rsplit(':').next().unwrap_or(seg)
    })
    .collect()
}

fn resolve_must(tree: &DataTree, schema: &Context, evaluator: &dyn XPathEvaluator, node: DataNodeId) -> Result<(), Diag> {
  let data = tree.node(node);
  for clause in &schema.node(data.schema).must {
    let value = evaluator.eval(&clause.expr, EvalContext { node: data })?;
    if !value.as_boolean() {
      let message = clause.error_message.clone().unwrap_or_else(|| format!("must \"{}\" not satisfied", clause.expr));
      let mut diag = Diag::validation(ValidationCode::NoMust, message.clone());
      if let Some(tag) = &clause.error_app_tag {
        diag = diag.with_app_tag(tag.clone(), message);
      }
      return Err(diag);
    }
  }
  Ok(())
}

fn leaf_type(schema: &Context, node: crate::schema::NodeId) -> Option<&crate::schema::Type> {
  match &schema.node(node).kind {
    SchemaNodeKind::Leaf { ty, .. } => Some(ty),
    SchemaNodeKind::LeafList { ty, .. } => Some(ty),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use yangl_support::{Atom, XPathValue};

  use super::*;
  use crate::schema::{NodeFlags, NodeId, SchemaNodeKind};

  struct AlwaysTrue;
  impl XPathEvaluator for AlwaysTrue {
    fn eval(&self, _expr: &str, _ctx: EvalContext<'_>) -> Result<XPathValue, Diag> {
      Ok(XPathValue::Boolean(true))
    }
  }

  struct AlwaysFalse;
  impl XPathEvaluator for AlwaysFalse {
    fn eval(&self, _expr: &str, _ctx: EvalContext<'_>) -> Result<XPathValue, Diag> {
      Ok(XPathValue::Boolean(false))
    }
  }

  fn fresh_ctx_with_leaf(when: Option<&str>) -> (Context, NodeId) {
    let mut ctx = Context::new(None).expect("context without a search dir never touches the filesystem");
    let module = ctx.new_module(crate::schema::Module::new(Atom::from("m"), "urn:m".into(), "m".into()));
    let leaf_id = ctx.alloc_node(
      module,
      None,
      Atom::from("leaf"),
      SchemaNodeKind::Leaf {
        ty: crate::schema::Type::builtin(crate::schema::TypeKind::String {
          length: None,
          patterns: Vec::new(),
        }),
        default: None,
      },
      NodeFlags::default(),
    );
    ctx.node_mut(leaf_id).when = when.map(str::to_string);
    (ctx, leaf_id)
  }

  #[test]
  fn false_when_removes_the_node_without_evaluating_children() {
    let (schema, leaf_id) = fresh_ctx_with_leaf(Some("false()"));
    let mut tree = DataTree::default();
    let id = tree.alloc(None, DataNode::new(leaf_id, Atom::from("leaf")));
    tree.register_unres(UnresDataItem {
      kind: UnresDataKind::When,
      node: id,
    });

    resolve_all(&mut tree, &schema, &AlwaysFalse, false).expect("when phase settles");
    assert!(tree.roots().is_empty());
  }

  #[test]
  fn true_when_keeps_the_node() {
    let (schema, leaf_id) = fresh_ctx_with_leaf(Some("true()"));
    let mut tree = DataTree::default();
    let id = tree.alloc(None, DataNode::new(leaf_id, Atom::from("leaf")));
    tree.register_unres(UnresDataItem {
      kind: UnresDataKind::When,
      node: id,
    });

    resolve_all(&mut tree, &schema, &AlwaysTrue, false).expect("when phase settles");
    assert_eq!(tree.roots(), &[id]);
  }

  #[test]
  fn missing_leafref_target_is_rejected_when_required() {
    let mut ctx = Context::new(None).expect("context without a search dir never touches the filesystem");
    let module = ctx.new_module(crate::schema::Module::new(Atom::from("m"), "urn:m".into(), "m".into()));
    let target_id = ctx.alloc_node(
      module,
      None,
      Atom::from("target"),
      SchemaNodeKind::Leaf {
        ty: crate::schema::Type::builtin(crate::schema::TypeKind::String {
          length: None,
          patterns: Vec::new(),
        }),
        default: None,
      },
      NodeFlags::default(),
    );
    let ref_id = ctx.alloc_node(
      module,
      None,
      Atom::from("ref"),
      SchemaNodeKind::Leaf {
        ty: crate::schema::Type::builtin(crate::schema::TypeKind::Leafref {
          path: "../target".into(),
          target: Some(target_id),
          require_instance: true,
        }),
        default: None,
      },
      NodeFlags::default(),
    );

    let mut tree = DataTree::default();
    let mut data = DataNode::new(ref_id, Atom::from("ref"));
    data.value_str = Some("missing".into());
    let id = tree.alloc(None, data);
    tree.register_unres(UnresDataItem {
      kind: UnresDataKind::Leafref,
      node: id,
    });

    let err = resolve_all(&mut tree, &ctx, &AlwaysTrue, false).unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::NoLeafref));
  }
}
