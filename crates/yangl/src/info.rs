//! `Context::info()` (spec §6): builds a [`DataTree`] conforming to
//! `ietf-yang-library`'s `modules-state` container, one `module` list
//! entry per loaded module.

use yangl_support::Atom;

use crate::data::{DataNode, DataTree};
use crate::schema::Context;

/// # Errors
/// Returns [`yangl_support::Diag::Internal`] if the built-in
/// `ietf-yang-library` module (always installed by [`Context::new`]) is
/// somehow missing its `modules-state`/`module` schema nodes.
pub fn build_info_tree(ctx: &Context) -> Result<DataTree, yangl_support::Diag> {
  let (_, yang_library) = ctx
    .get_module("ietf-yang-library", None)
    .ok_or_else(|| yangl_support::Diag::Internal("ietf-yang-library is not loaded".into()))?;

  let modules_state_id = yang_library
    .data
    .iter()
    .copied()
    .find(|&id| ctx.node(id).name.as_ref() == "modules-state")
    .ok_or_else(|| yangl_support::Diag::Internal("ietf-yang-library has no modules-state node".into()))?;

  let module_list_id = ctx
    .node(modules_state_id)
    .children
    .iter()
    .copied()
    .find(|&id| ctx.node(id).name.as_ref() == "module")
    .ok_or_else(|| yangl_support::Diag::Internal("modules-state has no module list".into()))?;

  let module_set_id_leaf = ctx
    .node(modules_state_id)
    .children
    .iter()
    .copied()
    .find(|&id| ctx.node(id).name.as_ref() == "module-set-id")
    .ok_or_else(|| yangl_support::Diag::Internal("modules-state has no module-set-id leaf".into()))?;

  let leaf_children: Vec<(Atom, crate::schema::NodeId)> = ctx
    .node(module_list_id)
    .children
    .iter()
    .map(|&id| (ctx.node(id).name.clone(), id))
    .collect();

  let mut tree = DataTree::default();
  let modules_state = tree.alloc(None, DataNode::new(modules_state_id, Atom::from("modules-state")));

  for (_, module) in ctx.modules() {
    let entry = tree.alloc(Some(modules_state), DataNode::new(module_list_id, Atom::from("module")));

    for (leaf_name, leaf_schema) in &leaf_children {
      let value = match leaf_name.as_ref() {
        "name" => Some(module.name.to_string()),
        "revision" => Some(module.revision().to_string()),
        "namespace" => Some(module.namespace.clone()),
        "conformance-type" => Some(if module.implemented { "implement".to_string() } else { "import".to_string() }),
        "schema" => None,
        _ => None,
      };
      let mut leaf = DataNode::new(*leaf_schema, leaf_name.clone());
      leaf.value_str = value;
      tree.alloc(Some(entry), leaf);
    }
  }

  let mut module_set_id_leaf_node = DataNode::new(module_set_id_leaf, Atom::from("module-set-id"));
  module_set_id_leaf_node.value_str = Some(ctx.module_set_id().to_string());
  tree.alloc(Some(modules_state), module_set_id_leaf_node);

  Ok(tree)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_tree_lists_every_loaded_module() {
    let ctx = Context::new(None).expect("no search dir, no filesystem access");
    let tree = build_info_tree(&ctx).expect("built-ins always expose modules-state");

    let modules_state = tree.node(tree.roots()[0]);
    let module_entries: Vec<_> = modules_state
      .children
      .iter()
      .filter(|&&id| tree.node(id).name.as_ref() == "module")
      .collect();

    assert_eq!(module_entries.len(), 4);
  }
}
