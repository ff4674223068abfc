//! Lazy path construction for [`yangl_support::Diag::with_path`] (spec
//! §4.7/§7): walking a schema or data node's ancestors to build
//! `/mod:name` segments, appending `[key='value']` predicates for list
//! instances. Kept separate from `yangl_support::diag` since building a
//! path needs [`crate::schema::Context`]/[`crate::data::DataTree`]
//! awareness the support crate doesn't have.

use crate::data::{DataNodeId, DataTree};
use crate::schema::{Context, NodeId, SchemaNodeKind};

/// Builds `/mod:a/mod:b[key='value']` for `node`, crossing module
/// boundaries whenever an ancestor's owning module differs from its
/// parent's (mirroring the prefix-vs-no-prefix rule real YANG paths use).
#[must_use]
pub fn schema_path(ctx: &Context, node: NodeId) -> String {
  let mut segments = Vec::new();
  let mut cur = Some(node);
  let mut last_module = None;

  while let Some(id) = cur {
    let n = ctx.node(id);
    let module_name = ctx.module(n.module).name.clone();
    let prefixed = match &last_module {
      Some(m) if *m == module_name => n.name.to_string(),
      _ => format!("{module_name}:{}", n.name),
    };
    segments.push(prefixed);
    last_module = Some(module_name);
    cur = n.parent;
  }

  segments.reverse();
  format!("/{}", segments.join("/"))
}

/// As [`schema_path`], but walking a data-tree instance: list/leaf-list
/// entries get a `[key='value']`/`[.='value']` predicate appended.
#[must_use]
pub fn data_path(tree: &DataTree, schema: &Context, node: DataNodeId) -> String {
  let mut segments = Vec::new();
  let mut cur = Some(node);
  let mut last_module = None;

  while let Some(id) = cur {
    let data = tree.node(id);
    let schema_node = schema.node(data.schema);
    let module_name = schema.module(schema_node.module).name.clone();
    let mut segment = match &last_module {
      Some(m) if *m == module_name => data.name.to_string(),
      _ => format!("{module_name}:{}", data.name),
    };

    match &schema_node.kind {
      SchemaNodeKind::List { keys, .. } => {
        for key_id in keys {
          let key_name = schema.node(*key_id).name.clone();
          let Some(key_value) = data.children.iter().find_map(|&c| {
            let child = tree.node(c);
            (child.schema == *key_id).then(|| child.value_str.clone()).flatten()
          }) else {
            continue;
          };
          segment.push_str(&format!("[{key_name}='{key_value}']"));
        }
      }
      SchemaNodeKind::LeafList { .. } => {
        if let Some(value) = &data.value_str {
          segment.push_str(&format!("[.='{value}']"));
        }
      }
      _ => {}
    }

    segments.push(segment);
    last_module = Some(module_name);
    cur = data.parent;
  }

  segments.reverse();
  format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
  use yangl_support::Atom;

  use super::*;
  use crate::schema::{Module, NodeFlags, Type, TypeKind};

  #[test]
  fn schema_path_joins_ancestors_with_module_prefixes() {
    let mut ctx = Context::new(None).expect("no search dir, no filesystem access");
    let module = ctx.new_module(Module::new(Atom::from("m"), "urn:m", Atom::from("m")));
    let container = ctx.alloc_node(module, None, Atom::from("top"), SchemaNodeKind::Container { presence: None }, NodeFlags::default());
    let leaf = ctx.alloc_node(
      module,
      Some(container),
      Atom::from("name"),
      SchemaNodeKind::Leaf {
        ty: Type::builtin(TypeKind::String {
          length: None,
          patterns: Vec::new(),
        }),
        default: None,
      },
      NodeFlags::default(),
    );

    assert_eq!(schema_path(&ctx, leaf), "/m:top/m:name");
  }
}
