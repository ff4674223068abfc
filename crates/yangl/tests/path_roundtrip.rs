//! Property 2 (spec §8): for any fully-resolved schema node `n`,
//! `resolve_json_schema_nodeid(build_path(n), ctx) = n`. `build_path`
//! corresponds to [`yangl::diag::schema_path`] and
//! `resolve_json_schema_nodeid` to [`yangl::schema::Context::get_node`].

use yangl::diag::schema_path;
use yangl::schema::{Context, Module, NodeFlags, NodeId, SchemaNodeKind, Type, TypeKind};
use yangl_support::Atom;

fn string_leaf(ctx: &mut Context, module: yangl::schema::ModuleId, parent: Option<NodeId>, name: &str) -> NodeId {
  ctx.alloc_node(
    module,
    parent,
    Atom::from(name),
    SchemaNodeKind::Leaf {
      ty: Type::builtin(TypeKind::String { length: None, patterns: Vec::new() }),
      default: None,
    },
    NodeFlags::default(),
  )
}

#[test]
fn round_trips_a_nested_leaf_path() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));

  let container = ctx.alloc_node(m, None, Atom::from("top"), SchemaNodeKind::Container { presence: None }, NodeFlags::default());
  let leaf = string_leaf(&mut ctx, m, Some(container), "name");

  let path = schema_path(&ctx, leaf);
  assert_eq!(path, "/t:top/t:name");

  let found = ctx.get_node(None, &path).unwrap();
  assert_eq!(found, Some(leaf));
}

#[test]
fn round_trips_a_top_level_leaf() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));
  let leaf = string_leaf(&mut ctx, m, None, "solo");

  let path = schema_path(&ctx, leaf);
  let found = ctx.get_node(None, &path).unwrap();
  assert_eq!(found, Some(leaf));
}

#[test]
fn round_trips_relative_to_a_starting_node() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));

  let container = ctx.alloc_node(m, None, Atom::from("top"), SchemaNodeKind::Container { presence: None }, NodeFlags::default());
  let leaf = string_leaf(&mut ctx, m, Some(container), "name");

  // Starting from the container itself, the unprefixed segment "name"
  // must still resolve to the same leaf.
  let found = ctx.get_node(Some(container), "t:name").unwrap();
  assert_eq!(found, Some(leaf));
}

#[test]
fn unknown_segment_resolves_to_none_rather_than_erroring() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));
  let _leaf = string_leaf(&mut ctx, m, None, "solo");

  assert_eq!(ctx.get_node(None, "/t:missing").unwrap(), None);
}
