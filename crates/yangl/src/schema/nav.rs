//! Logical sibling iteration over the schema tree (spec §4.2). Choice
//! shorthand and `uses`/`input`/`output`/`grouping` are structural: by
//! default their children are reported as if they were direct children
//! of the structural node's parent, unless the corresponding
//! [`NavFlags`] bit asks for the structural node itself.

use super::context::{Context, ModuleId, NodeId};
use super::node::{NodeTypeMask, SchemaNodeKind};

bitflags::bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct NavFlags: u8 {
    const WITH_CHOICE = 1 << 0;
    const WITH_CASE = 1 << 1;
    const WITH_INPUT_OUTPUT = 1 << 2;
    const WITH_GROUPING = 1 << 3;
  }
}

/// Where a sibling walk starts: a node's children, or a module's
/// top-level data.
#[derive(Debug, Clone, Copy)]
pub enum Scope {
  Module(ModuleId),
  Node(NodeId),
}

fn raw_children(ctx: &Context, scope: Scope) -> Vec<NodeId> {
  match scope {
    Scope::Module(m) => ctx.module(m).data.clone(),
    Scope::Node(n) => ctx.node(n).children.clone(),
  }
}

fn is_transparent(kind: &SchemaNodeKind, flags: NavFlags) -> bool {
  match kind {
    SchemaNodeKind::Choice { .. } => !flags.contains(NavFlags::WITH_CHOICE),
    SchemaNodeKind::Case => !flags.contains(NavFlags::WITH_CASE),
    SchemaNodeKind::Input | SchemaNodeKind::Output => !flags.contains(NavFlags::WITH_INPUT_OUTPUT),
    SchemaNodeKind::Uses { .. } | SchemaNodeKind::Grouping => !flags.contains(NavFlags::WITH_GROUPING),
    _ => false,
  }
}

/// Flattens `scope`'s direct children, descending transparently into
/// structural nodes `flags` doesn't ask to see, and returns each logical
/// sibling exactly once, in document order.
#[must_use]
pub fn next_sibling(ctx: &Context, scope: Scope, flags: NavFlags) -> Vec<NodeId> {
  let mut out = Vec::new();
  let mut stack: Vec<NodeId> = raw_children(ctx, scope).into_iter().rev().collect();

  while let Some(id) = stack.pop() {
    let node = ctx.node(id);
    if is_transparent(&node.kind, flags) {
      let mut grandchildren: Vec<NodeId> = node.children.clone();
      grandchildren.reverse();
      stack.extend(grandchildren);
    } else {
      out.push(id);
    }
  }

  out
}

/// Linear scan of `scope`'s logical siblings for one matching `(module,
/// name, mask)`. A name match under the wrong nodetype mask does not
/// stop the search — YANG's uniqueness rules make that ambiguity
/// impossible in a well-formed schema, so we keep scanning rather than
/// erroring. `flags` is forwarded to [`next_sibling`] unchanged, so
/// generic data-node descent (get_node, leafref paths, augment targets)
/// should pass [`NavFlags::empty`] to keep choice/case transparent,
/// while a choice-default lookup passes `WITH_CASE` to see case nodes
/// by name.
#[must_use]
pub fn find_sibling(ctx: &Context, scope: Scope, module: ModuleId, name: &str, mask: NodeTypeMask, flags: NavFlags) -> Option<NodeId> {
  next_sibling(ctx, scope, flags).into_iter().find(|&id| {
    let node = ctx.node(id);
    node.module == module && node.name.as_ref() == name && mask.contains(node.kind.type_mask_bit())
  })
}
