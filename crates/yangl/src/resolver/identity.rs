//! Base-identity resolution (spec §4.3.2) and `identityref` type
//! resolution. Base links are resolved as one batch per worklist pass
//! rather than item-by-item, so a cycle is caught by
//! [`petgraph::algo::kosaraju_scc`] over the *tentative* edge set before
//! any identity's `base`/`der` is mutated — property 3 requires that a
//! failed cycle leaves neither identity's `der` touched.

use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::DiGraphMap;
use yangl_support::{Diag, Status, ValidationCode};

use crate::schema::{Context, IdentityId, Subject, TypeKind};
use crate::unres_schema::UnresSchemaItem;

use super::{find_identity_in, resolve_prefixed, type_mut};

/// Attempts to resolve every `Ident` item in `items` against the
/// identities visible from each one's owner module, then checks the
/// combined candidate edge set for cycles before committing any of
/// them. Returns, in `items` order, whether each item's base identity
/// was found (a `false` entry is a retryable miss, not a failure).
///
/// # Errors
/// Returns [`Diag::Validation`] (`NoResolv`) carrying `"Circular
/// reference of \"<name>\" identity."` if any candidate base chain
/// forms a cycle.
pub fn resolve_all_bases(ctx: &mut Context, items: &[UnresSchemaItem]) -> Result<Vec<bool>, Diag> {
  let mut found = vec![false; items.len()];
  let mut pairs = Vec::new();

  for (idx, item) in items.iter().enumerate() {
    let Subject::Identity(id) = item.subject else {
      return Err(Diag::Internal("Ident item must target an identity".into()));
    };
    let Some((base_module, base_name)) = resolve_prefixed(ctx, item.owner_module, &item.argument) else {
      continue;
    };
    let Some(base_id) = find_identity_in(ctx, base_module, base_name) else {
      continue;
    };
    if !Status::may_reference(ctx.identity(id).status, ctx.identity(base_id).status) {
      let name = ctx.identity(id).name.clone();
      let base = ctx.identity(base_id).name.clone();
      return Err(Diag::validation(
        ValidationCode::NoResolv,
        format!("identity \"{name}\" may not have \"{base}\" as its base: status is less stable"),
      ));
    }
    found[idx] = true;
    pairs.push((id, base_id));
  }

  let mut graph: DiGraphMap<IdentityId, ()> = DiGraphMap::new();
  for &(id, base_id) in &pairs {
    graph.add_edge(id, base_id, ());
  }

  for scc in kosaraju_scc(&graph) {
    let cyclic = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
    if cyclic {
      let name = ctx.identity(scc[0]).name.clone();
      return Err(Diag::validation(
        ValidationCode::NoResolv,
        format!("Circular reference of \"{name}\" identity."),
      ));
    }
  }

  for (id, base_id) in pairs {
    ctx.identity_mut(id).base = Some(base_id);
    ctx.identity_mut(base_id).der.push(id);
  }

  Ok(found)
}

/// # Errors
/// Returns [`Diag::Internal`] if `item`'s subject is not a typed
/// leaf/leaf-list/typedef whose type is an `identityref`.
pub fn try_resolve_identityref(ctx: &mut Context, item: &UnresSchemaItem) -> Result<bool, Diag> {
  let Some((base_module, base_name)) = resolve_prefixed(ctx, item.owner_module, &item.argument) else {
    return Ok(false);
  };
  let Some(base_id) = find_identity_in(ctx, base_module, base_name) else {
    return Ok(false);
  };

  let Some(ty) = type_mut(ctx, item.subject) else {
    return Err(Diag::Internal("TypeIdentref item must target a typed node or typedef".into()));
  };
  let TypeKind::Identityref { base, .. } = &mut ty.kind else {
    return Err(Diag::Internal("TypeIdentref item's type is not an identityref".into()));
  };
  *base = Some(base_id);
  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::schema::{Identity, ModuleId, Module};
  use crate::unres_schema::UnresKind;

  fn ctx_with_module() -> (Context, ModuleId) {
    let mut ctx = Context::new(None).unwrap();
    let m = ctx.new_module(Module::new("t".into(), "urn:t", "t".into()));
    (ctx, m)
  }

  #[test]
  fn detects_two_identity_cycle_without_mutating_der() {
    let (mut ctx, m) = ctx_with_module();
    let a = ctx.alloc_identity(m, Identity::new("a".into(), m, Some("b".to_string())));
    let b = ctx.alloc_identity(m, Identity::new("b".into(), m, Some("a".to_string())));

    let items = vec![
      UnresSchemaItem {
        kind: UnresKind::Ident,
        owner_module: m,
        subject: Subject::Identity(a),
        argument: "b".to_string(),
      },
      UnresSchemaItem {
        kind: UnresKind::Ident,
        owner_module: m,
        subject: Subject::Identity(b),
        argument: "a".to_string(),
      },
    ];

    let err = resolve_all_bases(&mut ctx, &items).unwrap_err();
    assert!(matches!(err, Diag::Validation { .. }));
    assert!(ctx.identity(a).base.is_none());
    assert!(ctx.identity(b).base.is_none());
    assert!(ctx.identity(a).der.is_empty());
    assert!(ctx.identity(b).der.is_empty());
  }

  #[test]
  fn resolves_acyclic_base_chain() {
    let (mut ctx, m) = ctx_with_module();
    let a = ctx.alloc_identity(m, Identity::new("a".into(), m, None));
    let b = ctx.alloc_identity(m, Identity::new("b".into(), m, Some("a".to_string())));

    let items = vec![UnresSchemaItem {
      kind: UnresKind::Ident,
      owner_module: m,
      subject: Subject::Identity(b),
      argument: "a".to_string(),
    }];

    let found = resolve_all_bases(&mut ctx, &items).unwrap();
    assert_eq!(found, vec![true]);
    assert_eq!(ctx.identity(b).base, Some(a));
    assert_eq!(ctx.identity(a).der, vec![b]);
  }
}
