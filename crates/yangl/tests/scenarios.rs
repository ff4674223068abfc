//! End-to-end scenarios S1-S6 (spec §8), each built directly on the arena
//! API a front-end parser would otherwise drive.

use yangl::data::{DataNode, DataTree, UnresDataItem, UnresDataKind};
use yangl::schema::{Context, Identity, Module, MustClause, NodeFlags, SchemaNodeKind, Subject, Type, TypeKind};
use yangl::unres_schema::{UnresKind, UnresSchemaItem};
use yangl_support::{Atom, Diag, EvalContext, XPathEvaluator, XPathValue};

/// S1: built-ins visible.
#[test]
fn s1_builtins_visible() {
  let ctx = Context::new(None).unwrap();

  let (_, module) = ctx.get_module("ietf-yang-library", None).expect("built-in module is preloaded");
  assert!(module.implemented);

  let tree = ctx.info().unwrap();
  let modules_state = tree.node(tree.roots()[0]);
  let entry = modules_state
    .children
    .iter()
    .map(|&id| tree.node(id))
    .find(|entry| {
      entry
        .children
        .iter()
        .any(|&c| tree.node(c).name.as_ref() == "name" && tree.node(c).value_str.as_deref() == Some("ietf-yang-library"))
    })
    .expect("modules-state lists ietf-yang-library");

  let conformance = entry
    .children
    .iter()
    .map(|&c| tree.node(c))
    .find(|n| n.name.as_ref() == "conformance-type")
    .expect("module entry carries a conformance-type leaf");
  assert_eq!(conformance.value_str.as_deref(), Some("implement"));
}

/// S2: typedef derivation composes range restrictions down a typedef
/// chain, and a restriction outside the parent's bounds is rejected.
#[test]
fn s2_typedef_derivation_intersects_ranges() {
  use yangl::range::parse_range;

  let t1_range = parse_range("1..100", i128::from(i16::MIN), i128::from(i16::MAX), None).unwrap();
  let t2_range = parse_range("10..50 | 80..90", 1, 100, Some(&t1_range)).unwrap();

  assert_eq!(t2_range.intervals.len(), 2);
  assert!(t2_range.contains_value(15));
  assert!(t2_range.contains_value(85));
  assert!(!t2_range.contains_value(60));

  let err = parse_range("10..200", 1, 100, Some(&t1_range));
  assert!(matches!(err, Err(Diag::Validation { .. })));
}

/// S3: forward reference — a leafref declared before its target leaf
/// resolves in one worklist pass.
#[test]
fn s3_forward_leafref_reference_resolves() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));

  let a = ctx.alloc_node(
    m,
    None,
    Atom::from("a"),
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
    Atom::from("b"),
    SchemaNodeKind::Leaf {
      ty: Type::builtin(TypeKind::String { length: None, patterns: Vec::new() }),
      default: None,
    },
    NodeFlags::default(),
  );

  ctx.register_unres(UnresSchemaItem {
    kind: UnresKind::TypeLeafref,
    owner_module: m,
    subject: Subject::Node(a),
    argument: "../b".to_string(),
  });

  ctx.resolve_all().unwrap();

  let SchemaNodeKind::Leaf { ty, .. } = &ctx.node(a).kind else { unreachable!() };
  let TypeKind::Leafref { target, .. } = &ty.kind else { unreachable!() };
  assert_eq!(*target, Some(b));
}

/// S4: a two-identity base cycle fails resolution with the exact message
/// format and leaves neither identity's `der` touched.
#[test]
fn s4_identity_cycle_is_rejected() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));

  let a = ctx.alloc_identity(m, Identity::new(Atom::from("A"), m, Some("B".to_string())));
  let b = ctx.alloc_identity(m, Identity::new(Atom::from("B"), m, Some("A".to_string())));

  ctx.register_unres(UnresSchemaItem {
    kind: UnresKind::Ident,
    owner_module: m,
    subject: Subject::Identity(a),
    argument: "B".to_string(),
  });
  ctx.register_unres(UnresSchemaItem {
    kind: UnresKind::Ident,
    owner_module: m,
    subject: Subject::Identity(b),
    argument: "A".to_string(),
  });

  let err = ctx.resolve_all().unwrap_err();
  let Diag::Validation { message, .. } = &err else {
    panic!("expected a Validation diagnostic");
  };
  assert!(message.contains("Circular reference of \"A\" identity."), "got: {message}");
  assert!(ctx.identity(a).der.is_empty());
  assert!(ctx.identity(b).der.is_empty());
}

struct EnableGate(bool);
impl XPathEvaluator for EnableGate {
  fn eval(&self, expr: &str, _ctx: EvalContext<'_>) -> Result<XPathValue, Diag> {
    Ok(XPathValue::Boolean(if expr.contains("enable") { self.0 } else { true }))
  }
}

/// S5: a `when`-false container is removed along with its whole subtree,
/// leaving only the sibling that made the condition false.
#[test]
fn s5_when_false_deletes_subtree() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));

  let enable_schema = ctx.alloc_node(
    m,
    None,
    Atom::from("enable"),
    SchemaNodeKind::Leaf {
      ty: Type::builtin(TypeKind::Boolean),
      default: None,
    },
    NodeFlags::default(),
  );
  let c_schema = ctx.alloc_node(m, None, Atom::from("c"), SchemaNodeKind::Container { presence: None }, NodeFlags::default());
  ctx.node_mut(c_schema).when = Some("../enable = 'true'".to_string());
  let x_schema = ctx.alloc_node(
    m,
    Some(c_schema),
    Atom::from("x"),
    SchemaNodeKind::Leaf {
      ty: Type::builtin(TypeKind::String { length: None, patterns: Vec::new() }),
      default: None,
    },
    NodeFlags::default(),
  );

  let mut tree = DataTree::default();
  let mut enable_data = DataNode::new(enable_schema, Atom::from("enable"));
  enable_data.value_str = Some("false".to_string());
  let enable_id = tree.alloc(None, enable_data);

  let c_id = tree.alloc(None, DataNode::new(c_schema, Atom::from("c")));
  let mut x_data = DataNode::new(x_schema, Atom::from("x"));
  x_data.value_str = Some("1".to_string());
  tree.alloc(Some(c_id), x_data);

  tree.register_unres(UnresDataItem { kind: UnresDataKind::When, node: c_id });

  yangl::data::resolve_all(&mut tree, &ctx, &EnableGate(false), false).unwrap();

  assert_eq!(tree.roots(), &[enable_id]);
}

struct MustFails;
impl XPathEvaluator for MustFails {
  fn eval(&self, _expr: &str, _ctx: EvalContext<'_>) -> Result<XPathValue, Diag> {
    Ok(XPathValue::Boolean(false))
  }
}

/// S6: a failed `must` surfaces its `error-message`/`error-app-tag`.
#[test]
fn s6_must_failure_carries_app_tag_and_message() {
  let mut ctx = Context::new(None).unwrap();
  let m = ctx.new_module(Module::new(Atom::from("t"), "urn:t", Atom::from("t")));

  let p_schema = ctx.alloc_node(
    m,
    None,
    Atom::from("p"),
    SchemaNodeKind::Leaf {
      ty: Type::builtin(TypeKind::RangedInt {
        base: yangl::schema::IntBase::Int32,
        range: None,
      }),
      default: None,
    },
    NodeFlags::default(),
  );
  ctx.node_mut(p_schema).must.push(MustClause {
    expr: ". > 0".to_string(),
    error_message: Some("must be positive".to_string()),
    error_app_tag: Some("bad-port".to_string()),
  });

  let mut tree = DataTree::default();
  let mut p_data = DataNode::new(p_schema, Atom::from("p"));
  p_data.value_str = Some("-1".to_string());
  let p_id = tree.alloc(None, p_data);
  tree.register_unres(UnresDataItem { kind: UnresDataKind::Must, node: p_id });

  let err = yangl::data::resolve_all(&mut tree, &ctx, &MustFails, false).unwrap_err();
  let Diag::Validation {
    message,
    error_app_tag,
    error_message,
    ..
  } = &err
  else {
    panic!("expected a Validation diagnostic");
  };
  assert_eq!(message, "must be positive");
  assert_eq!(error_app_tag.as_deref(), Some("bad-port"));
  assert_eq!(error_message.as_deref(), Some("must be positive"));
}
