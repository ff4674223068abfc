//! The handful of IETF modules every `Context` preloads (spec §6, scenario
//! S1). A textual YANG parser is out of scope, so each module below is
//! built directly out of arena calls rather than parsed from source —
//! this file is the one place the engine constructs `Module`/`SchemaNode`
//! values itself.

use yangl_support::{Atom, Status};

use crate::schema::{Context, IntBase, NodeFlags, SchemaNodeKind, Type, TypeKind, Typedef};

/// Installs `ietf-inet-types`, `ietf-yang-types`, `ietf-yang-library`, and
/// the `yang` built-in module into `ctx`, each marked implemented.
pub fn install(ctx: &mut Context) {
  install_inet_types(ctx);
  install_yang_types(ctx);
  install_yang(ctx);
  install_yang_library(ctx);
}

fn typedef(ctx: &mut Context, module: crate::schema::ModuleId, name: &str, kind: TypeKind) {
  let id = ctx.alloc_typedef(
    module,
    Typedef {
      name: Atom::from(name),
      module,
      status: Status::Current,
      base: Type::builtin(kind),
      der: None,
      default: None,
    },
  );
  let _ = id;
}

fn install_inet_types(ctx: &mut Context) {
  let module = ctx.new_module(crate::schema::Module::new(
    Atom::from("ietf-inet-types"),
    "urn:ietf:params:xml:ns:yang:ietf-inet-types",
    Atom::from("inet"),
  ));

  typedef(
    ctx,
    module,
    "ip-version",
    TypeKind::Enumeration {
      items: vec![("unknown".into(), 0), ("ipv4".into(), 1), ("ipv6".into(), 2)],
    },
  );
  typedef(
    ctx,
    module,
    "port-number",
    TypeKind::RangedInt {
      base: IntBase::Uint16,
      range: None,
    },
  );
  typedef(
    ctx,
    module,
    "ipv4-address",
    TypeKind::String {
      length: None,
      patterns: vec![r"(([0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])\.){3}([0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])(%[\p{N}\p{L}]+)?".into()],
    },
  );
  typedef(
    ctx,
    module,
    "ipv6-address",
    TypeKind::String {
      length: None,
      patterns: Vec::new(),
    },
  );
  typedef(ctx, module, "ip-address", TypeKind::Union(Vec::new()));
  typedef(
    ctx,
    module,
    "domain-name",
    TypeKind::String {
      length: None,
      patterns: Vec::new(),
    },
  );
  typedef(
    ctx,
    module,
    "uri",
    TypeKind::String {
      length: None,
      patterns: Vec::new(),
    },
  );

  ctx.finish_module(module, true).expect("built-in module registration never collides");
}

fn install_yang_types(ctx: &mut Context) {
  let module = ctx.new_module(crate::schema::Module::new(
    Atom::from("ietf-yang-types"),
    "urn:ietf:params:xml:ns:yang:ietf-yang-types",
    Atom::from("yang"),
  ));

  typedef(
    ctx,
    module,
    "counter32",
    TypeKind::RangedInt {
      base: IntBase::Uint32,
      range: None,
    },
  );
  typedef(
    ctx,
    module,
    "counter64",
    TypeKind::RangedInt {
      base: IntBase::Uint64,
      range: None,
    },
  );
  typedef(
    ctx,
    module,
    "gauge32",
    TypeKind::RangedInt {
      base: IntBase::Uint32,
      range: None,
    },
  );
  typedef(
    ctx,
    module,
    "date-and-time",
    TypeKind::String {
      length: None,
      patterns: Vec::new(),
    },
  );
  typedef(
    ctx,
    module,
    "uuid",
    TypeKind::String {
      length: None,
      patterns: vec!["[0-9a-fA-F]{8}(-[0-9a-fA-F]{4}){3}-[0-9a-fA-F]{12}".into()],
    },
  );
  typedef(
    ctx,
    module,
    "hex-string",
    TypeKind::String {
      length: None,
      patterns: Vec::new(),
    },
  );

  ctx.finish_module(module, true).expect("built-in module registration never collides");
}

/// The `yang` built-in module carries only the `origin` identity hierarchy
/// used by `ietf-yang-library`'s `used-modules`/`deviation` reporting.
fn install_yang(ctx: &mut Context) {
  let module = ctx.new_module(crate::schema::Module::new(
    Atom::from("yang"),
    "urn:ietf:params:xml:ns:yang:1",
    Atom::from("yang"),
  ));

  let origin = ctx.alloc_identity(module, crate::schema::Identity::new(Atom::from("origin"), module, None));
  for name in ["system", "intended", "dynamic", "learned"] {
    let mut identity = crate::schema::Identity::new(Atom::from(name), module, Some("origin".into()));
    identity.base = Some(origin);
    let id = ctx.alloc_identity(module, identity);
    ctx.identity_mut(origin).der.push(id);
  }

  ctx.finish_module(module, true).expect("built-in module registration never collides");
}

/// A minimal `ietf-yang-library`: enough structure (`modules-state`,
/// `module-set-id`, the `module` list and its `name`/`revision`/
/// `conformance-type` leaves) for [`crate::info::build_info_tree`] to
/// mirror `Context::modules()` into, per scenario S1.
fn install_yang_library(ctx: &mut Context) {
  let module = ctx.new_module(crate::schema::Module::new(
    Atom::from("ietf-yang-library"),
    "urn:ietf:params:xml:ns:yang:ietf-yang-library",
    Atom::from("yanglib"),
  ));

  let modules_state = ctx.alloc_node(
    module,
    None,
    Atom::from("modules-state"),
    SchemaNodeKind::Container { presence: None },
    NodeFlags {
      config: false,
      ..NodeFlags::default()
    },
  );

  let module_list = ctx.alloc_node(
    module,
    Some(modules_state),
    Atom::from("module"),
    SchemaNodeKind::List {
      keys: Vec::new(),
      key_names: "name revision".into(),
      unique: Vec::new(),
      min_elements: 0,
      max_elements: None,
    },
    NodeFlags {
      config: false,
      ..NodeFlags::default()
    },
  );
  let string_type = Type::builtin(TypeKind::String {
    length: None,
    patterns: Vec::new(),
  });

  for leaf in ["name", "revision", "schema", "namespace", "conformance-type"] {
    ctx.alloc_node(
      module,
      Some(module_list),
      Atom::from(leaf),
      SchemaNodeKind::Leaf {
        ty: string_type.clone(),
        default: None,
      },
      NodeFlags {
        config: false,
        ..NodeFlags::default()
      },
    );
  }

  ctx.alloc_node(
    module,
    Some(modules_state),
    Atom::from("module-set-id"),
    SchemaNodeKind::Leaf {
      ty: string_type,
      default: None,
    },
    NodeFlags {
      config: false,
      ..NodeFlags::default()
    },
  );

  let keys = ctx.node(module_list).children.clone();
  if let SchemaNodeKind::List { keys: slot, .. } = &mut ctx.node_mut(module_list).kind {
    *slot = keys[..2].to_vec();
  }

  ctx.finish_module(module, true).expect("built-in module registration never collides");
}
