//! A YANG schema compilation and instance-data validation engine: loads,
//! links, and validates YANG schema modules, then parses/validates
//! instance data trees against the resulting schema graph.
//!
//! The public surface lives almost entirely on [`schema::Context`]: build
//! (or preload) [`schema::Module`]s and [`schema::SchemaNode`]s, register
//! [`unres_schema::UnresSchemaItem`]s for every forward reference a
//! front-end parser encounters, then call [`schema::Context::resolve_all`]
//! to drive the whole graph to a fixpoint. Instance data follows the same
//! shape one level down: a [`data::DataTree`] plus registered
//! [`data::UnresDataItem`]s resolved by [`data::resolve_all`].
//!
//! Textual YANG/YIN parsing, XML/JSON data parsing, and the XPath
//! evaluator consumed by `when`/`must`/leafref resolution are external
//! collaborators; this crate only defines the contracts they plug into
//! ([`yangl_support::SchemaSource`], [`yangl_support::XPathEvaluator`]).

pub mod builtins;
pub mod data;
pub mod diag;
pub mod dict;
pub mod info;
pub mod loader;
pub mod logger;
pub mod pathlex;
pub mod range;
pub mod resolver;
pub mod schema;
pub mod unres_schema;

pub use yangl_support::{Diag, EvalContext, Level, SchemaSource, SourceFormat, ValidationCode, XPathEvaluator, XPathValue};
