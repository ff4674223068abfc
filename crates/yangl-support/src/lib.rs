//! Shared contracts consumed by both the `yangl` engine and any external
//! YIN/YANG text parser, XML/JSON data parser, or XPath evaluator that
//! plugs into it. Kept as a separate crate so a parser implementation can
//! depend on just the wire types without pulling in the resolution engine.

mod diag;
mod status;
mod traits;

pub use diag::{Diag, Level, ValidationCode, format_default};
pub use status::Status;
pub use traits::{EvalContext, SchemaSource, SourceFormat, XPathEvaluator, XPathValue};

/// Interned identifier type used throughout the schema graph for module
/// names, prefixes, and node names.
pub type Atom = string_cache::DefaultAtom;
