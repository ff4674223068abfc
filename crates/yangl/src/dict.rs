//! Thin re-export of the interned identifier type. The general-purpose
//! string-interning dictionary itself is an external collaborator (see
//! spec §1); this crate only needs identifier interning, which
//! `string_cache::DefaultAtom` already provides, so `Atom` is used directly
//! as the `Context`'s dictionary rather than hand-rolling a pool.

pub use yangl_support::Atom;
