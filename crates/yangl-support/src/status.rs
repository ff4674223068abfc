/// A definition's `status` statement: `current`, `deprecated`, or `obsolete`.
///
/// Ordered so that `Current > Deprecated > Obsolete`, matching the partial
/// order a `current` definition may not reference a `deprecated`/`obsolete`
/// one, and a `deprecated` definition may not reference an `obsolete` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Status {
  #[default]
  Current,
  Deprecated,
  Obsolete,
}

impl Status {
  /// Whether a definition with status `referrer` may reference a definition
  /// with status `referenced`. Implemented once and reused by every
  /// resolution path that crosses a status boundary (identity base,
  /// leafref target, uses-to-grouping, list key, feature reference).
  #[must_use]
  pub fn may_reference(referrer: Self, referenced: Self) -> bool {
    referrer >= referenced
  }
}

#[cfg(test)]
mod tests {
  use super::Status::{Current, Deprecated, Obsolete};

  #[test]
  fn current_may_reference_current_only() {
    assert!(super::Status::may_reference(Current, Current));
    assert!(!super::Status::may_reference(Current, Deprecated));
    assert!(!super::Status::may_reference(Current, Obsolete));
  }

  #[test]
  fn deprecated_may_reference_current_or_deprecated() {
    assert!(super::Status::may_reference(Deprecated, Current));
    assert!(super::Status::may_reference(Deprecated, Deprecated));
    assert!(!super::Status::may_reference(Deprecated, Obsolete));
  }

  #[test]
  fn obsolete_may_reference_anything() {
    assert!(super::Status::may_reference(Obsolete, Current));
    assert!(super::Status::may_reference(Obsolete, Deprecated));
    assert!(super::Status::may_reference(Obsolete, Obsolete));
  }

  #[test]
  fn ordering_matches_partial_order() {
    assert!(Current < Deprecated);
    assert!(Deprecated < Obsolete);
  }
}
