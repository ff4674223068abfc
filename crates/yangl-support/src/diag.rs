/// Log verbosity, from `set_log_callback`/`verbosity` down to the formatted
/// fallback line the default logger writes to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
  Error,
  Warning,
  Verbose,
  Debug,
}

/// Validation sub-codes, mirroring the `LYE_*` family the engine this is
/// grounded on uses internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ValidationCode {
  DuplicateId,
  KeyMissing,
  KeyDup,
  KeyType,
  KeyConfig,
  NoResolv,
  InMod,
  InChar,
  PathInNode,
  PathInKey,
  PathMissKey,
  NoMust,
  NoWhen,
  InWhen,
  NoLeafref,
  TooMany,
  CircularRef,
}

/// The error taxonomy of the schema/data resolution engine. Replaces the
/// thread-local `ly_errno`/path-buffer pair with an explicit return value:
/// every fallible operation in this crate returns `Result<_, Diag>` rather
/// than setting process-wide state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Diag {
  #[error("out of memory")]
  Mem,

  #[error("syntax error at byte offset {offset}: {message}")]
  Syntax { offset: usize, message: String },

  #[error("{code}: {message}")]
  Validation {
    code: ValidationCode,
    message: String,
    path: Option<String>,
    error_app_tag: Option<String>,
    error_message: Option<String>,
  },

  #[error("system error: {0}")]
  System(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl Diag {
  #[must_use]
  pub fn validation(code: ValidationCode, message: impl Into<String>) -> Self {
    Self::Validation {
      code,
      message: message.into(),
      path: None,
      error_app_tag: None,
      error_message: None,
    }
  }

  #[must_use]
  pub fn with_path(mut self, path: impl Into<String>) -> Self {
    if let Self::Validation { path: slot, .. } = &mut self {
      *slot = Some(path.into());
    }
    self
  }

  #[must_use]
  pub fn with_app_tag(mut self, tag: impl Into<String>, msg: impl Into<String>) -> Self {
    if let Self::Validation {
      error_app_tag,
      error_message,
      ..
    } = &mut self
    {
      *error_app_tag = Some(tag.into());
      *error_message = Some(msg.into());
    }
    self
  }

  #[must_use]
  pub fn path(&self) -> Option<&str> {
    match self {
      Self::Validation { path, .. } => path.as_deref(),
      _ => None,
    }
  }

  #[must_use]
  pub fn code(&self) -> Option<ValidationCode> {
    match self {
      Self::Validation { code, .. } => Some(*code),
      _ => None,
    }
  }
}

/// Formats a diagnostic the way the default (no-callback) logger renders it:
/// `libyang[<level>]: <message> (path: <path>)`.
#[must_use]
pub fn format_default(level: Level, message: &str, path: Option<&str>) -> String {
  match path {
    Some(path) => format!("libyang[{level}]: {message} (path: {path})"),
    None => format!("libyang[{level}]: {message}"),
  }
}

#[cfg(test)]
mod tests {
  use super::{Diag, Level, ValidationCode, format_default};

  #[test]
  fn validation_builder_sets_path_and_app_tag() {
    let diag = Diag::validation(ValidationCode::NoMust, "must be positive")
      .with_path("/if:interfaces/if:interface[name='eth0']/if:enabled")
      .with_app_tag("bad-port", "must be positive");

    assert_eq!(diag.path(), Some("/if:interfaces/if:interface[name='eth0']/if:enabled"));
    assert_eq!(diag.code(), Some(ValidationCode::NoMust));
    let Diag::Validation {
      error_app_tag,
      error_message,
      ..
    } = &diag
    else {
      panic!("expected Validation variant");
    };
    assert_eq!(error_app_tag.as_deref(), Some("bad-port"));
    assert_eq!(error_message.as_deref(), Some("must be positive"));
  }

  #[test]
  fn default_formatting_matches_contract() {
    let msg = format_default(Level::Error, "no resolvable target", Some("/a:b"));
    assert_eq!(msg, "libyang[error]: no resolvable target (path: /a:b)");

    let msg = format_default(Level::Warning, "deprecated node used", None);
    assert_eq!(msg, "libyang[warning]: deprecated node used");
  }

  #[test]
  fn non_validation_variants_have_no_path() {
    assert_eq!(Diag::Mem.path(), None);
    assert_eq!(Diag::System("disk full".into()).path(), None);
  }
}
