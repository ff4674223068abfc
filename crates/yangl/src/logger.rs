//! Process-wide logging is explicitly disallowed by spec §9 ("global
//! mutable error state... replace with... the logger callback is a field
//! on the Context"). `Logger` is that field: verbosity plus an optional
//! callback, owned by each [`crate::schema::Context`] rather than shared.

use yangl_support::{Level, format_default};

pub type LogCallback = std::sync::Arc<dyn Fn(Level, &str, Option<&str>) + Send + Sync>;

pub struct Logger {
  verbosity: Level,
  callback: Option<LogCallback>,
  include_path: bool,
}

impl Default for Logger {
  fn default() -> Self {
    Self {
      verbosity: Level::Error,
      callback: None,
      include_path: true,
    }
  }
}

impl Logger {
  pub fn set_verbosity(&mut self, level: Level) {
    self.verbosity = level;
  }

  pub fn set_callback(&mut self, callback: Option<LogCallback>, include_path: bool) {
    self.callback = callback;
    self.include_path = include_path;
  }

  #[must_use]
  pub fn callback(&self) -> Option<&LogCallback> {
    self.callback.as_ref()
  }

  pub fn log(&self, level: Level, message: &str, path: Option<&str>) {
    if level > self.verbosity {
      return;
    }

    let path = if self.include_path { path } else { None };

    match &self.callback {
      Some(cb) => cb(level, message, path),
      None => eprintln!("{}", format_default(level, message, path)),
    }
  }
}
