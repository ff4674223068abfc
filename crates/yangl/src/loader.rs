//! Default filesystem-search-path [`SchemaSource`] (spec §6's
//! `ctx_load_module`), resolving `name[@revision].yang` under a context's
//! registered search directories.

use std::path::PathBuf;

use yangl_support::{Diag, SchemaSource, SourceFormat};

/// Looks up `<name>[@<revision>].yang` (falling back to `<name>.yang`)
/// under each of `search_dirs`, in order, returning the first hit.
pub struct FsSchemaSource {
  search_dirs: Vec<PathBuf>,
}

impl FsSchemaSource {
  #[must_use]
  pub fn new(search_dirs: Vec<PathBuf>) -> Self {
    Self { search_dirs }
  }

  fn candidate_names(name: &str, revision: Option<&str>) -> Vec<String> {
    match revision {
      Some(rev) => vec![format!("{name}@{rev}.yang"), format!("{name}.yang")],
      None => vec![format!("{name}.yang")],
    }
  }
}

impl SchemaSource for FsSchemaSource {
  fn load(&self, name: &str, revision: Option<&str>) -> Result<(String, SourceFormat), Diag> {
    for dir in &self.search_dirs {
      for candidate in Self::candidate_names(name, revision) {
        let path = dir.join(&candidate);
        if let Ok(text) = std::fs::read_to_string(&path) {
          return Ok((text, SourceFormat::Yang));
        }
      }
    }

    Err(Diag::System(format!(
      "module \"{name}\"{} not found in any search directory",
      revision.map(|r| format!("@{r}")).unwrap_or_default()
    )))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_the_first_matching_directory_in_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("acme.yang"), "module acme {}").unwrap();

    let source = FsSchemaSource::new(vec![dir.path().to_path_buf()]);
    let (text, format) = source.load("acme", None).unwrap();
    assert_eq!(text, "module acme {}");
    assert_eq!(format, SourceFormat::Yang);
  }

  #[test]
  fn missing_module_is_a_system_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = FsSchemaSource::new(vec![dir.path().to_path_buf()]);
    let err = source.load("definitely-not-a-real-module", None).unwrap_err();
    assert!(matches!(err, Diag::System(_)));
  }
}
