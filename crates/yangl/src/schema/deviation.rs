use super::context::NodeId;

#[derive(Debug, Clone)]
pub enum DeviateKind {
  NotSupported,
  Add,
  Replace,
  Delete,
}

/// One `deviate` entry inside a `deviation` statement. Carried as a
/// property bag rather than per-kind variants since most fields are
/// optional regardless of `kind` (RFC 7950 allows any of `type`, `units`,
/// `default`, `config`, `mandatory`, `min-elements`, `max-elements`,
/// `must` on `add`/`replace`/`delete` as applicable).
#[derive(Debug, Clone, Default)]
pub struct DeviateProps {
  pub config: Option<bool>,
  pub mandatory: Option<bool>,
  pub min_elements: Option<u32>,
  pub max_elements: Option<u32>,
  pub default: Option<String>,
  pub must: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Deviate {
  pub kind: DeviateKind,
  pub props: DeviateProps,
}

/// A `deviation` statement: a target plus ordered deviate entries, applied
/// after base resolution so the affected node's final shape already
/// reflects augments/uses/refines.
#[derive(Debug, Clone)]
pub struct Deviation {
  pub target_name: String,
  pub target: Option<NodeId>,
  pub deviates: Vec<Deviate>,
}
