//! Instance data tree (spec §3/§4.6): [`DataNode`] mirrors a schema node
//! one-for-one, and [`UnresDataItem`] is the per-node pending-reference
//! record the data parser registers before [`crate::unres_data`] drives
//! it to a fixpoint.

use yangl_support::Atom;

use crate::schema::NodeId;

pub mod unres_data;

pub use unres_data::{UnresDataItem, UnresDataKind, resolve_all};

/// Arena index into [`DataTree::nodes`], mirroring [`crate::schema::NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataNodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenStatus {
  Unevaluated,
  True,
  False,
}

/// One instance of a schema node. Terminal nodes carry `value_str`;
/// containers/lists carry only structure through `children`.
#[derive(Debug, Clone)]
pub struct DataNode {
  pub schema: NodeId,
  pub name: Atom,
  pub parent: Option<DataNodeId>,
  pub children: Vec<DataNodeId>,
  pub value_str: Option<String>,
  pub when_status: WhenStatus,
}

impl DataNode {
  #[must_use]
  pub fn new(schema: NodeId, name: Atom) -> Self {
    Self {
      schema,
      name,
      parent: None,
      children: Vec::new(),
      value_str: None,
      when_status: WhenStatus::Unevaluated,
    }
  }
}

/// Owns every [`DataNode`] of one parsed instance document.
#[derive(Debug, Clone, Default)]
pub struct DataTree {
  pub(crate) nodes: Vec<DataNode>,
  pub(crate) roots: Vec<DataNodeId>,
  pub(crate) unres: Vec<UnresDataItem>,
}

impl DataTree {
  pub fn alloc(&mut self, parent: Option<DataNodeId>, mut node: DataNode) -> DataNodeId {
    node.parent = parent;
    self.nodes.push(node);
    let id = DataNodeId((self.nodes.len() - 1) as u32);
    match parent {
      Some(p) => self.nodes[p.0 as usize].children.push(id),
      None => self.roots.push(id),
    }
    id
  }

  #[must_use]
  pub fn node(&self, id: DataNodeId) -> &DataNode {
    &self.nodes[id.0 as usize]
  }

  pub fn node_mut(&mut self, id: DataNodeId) -> &mut DataNode {
    &mut self.nodes[id.0 as usize]
  }

  #[must_use]
  pub fn roots(&self) -> &[DataNodeId] {
    &self.roots
  }

  pub fn register_unres(&mut self, item: UnresDataItem) {
    self.unres.push(item);
  }

  fn unlink(&mut self, id: DataNodeId) {
    if let Some(parent) = self.nodes[id.0 as usize].parent {
      self.nodes[parent.0 as usize].children.retain(|&c| c != id);
    } else {
      self.roots.retain(|&c| c != id);
    }
  }

  fn parent_of(&self, id: DataNodeId) -> Option<DataNodeId> {
    self.nodes[id.0 as usize].parent
  }
}
