//! Worklist of pending schema references and the fixpoint driver that
//! resolves them (spec §4.4). Modeled as a single `Vec` of tagged items
//! with an explicit resolved/failed state per entry, per spec §9's
//! "single queue of tagged items with a `Resolved` sentinel" design note,
//! rather than the original's parallel `(item[], type[], str_snode[],
//! module[])` arrays.

use yangl_support::{Diag, Level, ValidationCode};

use crate::schema::{Context, ModuleId, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresKind {
  Ident,
  TypeIdentref,
  TypeLeafref,
  TypeDer,
  TypeDflt,
  ChoiceDflt,
  IfFeat,
  Uses,
  ListKeys,
  ListUniq,
  Augment,
}

impl UnresKind {
  /// Kinds handled by the grouping pre-phase (spec §4.4 step 1): a
  /// `Uses` must be expanded, and a typedef's base must be derived,
  /// before anything nested inside a grouping's copied subtree can be
  /// resolved against it.
  fn is_pre_phase(self) -> bool {
    matches!(self, Self::Uses | Self::TypeDer)
  }
}

/// A pending schema reference: `{kind, owner_module, subject, argument}`
/// as spec §3 describes. `subject` is the entity awaiting resolution —
/// the node/typedef/identity whose field `argument` (a still-unparsed
/// reference string) names.
#[derive(Debug, Clone)]
pub struct UnresSchemaItem {
  pub kind: UnresKind,
  pub owner_module: ModuleId,
  pub subject: Subject,
  pub argument: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
  Pending,
  Resolved,
}

struct Entry {
  item: UnresSchemaItem,
  state: EntryState,
}

/// The pending-item queue owned by [`Context`]. Resolution functions
/// never log directly (spec §9: `try_resolve` "never logs"); this
/// driver decides whether a stalled pass is worth surfacing.
#[derive(Default)]
pub struct Worklist {
  entries: Vec<Entry>,
}

impl Worklist {
  pub fn push(&mut self, item: UnresSchemaItem) {
    self.entries.push(Entry {
      item,
      state: EntryState::Pending,
    });
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.iter().all(|e| e.state == EntryState::Resolved)
  }

  /// Drives both phases of spec §4.4 to a fixpoint. `ctx.worklist` must
  /// be emptied into this value with `std::mem::take` before calling,
  /// since resolution needs `&mut Context` while iterating its own
  /// queue; [`Context::resolve_all`] does this dance.
  ///
  /// # Errors
  /// Returns [`Diag::Validation`] (`NoResolv`) if a pass makes no
  /// progress while unresolved items of the relevant phase remain, or
  /// whatever hard [`Diag`] a single item's resolution raised (identity
  /// cycles, duplicate ids, and the like are never worth retrying).
  pub fn drive(mut self, ctx: &mut Context) -> Result<(), Diag> {
    self.run_identity_phase(ctx)?;
    self.run_phase(ctx, UnresKind::is_pre_phase)?;
    self.run_phase(ctx, |k| !matches!(k, UnresKind::Ident))?;
    Ok(())
  }

  /// `Ident` items resolve as a batch ahead of everything else, so a
  /// cycle is caught before any identity's `base`/`der` is mutated (see
  /// [`crate::resolver::identity::resolve_all_bases`]).
  fn run_identity_phase(&mut self, ctx: &mut Context) -> Result<(), Diag> {
    let idx_list: Vec<usize> = self
      .entries
      .iter()
      .enumerate()
      .filter(|(_, e)| e.item.kind == UnresKind::Ident && e.state == EntryState::Pending)
      .map(|(idx, _)| idx)
      .collect();

    let items: Vec<UnresSchemaItem> = idx_list.iter().map(|&idx| self.entries[idx].item.clone()).collect();
    let outcomes = crate::resolver::identity::resolve_all_bases(ctx, &items)?;

    let mut stalled = Vec::new();
    for (k, &idx) in idx_list.iter().enumerate() {
      if outcomes[k] {
        self.entries[idx].state = EntryState::Resolved;
      } else {
        stalled.push(idx);
      }
    }

    if let Some(&first) = stalled.first() {
      for &idx in &stalled {
        let item = &self.entries[idx].item;
        ctx.log(Level::Error, &format!("unresolved Ident reference \"{}\"", item.argument), None);
      }
      let item = &self.entries[first].item;
      return Err(Diag::validation(
        ValidationCode::NoResolv,
        format!("unable to resolve Ident reference \"{}\"", item.argument),
      ));
    }

    Ok(())
  }

  fn run_phase(&mut self, ctx: &mut Context, in_phase: impl Fn(UnresKind) -> bool) -> Result<(), Diag> {
    loop {
      let mut progress = false;
      for idx in 0..self.entries.len() {
        if self.entries[idx].state == EntryState::Resolved || !in_phase(self.entries[idx].item.kind) {
          continue;
        }
        if crate::resolver::try_resolve(ctx, &self.entries[idx].item)? {
          self.entries[idx].state = EntryState::Resolved;
          progress = true;
        }
      }
      if !progress {
        break;
      }
    }

    let stalled: Vec<usize> = (0..self.entries.len())
      .filter(|&idx| in_phase(self.entries[idx].item.kind) && self.entries[idx].state == EntryState::Pending)
      .collect();

    if let Some(&first) = stalled.first() {
      for &idx in &stalled {
        let item = &self.entries[idx].item;
        ctx.log(
          Level::Error,
          &format!("unresolved {:?} reference \"{}\"", item.kind, item.argument),
          None,
        );
      }
      let item = &self.entries[first].item;
      return Err(Diag::validation(
        ValidationCode::NoResolv,
        format!("unable to resolve {:?} reference \"{}\"", item.kind, item.argument),
      ));
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_worklist_is_trivially_done() {
    let worklist = Worklist::default();
    assert!(worklist.is_empty());
  }
}
