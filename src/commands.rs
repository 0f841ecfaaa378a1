//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update:
//! repainting cells, calling the write path, notifying the host.

use std::collections::BTreeSet;

use crate::draft::{PendingWrite, SaveReport};
use crate::model::{CellKey, Row};

/// What needs repainting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Damage {
    /// No redraw needed (default state for accumulation)
    #[default]
    None,
    /// Redraw everything (always safe fallback)
    Full,
    /// Redraw specific cells only
    Cells(BTreeSet<CellKey>),
}

impl Damage {
    pub fn cells(keys: impl IntoIterator<Item = CellKey>) -> Self {
        let cells: BTreeSet<CellKey> = keys.into_iter().collect();
        if cells.is_empty() {
            Damage::None
        } else {
            Damage::Cells(cells)
        }
    }

    pub fn cell(key: CellKey) -> Self {
        Self::cells([key])
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Damage::Full)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Damage::None)
    }

    /// True if `key` must be repainted
    pub fn contains(&self, key: &CellKey) -> bool {
        match self {
            Damage::None => false,
            Damage::Full => true,
            Damage::Cells(cells) => cells.contains(key),
        }
    }

    /// Merge another damage into this one
    ///
    /// If either damage is Full, the result is Full.
    /// If either damage is None, the other takes precedence.
    pub fn merge(&mut self, other: Damage) {
        match (&mut *self, other) {
            (Damage::None, other) => *self = other,
            (_, Damage::None) => {}
            (Damage::Full, _) => {}
            (_, Damage::Full) => *self = Damage::Full,
            (Damage::Cells(mine), Damage::Cells(theirs)) => mine.extend(theirs),
        }
    }
}

/// Notifications delivered to the host
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A cell was committed; carries the updated record
    RowUpdated(Row),
    /// The grid dirty flag flipped
    UnsavedChanges(bool),
    /// Every write of a save batch has resolved
    SaveFinished(SaveReport),
    /// Drafts dropped because their rows were removed or refreshed
    DraftsInvalidated(Vec<CellKey>),
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Repaint cells
    Redraw(Damage),
    /// Hand a draft to the write path; the result must come back as
    /// `GridMsg::WriteCompleted`
    Write(PendingWrite),
    /// Deliver an event to subscribers
    Notify(GridEvent),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening away `None`s
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| *c != Cmd::None).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Redraw a single cell
    pub fn redraw_cell(key: CellKey) -> Self {
        Cmd::Redraw(Damage::cell(key))
    }

    pub fn redraw_cells(keys: impl IntoIterator<Item = CellKey>) -> Self {
        match Damage::cells(keys) {
            Damage::None => Cmd::None,
            damage => Cmd::Redraw(damage),
        }
    }

    /// Combined repaint damage of this command
    pub fn damage(&self) -> Damage {
        match self {
            Cmd::Redraw(damage) => damage.clone(),
            Cmd::Batch(cmds) => {
                let mut damage = Damage::None;
                for cmd in cmds {
                    damage.merge(cmd.damage());
                    if damage.is_full() {
                        break;
                    }
                }
                damage
            }
            Cmd::None | Cmd::Write(_) | Cmd::Notify(_) => Damage::None,
        }
    }

    /// Events carried by this command, in order
    pub fn events(&self) -> Vec<&GridEvent> {
        match self {
            Cmd::Notify(event) => vec![event],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::events).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_merge() {
        let mut damage = Damage::None;
        damage.merge(Damage::cell(CellKey::new("r1", "a")));
        damage.merge(Damage::cell(CellKey::new("r2", "a")));
        assert!(damage.contains(&CellKey::new("r1", "a")));
        assert!(damage.contains(&CellKey::new("r2", "a")));
        assert!(!damage.contains(&CellKey::new("r3", "a")));

        damage.merge(Damage::Full);
        assert!(damage.is_full());
        damage.merge(Damage::cell(CellKey::new("r4", "a")));
        assert!(damage.is_full());
    }

    #[test]
    fn test_batch_flattens_none() {
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::None]), Cmd::None);
        let single = Cmd::batch(vec![Cmd::None, Cmd::Notify(GridEvent::UnsavedChanges(true))]);
        assert_eq!(single, Cmd::Notify(GridEvent::UnsavedChanges(true)));
    }

    #[test]
    fn test_batch_damage_and_events() {
        let cmd = Cmd::batch(vec![
            Cmd::redraw_cell(CellKey::new("r1", "a")),
            Cmd::Notify(GridEvent::UnsavedChanges(true)),
            Cmd::batch(vec![
                Cmd::redraw_cell(CellKey::new("r1", "b")),
                Cmd::Notify(GridEvent::UnsavedChanges(false)),
            ]),
        ]);
        assert_eq!(
            cmd.damage(),
            Damage::cells([CellKey::new("r1", "a"), CellKey::new("r1", "b")])
        );
        assert_eq!(
            cmd.events(),
            vec![
                &GridEvent::UnsavedChanges(true),
                &GridEvent::UnsavedChanges(false)
            ]
        );
    }

    #[test]
    fn test_empty_redraw_is_none() {
        assert_eq!(Cmd::redraw_cells(Vec::new()), Cmd::None);
    }
}
