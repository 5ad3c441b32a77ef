//! Settlement focus state.
//!
//! There is exactly one focus slot across all settlement categories:
//! focusing a town clears a focused village or city and vice versa.
//! Tapping the focused settlement again toggles it off, and tapping empty
//! ground always clears the focus.

use crate::settlement::{SettlementId, SettlementKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Village(SettlementId),
    Town(SettlementId),
    City(SettlementId),
}

impl Selection {
    pub fn focus(kind: SettlementKind, id: SettlementId) -> Selection {
        match kind {
            SettlementKind::Village => Selection::Village(id),
            SettlementKind::Town => Selection::Town(id),
            SettlementKind::City => Selection::City(id),
        }
    }

    /// The focused settlement, if any.
    pub fn focused(&self) -> Option<SettlementId> {
        match self {
            Selection::None => None,
            Selection::Village(id) | Selection::Town(id) | Selection::City(id) => Some(*id),
        }
    }

    pub fn is_focused(&self, id: SettlementId) -> bool {
        self.focused() == Some(id)
    }

    /// Apply a tap. `target` is the settlement under the tapped tile, or
    /// `None` for empty ground.
    pub fn tap(&mut self, target: Option<(SettlementKind, SettlementId)>) {
        *self = match target {
            None => Selection::None,
            Some((_, id)) if self.is_focused(id) => Selection::None,
            Some((kind, id)) => Selection::focus(kind, id),
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }
}
