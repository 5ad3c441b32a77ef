//! Settlements placed on the world map.
//!
//! Villages are vassals of towns, towns may be vassals of cities. The
//! hierarchy is stored as id links into the owning map's settlement list.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    Village,
    Town,
    City,
}

impl SettlementKind {
    pub fn name(&self) -> &'static str {
        match self {
            SettlementKind::Village => "Village",
            SettlementKind::Town => "Town",
            SettlementKind::City => "City",
        }
    }

    /// Marker color in the viewer.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            SettlementKind::Village => (200, 170, 120),
            SettlementKind::Town => (220, 120, 60),
            SettlementKind::City => (230, 60, 60),
        }
    }
}

/// Index of a settlement within its map's settlement list. Ids are only
/// meaningful for the map that produced them; a regenerated or loaded map
/// is a new identity space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub usize);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub kind: SettlementKind,
    /// Position in tile coordinates.
    pub x: i32,
    pub y: i32,
    pub name: String,
    /// For villages: the town they serve. For towns: the city they serve.
    pub liege: Option<SettlementId>,
}

impl Settlement {
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(SettlementKind::Village.name(), "Village");
        assert_eq!(SettlementKind::City.name(), "City");
    }
}
