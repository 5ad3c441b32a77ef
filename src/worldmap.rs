//! World map container.
//!
//! Bundles the terrain grid with the settlement list so the whole map can
//! be handed around (and replaced wholesale on regenerate/load) as one
//! value.

use serde::{Deserialize, Serialize};

use crate::settlement::{Settlement, SettlementId, SettlementKind};
use crate::terrain::TerrainType;
use crate::tilemap::Tilemap;

#[derive(Clone, Serialize, Deserialize)]
pub struct WorldMap {
    /// Map width in tiles
    pub width: usize,
    /// Map height in tiles
    pub height: usize,
    pub tiles: Tilemap<TerrainType>,
    pub settlements: Vec<Settlement>,
    /// Seed used for generation, when known (allows recreation)
    pub seed: Option<u64>,
    pub name: String,
}

impl WorldMap {
    pub fn new(
        tiles: Tilemap<TerrainType>,
        settlements: Vec<Settlement>,
        seed: Option<u64>,
        name: String,
    ) -> Self {
        let width = tiles.width;
        let height = tiles.height;
        Self {
            width,
            height,
            tiles,
            settlements,
            seed,
            name,
        }
    }

    /// The settlement occupying exactly this tile, if any.
    pub fn settlement_at(&self, x: i32, y: i32) -> Option<&Settlement> {
        self.settlements.iter().find(|s| s.x == x && s.y == y)
    }

    pub fn settlement(&self, id: SettlementId) -> Option<&Settlement> {
        self.settlements.get(id.0)
    }

    pub fn count_of(&self, kind: SettlementKind) -> usize {
        self.settlements.iter().filter(|s| s.kind == kind).count()
    }

    /// Vassals of the given settlement (villages of a town, towns of a city).
    pub fn vassals_of(&self, id: SettlementId) -> impl Iterator<Item = &Settlement> {
        self.settlements
            .iter()
            .filter(move |s| s.liege == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;

    fn test_map() -> WorldMap {
        let tiles = Tilemap::new_with(20, 10, TerrainType::Grassland);
        let settlements = vec![
            Settlement {
                id: SettlementId(0),
                kind: SettlementKind::Town,
                x: 5,
                y: 5,
                name: "Taerloch".to_string(),
                liege: None,
            },
            Settlement {
                id: SettlementId(1),
                kind: SettlementKind::Village,
                x: 8,
                y: 5,
                name: "Aelrin".to_string(),
                liege: Some(SettlementId(0)),
            },
        ];
        WorldMap::new(tiles, settlements, Some(42), "test".to_string())
    }

    #[test]
    fn test_settlement_at_exact_tile_only() {
        let map = test_map();
        assert!(map.settlement_at(5, 5).is_some());
        assert!(map.settlement_at(5, 6).is_none());
        assert!(map.settlement_at(6, 5).is_none());
    }

    #[test]
    fn test_vassal_lookup() {
        let map = test_map();
        let vassals: Vec<_> = map.vassals_of(SettlementId(0)).collect();
        assert_eq!(vassals.len(), 1);
        assert_eq!(vassals[0].name, "Aelrin");
        assert_eq!(map.vassals_of(SettlementId(1)).count(), 0);
    }
}
