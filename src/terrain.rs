//! Terrain classification for the world map.
//!
//! Each terrain type carries a display color and movement/visibility
//! properties used by the viewer and the settlement placer.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Grassland,
    Hills,
    ForestedHill,
    Mountain,
    Forest,
    River,
    ShallowWater,
    DeepWater,
}

impl TerrainType {
    pub fn name(&self) -> &'static str {
        match self {
            TerrainType::Grassland => "Grassland",
            TerrainType::Hills => "Hills",
            TerrainType::ForestedHill => "Forested Hill",
            TerrainType::Mountain => "Mountain",
            TerrainType::Forest => "Forest",
            TerrainType::River => "River",
            TerrainType::ShallowWater => "Shallow Water",
            TerrainType::DeepWater => "Deep Water",
        }
    }

    /// RGB display color.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TerrainType::Grassland => (120, 180, 100),
            TerrainType::Hills => (120, 100, 70),
            TerrainType::ForestedHill => (80, 100, 60),
            TerrainType::Mountain => (100, 100, 100),
            TerrainType::Forest => (20, 80, 20),
            TerrainType::River => (70, 130, 180),
            TerrainType::ShallowWater => (70, 140, 180),
            TerrainType::DeepWater => (20, 60, 120),
        }
    }

    /// Whether units can move through this terrain.
    pub fn is_passable(&self) -> bool {
        matches!(
            self,
            TerrainType::Grassland
                | TerrainType::Hills
                | TerrainType::ForestedHill
                | TerrainType::Forest
        )
    }

    /// Whether this terrain blocks line of sight.
    pub fn blocks_view(&self) -> bool {
        matches!(
            self,
            TerrainType::Forest | TerrainType::ForestedHill | TerrainType::Mountain
        )
    }

    pub fn is_water(&self) -> bool {
        matches!(
            self,
            TerrainType::River | TerrainType::ShallowWater | TerrainType::DeepWater
        )
    }
}

impl Default for TerrainType {
    fn default() -> Self {
        TerrainType::DeepWater
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_is_impassable() {
        assert!(!TerrainType::River.is_passable());
        assert!(!TerrainType::ShallowWater.is_passable());
        assert!(!TerrainType::DeepWater.is_passable());
        assert!(TerrainType::Grassland.is_passable());
    }

    #[test]
    fn test_forest_blocks_view_but_allows_movement() {
        assert!(TerrainType::Forest.is_passable());
        assert!(TerrainType::Forest.blocks_view());
        assert!(TerrainType::ForestedHill.blocks_view());
        assert!(!TerrainType::River.blocks_view());
    }
}
