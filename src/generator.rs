//! Procedural map generation.
//!
//! Generates maps from fBm noise with percentile-based elevation
//! thresholds, smoothed coastlines, downhill-traced rivers, forests near
//! water, an impassable mountain border, and a settlement hierarchy
//! (villages vassal to towns, towns vassal to cities).
//!
//! Generation is one synchronous call. The progress sink is invoked with a
//! non-decreasing fraction throughout and `1.0` just before returning; the
//! elevation pass reports every few rows so the callback cadence stays
//! tight even on large maps.

use std::collections::VecDeque;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::progress::ProgressSink;
use crate::settlement::{Settlement, SettlementId, SettlementKind};
use crate::terrain::TerrainType;
use crate::tilemap::Tilemap;
use crate::worldmap::WorldMap;

/// Parameters for a generation run.
#[derive(Clone, Debug)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    /// Random seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 4000,
            height: 1000,
            seed: None,
        }
    }
}

// Noise shaping: small scale for large coherent landmasses, high
// persistence for smooth transitions.
const NOISE_SCALE: f64 = 0.002;
const NOISE_OCTAVES: usize = 8;
const NOISE_PERSISTENCE: f64 = 0.7;

const FOREST_RANGE: i32 = 8;
const RESOURCE_RANGE: i32 = 30;
const MIN_TOWN_DISTANCE: i64 = 50;
const MIN_CITY_DISTANCE: i64 = 150;
const CITY_CLAIM_RANGE: i64 = 120;

const TOWN_NAMES: &[&str] = &[
    "Aelbrig", "Baelara", "Brannoch", "Caerwyn", "Clynnmor", "Eilthir", "Faelinn", "Garanmoor",
    "Halbragh", "Inniskeir", "Lirvale", "Moighan", "Naevra", "Oirthir", "Pendraen", "Rhoslyn",
    "Saethra", "Taerloch", "Vannagh", "Wynfell", "Dromlach", "Erynfael", "Kilmora", "Muirlen",
];

const VILLAGE_NAMES: &[&str] = &[
    "Aelrin", "Anwen", "Ardra", "Baerin", "Bethra", "Branlin", "Caelach", "Cairin", "Clanna",
    "Conlin", "Corran", "Daelach", "Derlen", "Donlen", "Eanach", "Eirlen", "Faelach", "Fenach",
    "Fianna", "Gailin", "Gallen", "Granna", "Helin", "Inach", "Kellach", "Laenna", "Linach",
    "Maelach", "Mirlen", "Noinn", "Orra", "Rallan",
];

const CITY_NAMES: &[&str] = &[
    "Caer Dorath", "Dun Maireach", "Tirgannon", "Lochamber", "Vael Morra", "Straithgael",
    "Kaer Uladh", "Penn Archa", "Morvendale", "Aird Suilven",
];

/// Percentile-derived elevation thresholds so the land/water mix stays
/// stable across seeds.
#[derive(Clone, Copy, Debug)]
struct Thresholds {
    deep_water: f32,
    shallow_water: f32,
    grassland: f32,
    hills: f32,
}

impl Thresholds {
    fn from_distribution(elevation: &Tilemap<f32>) -> Self {
        // Sample with a stride so the sort stays cheap on large maps.
        let total = elevation.width * elevation.height;
        let stride = (total / 200_000).max(1);
        let mut sample: Vec<f32> = elevation
            .iter()
            .enumerate()
            .filter(|(i, _)| i % stride == 0)
            .map(|(_, (_, _, &e))| e)
            .collect();
        sample.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let q = |p: f64| sample[((sample.len() as f64 * p) as usize).min(sample.len() - 1)];

        let min = sample[0];
        let max = sample[sample.len() - 1];
        let deep_water = q(0.40);
        let mut shallow_water = q(0.45);
        let mut grassland = q(0.85);
        let mut hills = q(0.97);

        // Force minimum spacing so every terrain band appears even on
        // degenerate distributions.
        let min_spacing = (max - min) * 0.05;
        if shallow_water - deep_water < min_spacing {
            shallow_water = (deep_water + min_spacing).min(max);
        }
        if grassland - shallow_water < min_spacing * 2.0 {
            grassland = (shallow_water + min_spacing * 2.0).min(max);
        }
        if hills - grassland < min_spacing {
            hills = (grassland + min_spacing).min(max);
        }

        Self {
            deep_water,
            shallow_water,
            grassland,
            hills,
        }
    }

    fn classify(&self, elevation: f32) -> TerrainType {
        if elevation < self.deep_water {
            TerrainType::DeepWater
        } else if elevation < self.shallow_water {
            TerrainType::ShallowWater
        } else if elevation < self.grassland {
            TerrainType::Grassland
        } else if elevation < self.hills {
            TerrainType::Hills
        } else {
            TerrainType::Mountain
        }
    }
}

pub struct MapGenerator {
    width: usize,
    height: usize,
    seed: u64,
    rng: ChaCha8Rng,
}

impl MapGenerator {
    pub fn new(config: &MapConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            width: config.width,
            height: config.height,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a complete map. Runs synchronously; `sink` receives
    /// progress reports throughout and is the only interleaving point.
    pub fn generate(&mut self, sink: &mut dyn ProgressSink) -> WorldMap {
        sink.report(0.0, "Starting map generation...");
        let elevation = self.generate_elevation(sink);

        sink.report(0.20, "Analyzing elevation distribution...");
        let thresholds = Thresholds::from_distribution(&elevation);

        sink.report(0.25, "Applying elevation thresholds...");
        let mut tiles = Tilemap::new_with(self.width, self.height, TerrainType::DeepWater);
        for (x, y, &e) in elevation.iter() {
            tiles.set(x, y, thresholds.classify(e));
        }

        sink.report(0.35, "Contouring coastlines...");
        smooth_coastlines(&mut tiles);
        sink.report(0.45, "Final coastline smoothing...");
        smooth_coastlines(&mut tiles);

        sink.report(0.50, "Generating rivers and lakes...");
        let (river_tiles, lake_tiles) = self.carve_rivers(&mut tiles, &elevation, sink);
        sink.report(
            0.70,
            &format!(
                "Generated {} river tiles and {} lake tiles",
                river_tiles, lake_tiles
            ),
        );

        sink.report(0.85, "Adding forests...");
        self.plant_forests(&mut tiles);

        sink.report(0.95, "Adding impassable borders...");
        self.raise_border_mountains(&mut tiles);

        sink.report(0.98, "Placing settlements...");
        let mut settlements = self.place_towns(&tiles);

        sink.report(0.99, "Placing cities...");
        self.place_cities(&tiles, &mut settlements);

        sink.report(1.0, "Map generation complete!");

        let name = format!("realm-{}", self.seed);
        WorldMap::new(tiles, settlements, Some(self.seed), name)
    }

    /// fBm elevation in [0, 1], curved toward mid-range values so the
    /// grassland/hills bands dominate the land.
    fn generate_elevation(&mut self, sink: &mut dyn ProgressSink) -> Tilemap<f32> {
        let fbm = Fbm::<Perlin>::new(self.seed as u32)
            .set_octaves(NOISE_OCTAVES)
            .set_persistence(NOISE_PERSISTENCE);

        let mut elevation = Tilemap::new_with(self.width, self.height, 0.0f32);
        let report_every = (self.height / 50).max(1);

        for y in 0..self.height {
            for x in 0..self.width {
                let n = fbm.get([x as f64 * NOISE_SCALE, y as f64 * NOISE_SCALE]);
                let normalized = ((n + 1.0) / 2.0).clamp(0.0, 1.0);
                elevation.set(x, y, normalized.powf(0.85) as f32);
            }
            if y % report_every == 0 {
                sink.report(
                    0.20 * (y as f32 / self.height as f32),
                    &format!("Generating elevation map... {}/{}", y, self.height),
                );
            }
        }
        elevation
    }

    /// Trace rivers downhill from high ground; a river that bottoms out on
    /// land pools into a small lake. Returns (river, lake) tile counts.
    fn carve_rivers(
        &mut self,
        tiles: &mut Tilemap<TerrainType>,
        elevation: &Tilemap<f32>,
        sink: &mut dyn ProgressSink,
    ) -> (usize, usize) {
        sink.report(0.52, "Selecting river sources...");
        let target_sources = (self.width * self.height / 50_000).max(4);
        let mut sources = Vec::with_capacity(target_sources);
        let mut attempts = 0;
        while sources.len() < target_sources && attempts < target_sources * 50 {
            attempts += 1;
            let x = self.rng.gen_range(0..self.width);
            let y = self.rng.gen_range(0..self.height);
            if matches!(
                tiles.get(x, y),
                TerrainType::Hills | TerrainType::Mountain
            ) {
                sources.push((x, y));
            }
        }

        sink.report(0.60, &format!("Tracing {} rivers...", sources.len()));
        let mut river_count = 0usize;
        let mut lake_count = 0usize;
        let max_length = self.width + self.height;

        for (i, &(sx, sy)) in sources.iter().enumerate() {
            if i > 0 && i % 10 == 0 {
                sink.report(
                    0.60 + 0.10 * (i as f32 / sources.len() as f32),
                    &format!("Tracing rivers... {}/{}", i, sources.len()),
                );
            }

            let (mut x, mut y) = (sx, sy);
            for _ in 0..max_length {
                if tiles.get(x, y).is_water() {
                    break;
                }

                // Steepest-descent step.
                let here = *elevation.get(x, y);
                let next = tiles
                    .neighbors_8(x, y)
                    .into_iter()
                    .min_by(|&(ax, ay), &(bx, by)| {
                        elevation
                            .get(ax, ay)
                            .partial_cmp(elevation.get(bx, by))
                            .unwrap()
                    })
                    .filter(|&(nx, ny)| *elevation.get(nx, ny) < here);

                match next {
                    Some((nx, ny)) => {
                        tiles.set(x, y, TerrainType::River);
                        river_count += 1;
                        x = nx;
                        y = ny;
                    }
                    None => {
                        // Local minimum on land: pool into a lake.
                        tiles.set(x, y, TerrainType::ShallowWater);
                        lake_count += 1;
                        for (nx, ny) in tiles.neighbors_8(x, y) {
                            if !tiles.get(nx, ny).is_water() {
                                tiles.set(nx, ny, TerrainType::ShallowWater);
                                lake_count += 1;
                            }
                        }
                        break;
                    }
                }
            }
        }

        (river_count, lake_count)
    }

    /// Forests cluster near fresh and coastal water, fading with distance.
    fn plant_forests(&mut self, tiles: &mut Tilemap<TerrainType>) {
        let distance = water_distance_map(tiles, FOREST_RANGE);
        for y in 0..self.height {
            for x in 0..self.width {
                let d = *distance.get(x, y);
                if d < 0 {
                    continue;
                }
                let chance = 0.55 * (1.0 - d as f32 / FOREST_RANGE as f32);
                if self.rng.gen::<f32>() >= chance {
                    continue;
                }
                match tiles.get(x, y) {
                    TerrainType::Grassland => tiles.set(x, y, TerrainType::Forest),
                    TerrainType::Hills => tiles.set(x, y, TerrainType::ForestedHill),
                    _ => {}
                }
            }
        }
    }

    /// Seal the map edge with a jagged mountain band so nothing walks off
    /// the world.
    fn raise_border_mountains(&mut self, tiles: &mut Tilemap<TerrainType>) {
        for y in 0..self.height {
            for x in 0..self.width {
                let edge_dist = x
                    .min(y)
                    .min(self.width - 1 - x)
                    .min(self.height - 1 - y);
                let band = 2 + self.rng.gen_range(0..2);
                if edge_dist < band {
                    tiles.set(x, y, TerrainType::Mountain);
                }
            }
        }
    }

    /// Towns sit on grassland adjacent to water, with hills (mining) and
    /// forest (lumber) within range, spaced apart; each town gets a few
    /// vassal villages nearby.
    fn place_towns(&mut self, tiles: &Tilemap<TerrainType>) -> Vec<Settlement> {
        let mut candidates: Vec<(usize, usize)> = Vec::new();
        for (x, y, t) in tiles.iter() {
            if *t == TerrainType::Grassland
                && tiles
                    .neighbors_8(x, y)
                    .into_iter()
                    .any(|(nx, ny)| tiles.get(nx, ny).is_water())
            {
                candidates.push((x, y));
            }
        }
        candidates.shuffle(&mut self.rng);

        let target = (self.width * self.height / 65_000).max(3);
        let mut town_names: Vec<&str> = TOWN_NAMES.to_vec();
        town_names.shuffle(&mut self.rng);
        let mut village_names: Vec<&str> = VILLAGE_NAMES.to_vec();
        village_names.shuffle(&mut self.rng);

        let mut settlements: Vec<Settlement> = Vec::new();
        let mut towns_placed = 0usize;

        for (x, y) in candidates {
            if towns_placed >= target {
                break;
            }
            let too_close = settlements
                .iter()
                .filter(|s| s.kind == SettlementKind::Town)
                .any(|s| dist_sq(s.x, s.y, x as i32, y as i32) < MIN_TOWN_DISTANCE.pow(2));
            if too_close {
                continue;
            }
            if !has_resources_nearby(tiles, x as i32, y as i32) {
                continue;
            }

            let town_id = SettlementId(settlements.len());
            settlements.push(Settlement {
                id: town_id,
                kind: SettlementKind::Town,
                x: x as i32,
                y: y as i32,
                name: next_name(&mut town_names, "Town", towns_placed),
                liege: None,
            });
            towns_placed += 1;

            let village_count = self.rng.gen_range(2..=4);
            let mut placed = 0;
            for _ in 0..30 {
                if placed >= village_count {
                    break;
                }
                let vx = x as i32 + self.rng.gen_range(-12..=12);
                let vy = y as i32 + self.rng.gen_range(-12..=12);
                if !tiles.in_bounds(vx, vy) {
                    continue;
                }
                if !tiles.get(vx as usize, vy as usize).is_passable() {
                    continue;
                }
                if settlements.iter().any(|s| s.x == vx && s.y == vy) {
                    continue;
                }
                let village_id = SettlementId(settlements.len());
                settlements.push(Settlement {
                    id: village_id,
                    kind: SettlementKind::Village,
                    x: vx,
                    y: vy,
                    name: next_name(&mut village_names, "Village", village_id.0),
                    liege: Some(town_id),
                });
                placed += 1;
            }
        }

        settlements
    }

    /// Cities claim coastal grassland and take nearby towns as vassals.
    fn place_cities(&mut self, tiles: &Tilemap<TerrainType>, settlements: &mut Vec<Settlement>) {
        let mut candidates: Vec<(usize, usize)> = Vec::new();
        for (x, y, t) in tiles.iter() {
            if *t == TerrainType::Grassland
                && tiles
                    .neighbors_8(x, y)
                    .into_iter()
                    .any(|(nx, ny)| *tiles.get(nx, ny) == TerrainType::ShallowWater)
            {
                candidates.push((x, y));
            }
        }
        candidates.shuffle(&mut self.rng);

        let target = (self.width * self.height / 500_000).max(1);
        let mut city_names: Vec<&str> = CITY_NAMES.to_vec();
        city_names.shuffle(&mut self.rng);
        let mut cities_placed = 0usize;

        for (x, y) in candidates {
            if cities_placed >= target {
                break;
            }
            let (cx, cy) = (x as i32, y as i32);
            if settlements.iter().any(|s| s.x == cx && s.y == cy) {
                continue;
            }
            let too_close = settlements
                .iter()
                .filter(|s| s.kind == SettlementKind::City)
                .any(|s| dist_sq(s.x, s.y, cx, cy) < MIN_CITY_DISTANCE.pow(2));
            if too_close {
                continue;
            }

            let city_id = SettlementId(settlements.len());
            settlements.push(Settlement {
                id: city_id,
                kind: SettlementKind::City,
                x: cx,
                y: cy,
                name: next_name(&mut city_names, "City", cities_placed),
                liege: None,
            });
            cities_placed += 1;

            // Nearby liege-less towns swear to the new city.
            for s in settlements.iter_mut() {
                if s.kind == SettlementKind::Town
                    && s.liege.is_none()
                    && dist_sq(s.x, s.y, cx, cy) <= CITY_CLAIM_RANGE.pow(2)
                {
                    s.liege = Some(city_id);
                }
            }
        }
    }
}

fn dist_sq(ax: i32, ay: i32, bx: i32, by: i32) -> i64 {
    let dx = (ax - bx) as i64;
    let dy = (ay - by) as i64;
    dx * dx + dy * dy
}

fn next_name(pool: &mut Vec<&str>, kind: &str, index: usize) -> String {
    pool.pop()
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("{} {}", kind, index + 1))
}

/// Majority filter pass: lone water tiles surrounded by land become
/// grassland and lone land tiles surrounded by water flood, which knocks
/// the single-tile noise off the coastlines.
fn smooth_coastlines(tiles: &mut Tilemap<TerrainType>) {
    let snapshot = tiles.clone();
    for (x, y, t) in snapshot.iter() {
        let neighbors = snapshot.neighbors_8(x, y);
        if neighbors.len() < 8 {
            continue;
        }
        let water_neighbors = neighbors
            .iter()
            .filter(|&&(nx, ny)| snapshot.get(nx, ny).is_water())
            .count();
        if t.is_water() && water_neighbors <= 2 {
            tiles.set(x, y, TerrainType::Grassland);
        } else if !t.is_water() && water_neighbors >= 6 {
            tiles.set(x, y, TerrainType::ShallowWater);
        }
    }
}

/// Multi-source BFS distance from any water tile, capped at `range`.
/// Water tiles themselves and tiles beyond range are -1.
fn water_distance_map(tiles: &Tilemap<TerrainType>, range: i32) -> Tilemap<i32> {
    let mut distance = Tilemap::new_with(tiles.width, tiles.height, -1i32);
    let mut queue = VecDeque::new();

    for (x, y, t) in tiles.iter() {
        if t.is_water() {
            distance.set(x, y, 0);
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let d = *distance.get(x, y);
        if d >= range {
            continue;
        }
        for (nx, ny) in tiles.neighbors_8(x, y) {
            if *distance.get(nx, ny) < 0 {
                distance.set(nx, ny, d + 1);
                queue.push_back((nx, ny));
            }
        }
    }

    // Water itself carries no forest chance.
    for (x, y, t) in tiles.iter() {
        if t.is_water() {
            distance.set(x, y, -1);
        }
    }
    distance
}

/// Towns need hills (mining) and forest (lumber) within Manhattan range.
fn has_resources_nearby(tiles: &Tilemap<TerrainType>, x: i32, y: i32) -> bool {
    let mut has_mining = false;
    let mut has_lumber = false;
    for dy in -RESOURCE_RANGE..=RESOURCE_RANGE {
        for dx in -RESOURCE_RANGE..=RESOURCE_RANGE {
            if dx.abs() + dy.abs() > RESOURCE_RANGE {
                continue;
            }
            let (nx, ny) = (x + dx, y + dy);
            if !tiles.in_bounds(nx, ny) {
                continue;
            }
            match tiles.get(nx as usize, ny as usize) {
                TerrainType::Hills => has_mining = true,
                TerrainType::Forest | TerrainType::ForestedHill => has_lumber = true,
                _ => {}
            }
            if has_mining && has_lumber {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NullSink, RecordingSink};

    fn small_config(seed: u64) -> MapConfig {
        MapConfig {
            width: 96,
            height: 64,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_progress_is_monotone_and_completes() {
        let mut sink = RecordingSink::new();
        let mut generator = MapGenerator::new(&small_config(7));
        let map = generator.generate(&mut sink);

        assert_eq!(map.width, 96);
        assert_eq!(map.height, 64);
        assert!(!sink.reports.is_empty());
        let mut last = 0.0f32;
        for (fraction, _) in &sink.reports {
            assert!(*fraction >= 0.0 && *fraction <= 1.0);
            assert!(
                *fraction >= last,
                "fraction went backwards: {} after {}",
                fraction,
                last
            );
            last = *fraction;
        }
        assert_eq!(sink.reports.last().unwrap().0, 1.0);
    }

    #[test]
    fn test_same_seed_same_map() {
        let mut a = MapGenerator::new(&small_config(42));
        let mut b = MapGenerator::new(&small_config(42));
        let map_a = a.generate(&mut NullSink);
        let map_b = b.generate(&mut NullSink);

        assert_eq!(map_a.seed, map_b.seed);
        for (x, y, t) in map_a.tiles.iter() {
            assert_eq!(t, map_b.tiles.get(x, y));
        }
        assert_eq!(map_a.settlements.len(), map_b.settlements.len());
    }

    #[test]
    fn test_generated_settlements_are_valid() {
        let mut generator = MapGenerator::new(&small_config(3));
        let map = generator.generate(&mut NullSink);

        for s in &map.settlements {
            assert!(map.tiles.in_bounds(s.x, s.y));
            assert!(map.tiles.get(s.x as usize, s.y as usize).is_passable());
            match s.kind {
                SettlementKind::Village => {
                    let liege = s.liege.expect("village without a town");
                    assert_eq!(map.settlement(liege).unwrap().kind, SettlementKind::Town);
                }
                SettlementKind::Town => {
                    if let Some(liege) = s.liege {
                        assert_eq!(map.settlement(liege).unwrap().kind, SettlementKind::City);
                    }
                }
                SettlementKind::City => assert!(s.liege.is_none()),
            }
        }
    }

    #[test]
    fn test_border_is_mountains() {
        let mut generator = MapGenerator::new(&small_config(11));
        let map = generator.generate(&mut NullSink);
        for x in 0..map.width {
            assert_eq!(*map.tiles.get(x, 0), TerrainType::Mountain);
            assert_eq!(*map.tiles.get(x, map.height - 1), TerrainType::Mountain);
        }
        for y in 0..map.height {
            assert_eq!(*map.tiles.get(0, y), TerrainType::Mountain);
            assert_eq!(*map.tiles.get(map.width - 1, y), TerrainType::Mountain);
        }
    }

    #[test]
    fn test_towns_place_on_handcrafted_map() {
        // Grassland plain split by a water column, with hills and forest
        // in range: towns must find it.
        let mut tiles = Tilemap::new_with(80, 60, TerrainType::Grassland);
        for y in 0..60 {
            tiles.set(40, y, TerrainType::ShallowWater);
        }
        for y in 20..30 {
            for x in 30..35 {
                tiles.set(x, y, TerrainType::Hills);
            }
            for x in 46..51 {
                tiles.set(x, y, TerrainType::Forest);
            }
        }

        let mut generator = MapGenerator::new(&MapConfig {
            width: 80,
            height: 60,
            seed: Some(1),
        });
        let settlements = generator.place_towns(&tiles);

        let towns: Vec<_> = settlements
            .iter()
            .filter(|s| s.kind == SettlementKind::Town)
            .collect();
        assert!(!towns.is_empty());
        for town in &towns {
            assert_eq!(
                *tiles.get(town.x as usize, town.y as usize),
                TerrainType::Grassland
            );
        }
        for village in settlements.iter().filter(|s| s.kind == SettlementKind::Village) {
            let liege = village.liege.expect("village without a town");
            assert_eq!(settlements[liege.0].kind, SettlementKind::Town);
        }
    }

    #[test]
    fn test_cities_claim_nearby_towns() {
        let mut tiles = Tilemap::new_with(80, 60, TerrainType::Grassland);
        for y in 0..60 {
            tiles.set(40, y, TerrainType::ShallowWater);
        }
        for y in 20..30 {
            for x in 30..35 {
                tiles.set(x, y, TerrainType::Hills);
            }
            for x in 46..51 {
                tiles.set(x, y, TerrainType::Forest);
            }
        }

        let mut generator = MapGenerator::new(&MapConfig {
            width: 80,
            height: 60,
            seed: Some(9),
        });
        let mut settlements = generator.place_towns(&tiles);
        generator.place_cities(&tiles, &mut settlements);

        let cities: Vec<_> = settlements
            .iter()
            .filter(|s| s.kind == SettlementKind::City)
            .collect();
        assert!(!cities.is_empty());
        // Every town on this small map is within claim range of a city.
        for town in settlements.iter().filter(|s| s.kind == SettlementKind::Town) {
            let liege = town.liege.expect("town left unclaimed");
            assert_eq!(settlements[liege.0].kind, SettlementKind::City);
        }
    }
}
