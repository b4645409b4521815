use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::CELL_SIZE;

/// One visual/logical tile class per cell. Immutable once generation
/// finishes; rendering consumes it read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    #[default]
    Grass,
    Road,
    Sidewalk,
    Water,
    DeepWater,
    Dirt,
    Sand,
    Tree,
    Rock,
    House,
    Bank,
    Building,
    Skyscraper,
    Store,
}

impl TileType {
    /// Whether this tile is part of a building footprint.
    pub fn is_building(self) -> bool {
        matches!(
            self,
            TileType::House
                | TileType::Bank
                | TileType::Building
                | TileType::Skyscraper
                | TileType::Store
        )
    }

    /// Whether the player can walk on this tile.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            TileType::Grass
                | TileType::Road
                | TileType::Sidewalk
                | TileType::Dirt
                | TileType::Sand
        )
    }

    /// Stable name used as a key into the archetype catalog and the
    /// JSON map format.
    pub fn catalog_name(self) -> &'static str {
        match self {
            TileType::Grass => "grass",
            TileType::Road => "road",
            TileType::Sidewalk => "sidewalk",
            TileType::Water => "water",
            TileType::DeepWater => "deep_water",
            TileType::Dirt => "dirt",
            TileType::Sand => "sand",
            TileType::Tree => "tree",
            TileType::Rock => "rock",
            TileType::House => "house",
            TileType::Bank => "bank",
            TileType::Building => "building",
            TileType::Skyscraper => "skyscraper",
            TileType::Store => "store",
        }
    }

    /// Inverse of [`catalog_name`](Self::catalog_name).
    pub fn from_catalog_name(name: &str) -> Option<TileType> {
        Some(match name {
            "grass" => TileType::Grass,
            "road" => TileType::Road,
            "sidewalk" => TileType::Sidewalk,
            "water" => TileType::Water,
            "deep_water" => TileType::DeepWater,
            "dirt" => TileType::Dirt,
            "sand" => TileType::Sand,
            "tree" => TileType::Tree,
            "rock" => TileType::Rock,
            "house" => TileType::House,
            "bank" => TileType::Bank,
            "building" => TileType::Building,
            "skyscraper" => TileType::Skyscraper,
            "store" => TileType::Store,
            _ => return None,
        })
    }
}

/// The finished tile grid. Mutated only by the generation pipeline,
/// read-only afterward.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CityGrid {
    pub tiles: Vec<TileType>,
    pub width: usize,
    pub height: usize,
}

impl CityGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            tiles: vec![TileType::Grass; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> TileType {
        self.tiles[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: TileType) {
        let idx = self.index(x, y);
        self.tiles[idx] = tile;
    }

    /// Exact map center in tile coordinates.
    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Euclidean distance from a cell to the map center, in cells.
    pub fn distance_to_center(&self, x: usize, y: usize) -> f32 {
        let (cx, cy) = self.center();
        let dx = x as f32 - cx as f32;
        let dy = y as f32 - cy as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn world_to_grid(world_x: f32, world_y: f32) -> (i32, i32) {
        let gx = (world_x / CELL_SIZE).floor() as i32;
        let gy = (world_y / CELL_SIZE).floor() as i32;
        (gx, gy)
    }

    pub fn grid_to_world(gx: usize, gy: usize) -> (f32, f32) {
        let wx = gx as f32 * CELL_SIZE + CELL_SIZE * 0.5;
        let wy = gy as f32 * CELL_SIZE + CELL_SIZE * 0.5;
        (wx, wy)
    }

    /// Returns up to 4 cardinal neighbors and the count of valid entries.
    /// Use `&result[..count]` to iterate over valid neighbors.
    pub fn neighbors4(&self, x: usize, y: usize) -> ([(usize, usize); 4], usize) {
        let mut result = [(0, 0); 4];
        let mut count = 0;
        if x > 0 {
            result[count] = (x - 1, y);
            count += 1;
        }
        if x + 1 < self.width {
            result[count] = (x + 1, y);
            count += 1;
        }
        if y > 0 {
            result[count] = (x, y - 1);
            count += 1;
        }
        if y + 1 < self.height {
            result[count] = (x, y + 1);
            count += 1;
        }
        (result, count)
    }
}

/// Cells already claimed by a road or building footprint. Owned
/// exclusively by the generation pipeline and discarded afterward.
#[derive(Clone)]
pub struct OccupancyGrid {
    pub cells: Vec<bool>,
    pub width: usize,
    pub height: usize,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![false; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) {
        self.cells[y * self.width + x] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GRID_HEIGHT, GRID_WIDTH};

    #[test]
    fn test_grid_coord_roundtrip() {
        let grid = CityGrid::new(GRID_WIDTH, GRID_HEIGHT);
        for gx in [0, 13, 32, 63] {
            for gy in [0, 13, 32, 63] {
                let (wx, wy) = CityGrid::grid_to_world(gx, gy);
                let (rx, ry) = CityGrid::world_to_grid(wx, wy);
                assert_eq!((rx as usize, ry as usize), (gx, gy));
                assert!(grid.in_bounds(gx, gy));
            }
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = CityGrid::new(GRID_WIDTH, GRID_HEIGHT);
        assert!(!grid.in_bounds(GRID_WIDTH, 0));
        assert!(!grid.in_bounds(0, GRID_HEIGHT));
    }

    #[test]
    fn test_neighbors() {
        let grid = CityGrid::new(GRID_WIDTH, GRID_HEIGHT);
        assert_eq!(grid.neighbors4(0, 0).1, 2);
        assert_eq!(grid.neighbors4(32, 32).1, 4);
        assert_eq!(grid.neighbors4(63, 63).1, 2);
    }

    #[test]
    fn test_catalog_name_roundtrip() {
        for tile in [
            TileType::Grass,
            TileType::Road,
            TileType::Sidewalk,
            TileType::Water,
            TileType::DeepWater,
            TileType::Dirt,
            TileType::Sand,
            TileType::Tree,
            TileType::Rock,
            TileType::House,
            TileType::Bank,
            TileType::Building,
            TileType::Skyscraper,
            TileType::Store,
        ] {
            assert_eq!(TileType::from_catalog_name(tile.catalog_name()), Some(tile));
        }
        assert_eq!(TileType::from_catalog_name("lava"), None);
    }

    #[test]
    fn test_occupancy_mark() {
        let mut occ = OccupancyGrid::new(8, 8);
        assert!(!occ.is_occupied(3, 4));
        occ.mark(3, 4);
        assert!(occ.is_occupied(3, 4));
        assert!(!occ.is_occupied(4, 3));
    }
}
