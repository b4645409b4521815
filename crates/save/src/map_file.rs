//! The JSON map format: a flat row-major list of tagged cell records.
//!
//! Ground cells store their sprite-sheet triple directly; building cells
//! store the archetype name plus the cell's offset inside the footprint,
//! so the grid and the building registry can both be rebuilt from one
//! document. `building_part_with_bg` additionally carries the ground
//! tile drawn behind a transparent building sprite.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use simulation::buildings::{stamp_tile, BuildingRegistry, PlacedBuilding};
use simulation::catalog::{ArchetypeCatalog, ArchetypeKind, TileRef};
use simulation::grid::{CityGrid, TileType};

use crate::save_error::SaveError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellRecord {
    Tile {
        /// `[sheet_name, tile_x, tile_y]` in the document.
        data: TileRef,
    },
    BuildingPart {
        building_name: String,
        offset_x: u32,
        offset_y: u32,
    },
    BuildingPartWithBg {
        building_name: String,
        offset_x: u32,
        offset_y: u32,
        bg: TileRef,
    },
}

/// A complete serialized map. `map_data` is row-major, `width * height`
/// records long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFile {
    pub width: usize,
    pub height: usize,
    pub map_data: Vec<CellRecord>,
}

impl MapFile {
    /// Serialize the finished grid and building registry.
    pub fn encode(
        grid: &CityGrid,
        registry: &BuildingRegistry,
        catalog: &ArchetypeCatalog,
    ) -> Result<MapFile, SaveError> {
        // Cell -> covering building index, built once up front.
        let mut coverage: HashMap<(usize, usize), usize> = HashMap::new();
        for (i, building) in registry.buildings.iter().enumerate() {
            for y in building.origin.1..building.origin.1 + building.size.1 {
                for x in building.origin.0..building.origin.0 + building.size.0 {
                    coverage.insert((x, y), i);
                }
            }
        }

        let mut map_data = Vec::with_capacity(grid.width * grid.height);
        for y in 0..grid.height {
            for x in 0..grid.width {
                if let Some(&i) = coverage.get(&(x, y)) {
                    let building = &registry.buildings[i];
                    let building_name = building.name.clone();
                    let offset_x = (x - building.origin.0) as u32;
                    let offset_y = (y - building.origin.1) as u32;
                    map_data.push(match &building.background {
                        Some(bg) => CellRecord::BuildingPartWithBg {
                            building_name,
                            offset_x,
                            offset_y,
                            bg: bg.clone(),
                        },
                        None => CellRecord::BuildingPart {
                            building_name,
                            offset_x,
                            offset_y,
                        },
                    });
                } else {
                    let name = grid.get(x, y).catalog_name();
                    let data = catalog
                        .entry(name)
                        .and_then(|e| e.tile.clone())
                        .ok_or_else(|| SaveError::UnknownArchetype(name.to_string()))?;
                    map_data.push(CellRecord::Tile { data });
                }
            }
        }
        Ok(MapFile {
            width: grid.width,
            height: grid.height,
            map_data,
        })
    }

    /// Rebuild the grid and registry. Buildings come back ordered by
    /// origin, row-major.
    pub fn decode(
        &self,
        catalog: &ArchetypeCatalog,
    ) -> Result<(CityGrid, BuildingRegistry), SaveError> {
        let expected = self.width * self.height;
        if self.map_data.len() != expected {
            return Err(SaveError::ShapeMismatch {
                expected,
                found: self.map_data.len(),
            });
        }

        // Sheet triple -> TileType, inverted from the catalog.
        let mut tile_lookup: HashMap<TileRef, TileType> = HashMap::new();
        for (name, entry) in &catalog.unique_items {
            if entry.kind == ArchetypeKind::Tile {
                if let (Some(triple), Some(tile)) =
                    (entry.tile.clone(), TileType::from_catalog_name(name))
                {
                    tile_lookup.insert(triple, tile);
                }
            }
        }

        let mut grid = CityGrid::new(self.width, self.height);
        let mut registry = BuildingRegistry::default();
        // Background triples keyed by building origin; attached after the
        // sweep since a bg may first appear on a non-origin cell.
        let mut backgrounds: HashMap<(usize, usize), TileRef> = HashMap::new();
        for (i, record) in self.map_data.iter().enumerate() {
            let (x, y) = (i % self.width, i / self.width);
            let (building_name, offset_x, offset_y, bg) = match record {
                CellRecord::Tile { data } => {
                    let tile = tile_lookup.get(data).copied().ok_or_else(|| {
                        SaveError::UnknownArchetype(format!(
                            "{}:{},{}",
                            data.0, data.1, data.2
                        ))
                    })?;
                    grid.set(x, y, tile);
                    continue;
                }
                CellRecord::BuildingPart {
                    building_name,
                    offset_x,
                    offset_y,
                } => (building_name, *offset_x, *offset_y, None),
                CellRecord::BuildingPartWithBg {
                    building_name,
                    offset_x,
                    offset_y,
                    bg,
                } => (building_name, *offset_x, *offset_y, Some(bg.clone())),
            };
            let tile = stamp_tile(building_name);
            grid.set(x, y, tile);
            if let Some(bg) = bg {
                let origin = (
                    x.checked_sub(offset_x as usize),
                    y.checked_sub(offset_y as usize),
                );
                if let (Some(ox), Some(oy)) = origin {
                    backgrounds.insert((ox, oy), bg);
                }
            }
            if offset_x == 0 && offset_y == 0 {
                let size = catalog
                    .footprint(building_name)
                    .ok_or_else(|| SaveError::UnknownArchetype(building_name.clone()))?;
                registry.buildings.push(PlacedBuilding {
                    name: building_name.clone(),
                    origin: (x, y),
                    size,
                    tile,
                    background: None,
                });
            }
        }
        for building in &mut registry.buildings {
            building.background = backgrounds.remove(&building.origin);
        }
        Ok((grid, registry))
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<MapFile, SaveError> {
        serde_json::from_str(json).map_err(|e| SaveError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_city() -> (CityGrid, BuildingRegistry, ArchetypeCatalog) {
        let catalog = ArchetypeCatalog::default();
        let mut grid = CityGrid::new(16, 16);
        let mut registry = BuildingRegistry::default();
        for x in 0..16 {
            grid.set(x, 5, TileType::Road);
            grid.set(x, 4, TileType::Sidewalk);
        }
        for (name, origin) in [("house", (2, 8)), ("grocery_store", (8, 8))] {
            let size = catalog.footprint(name).unwrap();
            let tile = stamp_tile(name);
            for y in origin.1..origin.1 + size.1 {
                for x in origin.0..origin.0 + size.0 {
                    grid.set(x, y, tile);
                }
            }
            registry.buildings.push(PlacedBuilding {
                name: name.to_string(),
                origin,
                size,
                tile,
                background: None,
            });
        }
        (grid, registry, catalog)
    }

    #[test]
    fn test_roundtrip_is_lossless() {
        let (grid, registry, catalog) = small_city();
        let map = MapFile::encode(&grid, &registry, &catalog).unwrap();
        let json = map.to_json().unwrap();
        let parsed = MapFile::from_json(&json).unwrap();
        assert_eq!(parsed, map);

        let (grid2, registry2) = parsed.decode(&catalog).unwrap();
        assert_eq!(grid2.tiles, grid.tiles);
        let mut original = registry.buildings.clone();
        original.sort_by_key(|b| (b.origin.1, b.origin.0));
        assert_eq!(registry2.buildings, original);
    }

    #[test]
    fn test_building_cells_carry_offsets() {
        let (grid, registry, catalog) = small_city();
        let map = MapFile::encode(&grid, &registry, &catalog).unwrap();
        let record = &map.map_data[9 * 16 + 3]; // inside the house at (2,8)
        match record {
            CellRecord::BuildingPart {
                building_name,
                offset_x,
                offset_y,
            } => {
                assert_eq!(building_name, "house");
                assert_eq!((*offset_x, *offset_y), (1, 1));
            }
            other => panic!("expected building part, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let map = MapFile {
            width: 8,
            height: 8,
            map_data: vec![CellRecord::Tile {
                data: ("ground".into(), 0, 0),
            }],
        };
        let catalog = ArchetypeCatalog::default();
        assert!(matches!(
            map.decode(&catalog),
            Err(SaveError::ShapeMismatch { expected: 64, found: 1 })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_tile() {
        let map = MapFile {
            width: 1,
            height: 1,
            map_data: vec![CellRecord::Tile {
                data: ("lava".into(), 9, 9),
            }],
        };
        let catalog = ArchetypeCatalog::default();
        assert!(matches!(
            map.decode(&catalog),
            Err(SaveError::UnknownArchetype(_))
        ));
    }

    #[test]
    fn test_parses_tagged_record_shape() {
        // The exact document shape the map editor emits: tile records
        // carry a [sheet, tx, ty] array under "data".
        let json = r#"{
            "width": 1,
            "height": 2,
            "map_data": [
                { "type": "tile", "data": ["ground", 0, 0] },
                {
                    "type": "building_part_with_bg",
                    "building_name": "house",
                    "offset_x": 0,
                    "offset_y": 0,
                    "bg": ["ground", 0, 0]
                }
            ]
        }"#;
        let map = MapFile::from_json(json).unwrap();
        let catalog = ArchetypeCatalog::default();
        let (grid, registry) = map.decode(&catalog).unwrap();
        assert_eq!(grid.get(0, 0), TileType::Grass);
        assert_eq!(grid.get(0, 1), TileType::House);
        assert_eq!(registry.buildings.len(), 1);
        assert_eq!(registry.buildings[0].origin, (0, 1));
        assert_eq!(
            registry.buildings[0].background,
            Some(("ground".to_string(), 0, 0))
        );
    }

    #[test]
    fn test_tile_record_serializes_as_data_array() {
        let record = CellRecord::Tile {
            data: ("ground".into(), 2, 3),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":"tile","data":["ground",2,3]}"#);
    }

    #[test]
    fn test_background_triple_survives_roundtrip() {
        let catalog = ArchetypeCatalog::default();
        let mut grid = CityGrid::new(4, 4);
        let mut registry = BuildingRegistry::default();
        let bg = ("ground".to_string(), 0, 0);
        let size = catalog.footprint("house").unwrap();
        let tile = stamp_tile("house");
        for y in 0..size.1 {
            for x in 0..size.0 {
                grid.set(x, y, tile);
            }
        }
        registry.buildings.push(PlacedBuilding {
            name: "house".into(),
            origin: (0, 0),
            size,
            tile,
            background: Some(bg.clone()),
        });

        let map = MapFile::encode(&grid, &registry, &catalog).unwrap();
        assert!(matches!(
            &map.map_data[0],
            CellRecord::BuildingPartWithBg { bg: b, .. } if *b == bg
        ));

        let (grid2, registry2) = map.decode(&catalog).unwrap();
        assert_eq!(registry2.buildings[0].background, Some(bg));
        let remap = MapFile::encode(&grid2, &registry2, &catalog).unwrap();
        assert_eq!(remap, map);
    }
}
