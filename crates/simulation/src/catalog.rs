//! Archetype catalog: the `unique_items` JSON document mapping every
//! placeable archetype to its visual footprint. The `size` field is
//! authoritative for collision/occupancy; the placer and the renderer
//! both consume the same document so they can never disagree about
//! footprints.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A single tile reference: (sheet name, tile x, tile y).
pub type TileRef = (String, u32, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeKind {
    Tile,
    Building,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeEntry {
    #[serde(rename = "type")]
    pub kind: ArchetypeKind,
    /// Single-tile archetypes reference one sheet tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<TileRef>,
    /// Building archetypes reference one sheet tile per footprint cell,
    /// row-major.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<TileRef>>,
    /// Footprint in cells, `[width, height]`. Authoritative for occupancy.
    pub size: [usize; 2],
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    pub unique_items: BTreeMap<String, ArchetypeEntry>,
}

impl ArchetypeCatalog {
    pub fn entry(&self, name: &str) -> Option<&ArchetypeEntry> {
        self.unique_items.get(name)
    }

    /// Footprint size for an archetype, `(width, height)`.
    pub fn footprint(&self, name: &str) -> Option<(usize, usize)> {
        self.entry(name).map(|e| (e.size[0], e.size[1]))
    }

    pub fn is_building(&self, name: &str) -> bool {
        self.entry(name)
            .map(|e| e.kind == ArchetypeKind::Building)
            .unwrap_or(false)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn tile_entry(sheet: &str, tx: u32, ty: u32) -> ArchetypeEntry {
    ArchetypeEntry {
        kind: ArchetypeKind::Tile,
        tile: Some((sheet.to_string(), tx, ty)),
        tiles: None,
        size: [1, 1],
    }
}

fn building_entry(base_tx: u32, base_ty: u32, width: usize, height: usize) -> ArchetypeEntry {
    let mut tiles = Vec::with_capacity(width * height);
    for dy in 0..height {
        for dx in 0..width {
            tiles.push(("buildings".to_string(), base_tx + dx as u32, base_ty + dy as u32));
        }
    }
    ArchetypeEntry {
        kind: ArchetypeKind::Building,
        tile: None,
        tiles: Some(tiles),
        size: [width, height],
    }
}

impl Default for ArchetypeCatalog {
    /// Built-in catalog covering every archetype the generator can place.
    /// Building names carry the role keywords the location binder matches
    /// on (school, pizza, apartment, office, grocery, ...).
    fn default() -> Self {
        let mut items = BTreeMap::new();

        items.insert("grass".into(), tile_entry("ground", 0, 0));
        items.insert("road".into(), tile_entry("ground", 1, 0));
        items.insert("sidewalk".into(), tile_entry("ground", 2, 0));
        items.insert("water".into(), tile_entry("ground", 3, 0));
        items.insert("deep_water".into(), tile_entry("ground", 4, 0));
        items.insert("dirt".into(), tile_entry("ground", 5, 0));
        items.insert("sand".into(), tile_entry("ground", 6, 0));
        items.insert("tree".into(), tile_entry("ground", 0, 1));
        items.insert("rock".into(), tile_entry("ground", 1, 1));

        items.insert("house".into(), building_entry(0, 0, 2, 2));
        items.insert("house_large".into(), building_entry(2, 0, 3, 2));
        items.insert("apartment_building".into(), building_entry(5, 0, 3, 3));
        items.insert("store".into(), building_entry(8, 0, 2, 2));
        items.insert("grocery_store".into(), building_entry(10, 0, 3, 2));
        items.insert("pizza_shop".into(), building_entry(13, 0, 2, 2));
        items.insert("school".into(), building_entry(0, 4, 4, 3));
        items.insert("office_building".into(), building_entry(4, 4, 3, 3));
        items.insert("bank".into(), building_entry(7, 4, 3, 3));
        items.insert("skyscraper".into(), building_entry(10, 4, 3, 3));
        items.insert("skyscraper_small".into(), building_entry(13, 4, 2, 2));
        items.insert("skyscraper_large".into(), building_entry(0, 8, 4, 4));

        Self { unique_items: items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_placeable_archetypes() {
        let catalog = ArchetypeCatalog::default();
        for name in [
            "house",
            "house_large",
            "apartment_building",
            "store",
            "grocery_store",
            "pizza_shop",
            "school",
            "office_building",
            "bank",
            "skyscraper",
            "skyscraper_small",
            "skyscraper_large",
        ] {
            assert!(catalog.is_building(name), "{name} missing or not a building");
            let (w, h) = catalog.footprint(name).unwrap();
            assert!(w >= 1 && h >= 1);
            let entry = catalog.entry(name).unwrap();
            assert_eq!(entry.tiles.as_ref().unwrap().len(), w * h);
        }
    }

    #[test]
    fn test_tile_entries_are_single_cell() {
        let catalog = ArchetypeCatalog::default();
        for name in ["grass", "road", "sidewalk", "water", "tree"] {
            assert_eq!(catalog.footprint(name), Some((1, 1)));
            assert!(!catalog.is_building(name));
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let catalog = ArchetypeCatalog::default();
        let json = catalog.to_json_string().unwrap();
        let parsed = ArchetypeCatalog::from_json_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_parses_external_document_shape() {
        let json = r#"{
            "unique_items": {
                "grass": { "type": "tile", "tile": ["ground", 0, 0], "size": [1, 1] },
                "school": {
                    "type": "building",
                    "tiles": [["buildings", 0, 4], ["buildings", 1, 4]],
                    "size": [2, 1]
                }
            }
        }"#;
        let catalog = ArchetypeCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.footprint("school"), Some((2, 1)));
        assert!(catalog.is_building("school"));
        assert!(!catalog.is_building("grass"));
    }

    #[test]
    fn test_unknown_archetype() {
        let catalog = ArchetypeCatalog::default();
        assert_eq!(catalog.footprint("cathedral"), None);
    }
}
