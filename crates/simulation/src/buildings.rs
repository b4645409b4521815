//! Placed-building registry and narrative role classification.
//!
//! The generator records every stamped footprint here; location binding
//! classifies each building into a narrative role by substring match on
//! its archetype name, with a fallback hierarchy so a missing role never
//! halts play.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::TileRef;
use crate::grid::TileType;

/// One stamped building footprint. Written atomically: a footprint is
/// either placed completely or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBuilding {
    /// Archetype catalog key (e.g. "grocery_store").
    pub name: String,
    pub origin: (usize, usize),
    pub size: (usize, usize),
    pub tile: TileType,
    /// Ground tile drawn behind a transparent building sprite, carried
    /// through from editor-authored map documents. `None` for
    /// generator-placed buildings.
    pub background: Option<TileRef>,
}

impl PlacedBuilding {
    pub fn covers(&self, x: usize, y: usize) -> bool {
        x >= self.origin.0
            && x < self.origin.0 + self.size.0
            && y >= self.origin.1
            && y < self.origin.1 + self.size.1
    }
}

/// All buildings placed by the generator, in placement order. Read-only
/// after generation; consumed by location binding and the map save.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingRegistry {
    pub buildings: Vec<PlacedBuilding>,
}

impl BuildingRegistry {
    pub fn building_at(&self, x: usize, y: usize) -> Option<&PlacedBuilding> {
        self.buildings.iter().find(|b| b.covers(x, y))
    }
}

/// Tile class stamped into the grid for an archetype name.
pub fn stamp_tile(name: &str) -> TileType {
    if name.contains("skyscraper") {
        TileType::Skyscraper
    } else if name.contains("bank") {
        TileType::Bank
    } else if name.contains("house") || name.contains("apartment") {
        TileType::House
    } else if name.contains("store") || name.contains("shop") || name.contains("grocery") {
        TileType::Store
    } else {
        TileType::Building
    }
}

/// Narrative role buckets used by objective location binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingRole {
    School,
    Pizza,
    Apartment,
    Office,
    Grocery,
    House,
    Bank,
    Store,
    Building,
}

impl BuildingRole {
    /// Classification order. Specific roles first so e.g.
    /// "grocery_store" lands in Grocery, not Store.
    pub const ALL: &'static [BuildingRole] = &[
        BuildingRole::School,
        BuildingRole::Pizza,
        BuildingRole::Apartment,
        BuildingRole::Office,
        BuildingRole::Grocery,
        BuildingRole::House,
        BuildingRole::Bank,
        BuildingRole::Store,
        BuildingRole::Building,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            BuildingRole::School => "school",
            BuildingRole::Pizza => "pizza",
            BuildingRole::Apartment => "apartment",
            BuildingRole::Office => "office",
            BuildingRole::Grocery => "grocery",
            BuildingRole::House => "house",
            BuildingRole::Bank => "bank",
            BuildingRole::Store => "store",
            BuildingRole::Building => "building",
        }
    }

    /// Classify an archetype name into a role bucket.
    pub fn classify(name: &str) -> Option<BuildingRole> {
        BuildingRole::ALL
            .iter()
            .copied()
            .find(|role| name.contains(role.keyword()))
    }

    /// Degradation order when no building of this role exists on the
    /// map: thematically-close roles first, generic categories last.
    pub fn fallbacks(self) -> &'static [BuildingRole] {
        match self {
            BuildingRole::School => &[
                BuildingRole::School,
                BuildingRole::Building,
                BuildingRole::Bank,
                BuildingRole::Office,
            ],
            BuildingRole::Pizza => &[
                BuildingRole::Pizza,
                BuildingRole::Store,
                BuildingRole::Grocery,
                BuildingRole::Building,
            ],
            BuildingRole::Apartment => &[
                BuildingRole::Apartment,
                BuildingRole::House,
                BuildingRole::Building,
            ],
            BuildingRole::Office => &[
                BuildingRole::Office,
                BuildingRole::Building,
                BuildingRole::Bank,
            ],
            BuildingRole::Grocery => &[
                BuildingRole::Grocery,
                BuildingRole::Store,
                BuildingRole::Building,
            ],
            BuildingRole::House => &[
                BuildingRole::House,
                BuildingRole::Apartment,
                BuildingRole::Building,
            ],
            BuildingRole::Bank => &[
                BuildingRole::Bank,
                BuildingRole::Office,
                BuildingRole::Building,
            ],
            BuildingRole::Store => &[
                BuildingRole::Store,
                BuildingRole::Grocery,
                BuildingRole::Building,
            ],
            BuildingRole::Building => &[
                BuildingRole::Building,
                BuildingRole::Office,
                BuildingRole::Bank,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_specific_before_generic() {
        assert_eq!(
            BuildingRole::classify("grocery_store"),
            Some(BuildingRole::Grocery)
        );
        assert_eq!(
            BuildingRole::classify("apartment_building"),
            Some(BuildingRole::Apartment)
        );
        assert_eq!(
            BuildingRole::classify("office_building"),
            Some(BuildingRole::Office)
        );
        assert_eq!(BuildingRole::classify("pizza_shop"), Some(BuildingRole::Pizza));
        assert_eq!(BuildingRole::classify("house_large"), Some(BuildingRole::House));
        assert_eq!(BuildingRole::classify("school"), Some(BuildingRole::School));
    }

    #[test]
    fn test_classify_unmatched() {
        assert_eq!(BuildingRole::classify("skyscraper"), None);
        assert_eq!(BuildingRole::classify("tree"), None);
    }

    #[test]
    fn test_fallbacks_start_with_self() {
        for &role in BuildingRole::ALL {
            assert_eq!(role.fallbacks()[0], role);
        }
    }

    #[test]
    fn test_stamp_tiles() {
        assert_eq!(stamp_tile("skyscraper_large"), TileType::Skyscraper);
        assert_eq!(stamp_tile("bank"), TileType::Bank);
        assert_eq!(stamp_tile("house"), TileType::House);
        assert_eq!(stamp_tile("apartment_building"), TileType::House);
        assert_eq!(stamp_tile("pizza_shop"), TileType::Store);
        assert_eq!(stamp_tile("school"), TileType::Building);
        assert_eq!(stamp_tile("office_building"), TileType::Building);
    }

    #[test]
    fn test_covers_and_building_at() {
        let registry = BuildingRegistry {
            buildings: vec![PlacedBuilding {
                name: "school".into(),
                origin: (4, 6),
                size: (4, 3),
                tile: TileType::Building,
                background: None,
            }],
        };
        assert!(registry.building_at(4, 6).is_some());
        assert!(registry.building_at(7, 8).is_some());
        assert!(registry.building_at(8, 6).is_none());
        assert!(registry.building_at(4, 9).is_none());
    }
}
