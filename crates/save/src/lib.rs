//! Map persistence: the JSON map document, atomic file I/O and the
//! quick-save binding.

use std::path::Path;

use bevy::prelude::*;
use simulation::buildings::BuildingRegistry;
use simulation::catalog::ArchetypeCatalog;
use simulation::grid::CityGrid;

pub mod atomic_write;
pub mod map_file;
pub mod save_error;

pub use map_file::{CellRecord, MapFile};
pub use save_error::SaveError;

/// Default quick-save location, relative to the working directory.
pub const QUICK_SAVE_PATH: &str = "saves/map.json";

/// Encode the current map and write it atomically to `path`.
pub fn save_map_to(
    path: &Path,
    grid: &CityGrid,
    registry: &BuildingRegistry,
    catalog: &ArchetypeCatalog,
) -> Result<(), SaveError> {
    let map = MapFile::encode(grid, registry, catalog)?;
    let json = map.to_json()?;
    atomic_write::atomic_write(path, json.as_bytes())?;
    Ok(())
}

/// Read and decode a map file.
pub fn load_map_from(
    path: &Path,
    catalog: &ArchetypeCatalog,
) -> Result<(CityGrid, BuildingRegistry), SaveError> {
    let json = std::fs::read_to_string(path)?;
    let map = MapFile::from_json(&json)?;
    map.decode(catalog)
}

fn quick_save(
    keys: Res<ButtonInput<KeyCode>>,
    grid: Option<Res<CityGrid>>,
    registry: Option<Res<BuildingRegistry>>,
    catalog: Option<Res<ArchetypeCatalog>>,
) {
    if !keys.just_pressed(KeyCode::F5) {
        return;
    }
    let (Some(grid), Some(registry), Some(catalog)) = (grid, registry, catalog) else {
        return;
    };
    match save_map_to(Path::new(QUICK_SAVE_PATH), &grid, &registry, &catalog) {
        Ok(()) => info!("map saved to {QUICK_SAVE_PATH}"),
        Err(err) => warn!("quick save failed: {err}"),
    }
}

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, quick_save);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::grid::TileType;

    #[test]
    fn test_save_and_load_through_files() {
        let dir = std::env::temp_dir().join("cityward_save_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("map.json");

        let catalog = ArchetypeCatalog::default();
        let mut grid = CityGrid::new(8, 8);
        grid.set(3, 3, TileType::Road);
        let registry = BuildingRegistry::default();

        save_map_to(&path, &grid, &registry, &catalog).unwrap();
        let (loaded, loaded_registry) = load_map_from(&path, &catalog).unwrap();
        assert_eq!(loaded.tiles, grid.tiles);
        assert!(loaded_registry.buildings.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let catalog = ArchetypeCatalog::default();
        let err = load_map_from(Path::new("/nonexistent/cityward/map.json"), &catalog)
            .unwrap_err();
        assert!(matches!(err, SaveError::Io(_)));
    }
}
