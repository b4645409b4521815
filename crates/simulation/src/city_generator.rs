//! Full city generation pipeline.
//!
//! Runs once at startup: density field, L-system road growth, sidewalks,
//! downtown micro-lots, block discovery, lot subdivision, building
//! placement, then a decorative park pass. Everything downstream of the
//! seed is deterministic.

use bevy::prelude::*;
use rand::Rng;

use crate::building_placement::{place_downtown, place_in_lots};
use crate::buildings::BuildingRegistry;
use crate::catalog::ArchetypeCatalog;
use crate::config::{
    GRID_HEIGHT, GRID_WIDTH, PARK_COUNT, PARK_SITE_ATTEMPTS, PARK_SIZE, POND_SIZE,
};
use crate::density::{DensityCenter, PopulationDensityField};
use crate::grid::{CityGrid, OccupancyGrid, TileType};
use crate::lots::{subdivide, Lot};
use crate::road_growth::{mark_sidewalks, RoadNetworkGrower};
use crate::sim_rng::SimRng;

/// Parameters for a new game. Inserted before startup; the seed controls
/// every generation decision.
#[derive(Resource, Debug, Clone, Copy)]
pub struct NewGameConfig {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
}

impl Default for NewGameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

/// Output of the pipeline: the tile grid plus every placed building.
pub struct GeneratedCity {
    pub grid: CityGrid,
    pub buildings: BuildingRegistry,
}

/// Suburb nuclei drawn from the seeded RNG: 3 centers at 15-25 cells
/// from downtown, strength 0.3-0.5.
fn draw_secondary_centers(width: usize, height: usize, rng: &mut SimRng) -> Vec<DensityCenter> {
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;
    (0..3)
        .map(|_| {
            let theta = rng.0.gen::<f32>() * std::f32::consts::TAU;
            let radius = rng.0.gen_range(15.0..25.0);
            DensityCenter {
                x: cx + radius * theta.cos(),
                y: cy + radius * theta.sin(),
                strength: rng.0.gen_range(0.3..0.5),
            }
        })
        .collect()
}

/// Run the whole pipeline for one seed.
pub fn generate(
    width: usize,
    height: usize,
    catalog: &ArchetypeCatalog,
    rng: &mut SimRng,
) -> GeneratedCity {
    let mut grid = CityGrid::new(width, height);
    let mut occupancy = OccupancyGrid::new(width, height);
    let mut registry = BuildingRegistry::default();

    let secondary = draw_secondary_centers(width, height, rng);
    let density = PopulationDensityField::compute(width, height, &secondary);

    let mut grower = RoadNetworkGrower::new();
    grower.seed_axiom(width, height);
    grower.grow(&mut grid, &mut occupancy, &density, rng);
    mark_sidewalks(&mut grid, &mut occupancy);
    info!("road growth placed {} segments", grower.placed.len());

    place_downtown(&mut grid, &mut occupancy, &mut registry, catalog, rng);

    let blocks = crate::blocks::find_blocks(&occupancy);
    let map_center = ((width / 2) as f32, (height / 2) as f32);
    let lots: Vec<Lot> = blocks
        .iter()
        .flat_map(|b| subdivide(b, map_center))
        .collect();
    info!("{} blocks -> {} lots", blocks.len(), lots.len());

    place_in_lots(
        &mut grid,
        &mut occupancy,
        &mut registry,
        catalog,
        &lots,
        &density,
        rng,
    );
    info!("placed {} buildings", registry.buildings.len());

    place_parks(&mut grid, &mut occupancy, &density, rng);

    GeneratedCity {
        grid,
        buildings: registry,
    }
}

/// Decorative pass: a few parks in quiet areas far from downtown. Each
/// park is a square of grass and trees with a small pond in the middle.
/// Site search is best-effort; fewer parks than requested is fine.
fn place_parks(
    grid: &mut CityGrid,
    occupancy: &mut OccupancyGrid,
    density: &PopulationDensityField,
    rng: &mut SimRng,
) {
    let mut placed = 0;
    for _ in 0..PARK_COUNT * PARK_SITE_ATTEMPTS {
        if placed >= PARK_COUNT {
            break;
        }
        if grid.width <= PARK_SIZE || grid.height <= PARK_SIZE {
            break;
        }
        let ox = rng.0.gen_range(0..grid.width - PARK_SIZE);
        let oy = rng.0.gen_range(0..grid.height - PARK_SIZE);
        let ccx = ox + PARK_SIZE / 2;
        let ccy = oy + PARK_SIZE / 2;
        if grid.distance_to_center(ccx, ccy) <= 20.0 {
            continue;
        }
        if density.density_at(ccx, ccy) >= 0.3 {
            continue;
        }
        let mut free = true;
        'scan: for y in oy..oy + PARK_SIZE {
            for x in ox..ox + PARK_SIZE {
                if occupancy.is_occupied(x, y) {
                    free = false;
                    break 'scan;
                }
            }
        }
        if !free {
            continue;
        }

        let pond_x = ox + (PARK_SIZE - POND_SIZE) / 2;
        let pond_y = oy + (PARK_SIZE - POND_SIZE) / 2;
        for y in oy..oy + PARK_SIZE {
            for x in ox..ox + PARK_SIZE {
                let in_pond = x >= pond_x
                    && x < pond_x + POND_SIZE
                    && y >= pond_y
                    && y < pond_y + POND_SIZE;
                let tile = if in_pond {
                    TileType::Water
                } else if rng.0.gen_bool(0.3) {
                    TileType::Tree
                } else {
                    TileType::Grass
                };
                grid.set(x, y, tile);
                occupancy.mark(x, y);
            }
        }
        placed += 1;
    }
    info!("placed {placed} parks");
}

// ============================================================================
// Systems
// ============================================================================

fn generate_city(
    mut commands: Commands,
    config: Res<NewGameConfig>,
    catalog: Res<ArchetypeCatalog>,
) {
    let mut rng = SimRng::from_seed_u64(config.seed);
    info!(
        "generating {}x{} city with seed {}",
        config.width, config.height, config.seed
    );
    let city = generate(config.width, config.height, &catalog, &mut rng);
    commands.insert_resource(city.grid);
    commands.insert_resource(city.buildings);
    commands.insert_resource(rng);
}

pub struct CityGeneratorPlugin;

impl Plugin for CityGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NewGameConfig>()
            .init_resource::<ArchetypeCatalog>()
            .add_systems(PreStartup, generate_city);
    }
}
