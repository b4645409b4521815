//! Building placement: the downtown micro-lot path and the block/lot
//! path. Stamping is all-or-nothing against the occupancy grid — the
//! core correctness invariant of the generator. A lot where nothing
//! fits simply stays grass.

use rand::Rng;

use crate::buildings::{stamp_tile, BuildingRegistry, PlacedBuilding};
use crate::catalog::ArchetypeCatalog;
use crate::config::{DOWNTOWN_LOT_SIZE, DOWNTOWN_RADIUS};
use crate::density::PopulationDensityField;
use crate::grid::{CityGrid, OccupancyGrid, TileType};
use crate::lots::Lot;
use crate::sim_rng::SimRng;

/// Downtown micro-lot archetypes. The three skyscraper entries are
/// footprint-size variants, keeping downtown uniformly tall.
const DOWNTOWN_TABLE: &[(&str, f32)] = &[
    ("skyscraper", 0.7),
    ("skyscraper_small", 0.15),
    ("skyscraper_large", 0.1),
    ("bank", 0.05),
];

const CORE_ADJACENT_TABLE: &[(&str, f32)] = &[
    ("skyscraper", 0.3),
    ("office_building", 0.25),
    ("apartment_building", 0.25),
    ("bank", 0.2),
];

const MID_DENSITY_TABLE: &[(&str, f32)] = &[
    ("house", 0.2),
    ("grocery_store", 0.15),
    ("store", 0.15),
    ("pizza_shop", 0.1),
    ("school", 0.1),
    ("office_building", 0.1),
    ("bank", 0.1),
    ("apartment_building", 0.1),
];

const LOW_DENSITY_TABLE: &[(&str, f32)] = &[
    ("house", 0.7),
    ("house_large", 0.15),
    ("store", 0.1),
    ("grocery_store", 0.05),
];

fn archetype_table(distance: f32, density: f32) -> &'static [(&'static str, f32)] {
    if distance < 15.0 && density > 0.6 {
        CORE_ADJACENT_TABLE
    } else if density > 0.3 {
        MID_DENSITY_TABLE
    } else {
        LOW_DENSITY_TABLE
    }
}

/// Weighted random choice over an archetype table.
fn weighted_choice(table: &[(&'static str, f32)], rng: &mut SimRng) -> &'static str {
    let total: f32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.0.gen::<f32>() * total;
    for &(name, weight) in table {
        if roll < weight {
            return name;
        }
        roll -= weight;
    }
    table[table.len() - 1].0
}

/// Attempt one footprint stamp. Every cell is tested against bounds and
/// occupancy before any write happens; on conflict nothing is written.
pub fn try_stamp(
    grid: &mut CityGrid,
    occupancy: &mut OccupancyGrid,
    registry: &mut BuildingRegistry,
    catalog: &ArchetypeCatalog,
    name: &str,
    origin: (usize, usize),
) -> bool {
    let Some((w, h)) = catalog.footprint(name) else {
        return false;
    };
    let (ox, oy) = origin;
    if ox + w > grid.width || oy + h > grid.height {
        return false;
    }
    for y in oy..oy + h {
        for x in ox..ox + w {
            if occupancy.is_occupied(x, y) {
                return false;
            }
        }
    }

    let tile = stamp_tile(name);
    for y in oy..oy + h {
        for x in ox..ox + w {
            grid.set(x, y, tile);
            occupancy.mark(x, y);
        }
    }
    registry.buildings.push(PlacedBuilding {
        name: name.to_string(),
        origin,
        size: (w, h),
        tile,
        background: None,
    });
    true
}

/// Downtown path: carve the exclusion disk into greedy non-overlapping
/// 4x4 micro-lots, stamp one weighted pick per lot, then claim every
/// remaining disk cell as plaza so later passes can never place here.
pub fn place_downtown(
    grid: &mut CityGrid,
    occupancy: &mut OccupancyGrid,
    registry: &mut BuildingRegistry,
    catalog: &ArchetypeCatalog,
    rng: &mut SimRng,
) {
    let (cx, cy) = grid.center();
    let r = DOWNTOWN_RADIUS as usize;
    let in_disk = |x: usize, y: usize| {
        let dx = x as f32 - cx as f32;
        let dy = y as f32 - cy as f32;
        (dx * dx + dy * dy).sqrt() < DOWNTOWN_RADIUS
    };

    let start_x = cx.saturating_sub(r);
    let start_y = cy.saturating_sub(r);
    let mut ly = start_y;
    while ly + DOWNTOWN_LOT_SIZE <= cy + r {
        let mut lx = start_x;
        while lx + DOWNTOWN_LOT_SIZE <= cx + r {
            let corners = [
                (lx, ly),
                (lx + DOWNTOWN_LOT_SIZE - 1, ly),
                (lx, ly + DOWNTOWN_LOT_SIZE - 1),
                (lx + DOWNTOWN_LOT_SIZE - 1, ly + DOWNTOWN_LOT_SIZE - 1),
            ];
            if corners.iter().all(|&(x, y)| in_disk(x, y)) {
                let name = weighted_choice(DOWNTOWN_TABLE, rng);
                if let Some((w, h)) = catalog.footprint(name) {
                    // Center smaller footprints inside the micro-lot.
                    let origin = (
                        lx + (DOWNTOWN_LOT_SIZE - w.min(DOWNTOWN_LOT_SIZE)) / 2,
                        ly + (DOWNTOWN_LOT_SIZE - h.min(DOWNTOWN_LOT_SIZE)) / 2,
                    );
                    try_stamp(grid, occupancy, registry, catalog, name, origin);
                }
            }
            lx += DOWNTOWN_LOT_SIZE;
        }
        ly += DOWNTOWN_LOT_SIZE;
    }

    // Remaining disk cells become plaza: occupied, never built on.
    for y in 0..grid.height {
        for x in 0..grid.width {
            if in_disk(x, y) && !occupancy.is_occupied(x, y) {
                occupancy.mark(x, y);
            }
        }
    }
}

/// Candidate anchor positions inside a lot for a given footprint.
/// Corners first, then the lot center, then random interior points.
fn candidate_origins(
    lot: &Lot,
    w: usize,
    h: usize,
    rng: &mut SimRng,
    count_random: usize,
) -> Vec<(usize, usize)> {
    let (min, max) = (lot.min, lot.max);
    let Some(span_x) = (max.0 + 1).checked_sub(min.0 + w) else {
        return Vec::new();
    };
    let Some(span_y) = (max.1 + 1).checked_sub(min.1 + h) else {
        return Vec::new();
    };
    let mut origins = vec![
        (min.0, min.1),
        (min.0 + span_x, min.1),
        (min.0, min.1 + span_y),
        (min.0 + span_x, min.1 + span_y),
        (min.0 + span_x / 2, min.1 + span_y / 2),
    ];
    for _ in 0..count_random {
        origins.push((
            min.0 + rng.0.gen_range(0..=span_x),
            min.1 + rng.0.gen_range(0..=span_y),
        ));
    }
    origins
}

/// Block/lot path. Near the center every candidate anchor in a lot is
/// tried (corners, center, random interior points), stopping once 2
/// buildings land (mild overcrowding avoidance); farther out exactly
/// one centered attempt is made.
pub fn place_in_lots(
    grid: &mut CityGrid,
    occupancy: &mut OccupancyGrid,
    registry: &mut BuildingRegistry,
    catalog: &ArchetypeCatalog,
    lots: &[Lot],
    density: &PopulationDensityField,
    rng: &mut SimRng,
) {
    let (cx, cy) = grid.center();
    for lot in lots {
        let (lcx, lcy) = lot.centroid();
        let distance = ((lcx - cx as f32).powi(2) + (lcy - cy as f32).powi(2)).sqrt();
        let d = density.density_at(
            (lcx.round() as usize).min(grid.width - 1),
            (lcy.round() as usize).min(grid.height - 1),
        );
        let table = archetype_table(distance, d);

        if distance < 15.0 {
            let mut placed = 0;
            let name = weighted_choice(table, rng);
            let Some((w, h)) = catalog.footprint(name) else {
                continue;
            };
            for origin in candidate_origins(lot, w, h, rng, 3) {
                if placed >= 2 {
                    break;
                }
                if try_stamp(grid, occupancy, registry, catalog, name, origin) {
                    placed += 1;
                }
            }
        } else {
            let name = weighted_choice(table, rng);
            let Some((w, h)) = catalog.footprint(name) else {
                continue;
            };
            let origins = candidate_origins(lot, w, h, rng, 0);
            // Index 4 is the centered anchor.
            if let Some(&origin) = origins.get(4) {
                if try_stamp(grid, occupancy, registry, catalog, name, origin)
                    && name.contains("house")
                    && distance > 20.0
                    && rng.0.gen_bool(0.5)
                {
                    surround_with_yard(grid, occupancy, origin, (w, h));
                }
            }
        }
    }
}

/// Suburban look: claim a ring of grass around a far-out house so
/// nothing else packs up against it.
fn surround_with_yard(
    grid: &mut CityGrid,
    occupancy: &mut OccupancyGrid,
    origin: (usize, usize),
    size: (usize, usize),
) {
    let x0 = origin.0 as i32 - 1;
    let y0 = origin.1 as i32 - 1;
    let x1 = (origin.0 + size.0) as i32;
    let y1 = (origin.1 + size.1) as i32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let on_ring = x == x0 || x == x1 || y == y0 || y == y1;
            if !on_ring || x < 0 || y < 0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if grid.in_bounds(x, y) && !occupancy.is_occupied(x, y) {
                grid.set(x, y, TileType::Grass);
                occupancy.mark(x, y);
            }
        }
    }
}
