//! L-system road network growth.
//!
//! A time-ordered queue of pending segments is seeded with an axiom
//! (4 cardinal highway stubs truncated outside the downtown exclusion
//! zone, a ring road around it, and connectors splicing the two), then
//! processed under a hard iteration cap. Placing a segment may emit new
//! perpendicular branch segments, with branch probability driven by the
//! population density at the segment's end point — dense areas grow a
//! tighter street mesh, suburbs stay sparse.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::Rng;

use crate::config::{
    BRANCH_DENSITY_THRESHOLD, BRANCH_LENGTH, DOWNTOWN_RADIUS, MAX_GROWTH_ITERATIONS,
    RING_ROAD_POINTS,
};
use crate::density::PopulationDensityField;
use crate::grid::{CityGrid, OccupancyGrid, TileType};
use crate::sim_rng::SimRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentClass {
    Highway,
    Main,
    Local,
}

/// A road segment pending placement or already placed. Value type;
/// never mutated after insertion into the queue.
#[derive(Debug, Clone, Copy)]
pub struct RoadSegment {
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub class: SegmentClass,
    pub time: u32,
}

/// Queue entry. Ordered so the binary heap pops the lowest growth time
/// first, with insertion order breaking ties for determinism.
struct Pending {
    segment: RoadSegment,
    seq: u64,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.segment.time == other.segment.time && self.seq == other.seq
    }
}
impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want min time first.
        other
            .segment
            .time
            .cmp(&self.segment.time)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grows the road skeleton onto a grid.
pub struct RoadNetworkGrower {
    pending: BinaryHeap<Pending>,
    /// Immutable history of segments actually rasterized, in placement order.
    pub placed: Vec<RoadSegment>,
    seq: u64,
}

impl Default for RoadNetworkGrower {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadNetworkGrower {
    pub fn new() -> Self {
        Self {
            pending: BinaryHeap::new(),
            placed: Vec::new(),
            seq: 0,
        }
    }

    fn push(&mut self, segment: RoadSegment) {
        let seq = self.seq;
        self.seq += 1;
        self.pending.push(Pending { segment, seq });
    }

    /// Seed the axiom: highway stubs at time 0, ring road and connectors
    /// at time 1. Stubs start just outside the downtown radius so no
    /// highway cell ever lands inside the exclusion zone.
    pub fn seed_axiom(&mut self, width: usize, height: usize) {
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;
        let r = DOWNTOWN_RADIUS as i32;

        let stubs = [
            ((cx + r + 1, cy), (width as i32 - 1, cy)),
            ((cx - r - 1, cy), (0, cy)),
            ((cx, cy + r + 1), (cx, height as i32 - 1)),
            ((cx, cy - r - 1), (cx, 0)),
        ];
        for (start, end) in stubs {
            self.push(RoadSegment {
                start,
                end,
                class: SegmentClass::Highway,
                time: 0,
            });
        }

        // Ring road: a 32-point polygon approximating the downtown circle.
        let mut ring = Vec::with_capacity(RING_ROAD_POINTS);
        for i in 0..RING_ROAD_POINTS {
            let theta = (i as f32 / RING_ROAD_POINTS as f32) * std::f32::consts::TAU;
            ring.push((
                cx + (DOWNTOWN_RADIUS * theta.cos()).round() as i32,
                cy + (DOWNTOWN_RADIUS * theta.sin()).round() as i32,
            ));
        }
        for i in 0..RING_ROAD_POINTS {
            self.push(RoadSegment {
                start: ring[i],
                end: ring[(i + 1) % RING_ROAD_POINTS],
                class: SegmentClass::Main,
                time: 1,
            });
        }

        // Connectors: splice each highway stub's inner endpoint to the
        // nearest ring point.
        for (inner, _) in stubs {
            let nearest = ring
                .iter()
                .copied()
                .min_by_key(|p| (p.0 - inner.0).pow(2) + (p.1 - inner.1).pow(2))
                .unwrap_or((cx, cy));
            self.push(RoadSegment {
                start: inner,
                end: nearest,
                class: SegmentClass::Main,
                time: 1,
            });
        }
    }

    /// Process the pending queue until it drains or the iteration cap is
    /// hit. The cap is the termination guarantee; out-of-bounds segments
    /// are dropped silently, never an error.
    pub fn grow(
        &mut self,
        grid: &mut CityGrid,
        occupancy: &mut OccupancyGrid,
        density: &PopulationDensityField,
        rng: &mut SimRng,
    ) {
        let mut iterations = 0;
        loop {
            if iterations >= MAX_GROWTH_ITERATIONS {
                break;
            }
            let Some(next) = self.pending.pop() else {
                break;
            };
            iterations += 1;
            let segment = next.segment;
            if !check_local_constraints(grid, &segment) {
                continue;
            }
            rasterize(&segment, grid, occupancy);
            self.apply_global_goals(&segment, density, rng);
            self.placed.push(segment);
        }
    }

    /// Branching rules. Highways never branch; other segments branch
    /// toward density, perpendicular to their dominant axis.
    fn apply_global_goals(
        &mut self,
        parent: &RoadSegment,
        density: &PopulationDensityField,
        rng: &mut SimRng,
    ) {
        if parent.class == SegmentClass::Highway {
            return;
        }
        let (ex, ey) = parent.end;
        let d = density.density_at(ex as usize, ey as usize);
        if d <= BRANCH_DENSITY_THRESHOLD {
            return;
        }
        if rng.0.gen::<f32>() >= d {
            return;
        }

        let horizontal = (parent.end.0 - parent.start.0).abs() >= (parent.end.1 - parent.start.1).abs();
        let candidates = if horizontal {
            [(ex, ey - BRANCH_LENGTH), (ex, ey + BRANCH_LENGTH)]
        } else {
            [(ex - BRANCH_LENGTH, ey), (ex + BRANCH_LENGTH, ey)]
        };
        let cx = (density.width / 2) as f32;
        let cy = (density.height / 2) as f32;
        for end in candidates {
            // Branches must not grow into the downtown exclusion zone.
            let dist = ((end.0 as f32 - cx).powi(2) + (end.1 as f32 - cy).powi(2)).sqrt();
            if dist < DOWNTOWN_RADIUS {
                continue;
            }
            if rng.0.gen_bool(0.5) {
                self.push(RoadSegment {
                    start: parent.end,
                    end,
                    class: SegmentClass::Local,
                    time: parent.time + 1,
                });
            }
        }
    }
}

/// Both endpoints must be in bounds; anything else is silently dropped.
fn check_local_constraints(grid: &CityGrid, segment: &RoadSegment) -> bool {
    let ok = |(x, y): (i32, i32)| {
        x >= 0 && y >= 0 && grid.in_bounds(x as usize, y as usize)
    };
    ok(segment.start) && ok(segment.end)
}

/// Paint the segment onto the grid via a Bresenham line. Highways are
/// thickened by also painting the 4-neighborhood of every line cell.
fn rasterize(segment: &RoadSegment, grid: &mut CityGrid, occupancy: &mut OccupancyGrid) {
    for (x, y) in bresenham(segment.start, segment.end) {
        paint_road(grid, occupancy, x, y);
        if segment.class == SegmentClass::Highway {
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                paint_road(grid, occupancy, nx, ny);
            }
        }
    }
}

fn paint_road(grid: &mut CityGrid, occupancy: &mut OccupancyGrid, x: i32, y: i32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if !grid.in_bounds(x, y) {
        return;
    }
    grid.set(x, y, TileType::Road);
    occupancy.mark(x, y);
}

/// Second pass after growth: every unoccupied cell 4-adjacent to a road
/// becomes sidewalk and joins the street footprint.
pub fn mark_sidewalks(grid: &mut CityGrid, occupancy: &mut OccupancyGrid) {
    let mut sidewalks = Vec::new();
    for y in 0..grid.height {
        for x in 0..grid.width {
            if occupancy.is_occupied(x, y) {
                continue;
            }
            let (neighbors, count) = grid.neighbors4(x, y);
            if neighbors[..count]
                .iter()
                .any(|&(nx, ny)| grid.get(nx, ny) == TileType::Road)
            {
                sidewalks.push((x, y));
            }
        }
    }
    for (x, y) in sidewalks {
        grid.set(x, y, TileType::Sidewalk);
        occupancy.mark(x, y);
    }
}

/// Classic integer Bresenham line, inclusive of both endpoints.
pub fn bresenham(a: (i32, i32), b: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = a;
    let (x1, y1) = b;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        cells.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GRID_HEIGHT, GRID_WIDTH};

    fn grown_city(seed: u64) -> (CityGrid, OccupancyGrid, RoadNetworkGrower) {
        let mut grid = CityGrid::new(GRID_WIDTH, GRID_HEIGHT);
        let mut occ = OccupancyGrid::new(GRID_WIDTH, GRID_HEIGHT);
        let density = PopulationDensityField::compute(GRID_WIDTH, GRID_HEIGHT, &[]);
        let mut rng = SimRng::from_seed_u64(seed);
        let mut grower = RoadNetworkGrower::new();
        grower.seed_axiom(GRID_WIDTH, GRID_HEIGHT);
        grower.grow(&mut grid, &mut occ, &density, &mut rng);
        (grid, occ, grower)
    }

    #[test]
    fn test_bresenham_horizontal() {
        let cells = bresenham((2, 5), (6, 5));
        assert_eq!(cells, vec![(2, 5), (3, 5), (4, 5), (5, 5), (6, 5)]);
    }

    #[test]
    fn test_bresenham_diagonal() {
        let cells = bresenham((0, 0), (3, 3));
        assert_eq!(cells, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_bresenham_single_cell() {
        assert_eq!(bresenham((4, 4), (4, 4)), vec![(4, 4)]);
    }

    #[test]
    fn test_highway_stubs_reach_map_edges() {
        let (grid, _, _) = grown_city(7);
        let (cx, cy) = grid.center();
        assert_eq!(grid.get(0, cy), TileType::Road);
        assert_eq!(grid.get(grid.width - 1, cy), TileType::Road);
        assert_eq!(grid.get(cx, 0), TileType::Road);
        assert_eq!(grid.get(cx, grid.height - 1), TileType::Road);
    }

    #[test]
    fn test_no_road_inside_exclusion_core() {
        let (grid, _, _) = grown_city(7);
        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.distance_to_center(x, y) < 10.0 {
                    assert_ne!(
                        grid.get(x, y),
                        TileType::Road,
                        "road at ({x},{y}) inside downtown core"
                    );
                }
            }
        }
    }

    #[test]
    fn test_ring_road_exists_near_radius() {
        let (grid, _, _) = grown_city(7);
        let ring_cells = (0..grid.height)
            .flat_map(|y| (0..grid.width).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                let d = grid.distance_to_center(x, y);
                grid.get(x, y) == TileType::Road && (10.5..=13.5).contains(&d)
            })
            .count();
        assert!(ring_cells >= RING_ROAD_POINTS, "only {ring_cells} ring cells");
    }

    #[test]
    fn test_terminates_under_saturated_density() {
        let mut grid = CityGrid::new(GRID_WIDTH, GRID_HEIGHT);
        let mut occ = OccupancyGrid::new(GRID_WIDTH, GRID_HEIGHT);
        let density = PopulationDensityField::uniform(GRID_WIDTH, GRID_HEIGHT, 1.0);
        let mut rng = SimRng::from_seed_u64(99);
        let mut grower = RoadNetworkGrower::new();
        grower.seed_axiom(GRID_WIDTH, GRID_HEIGHT);
        grower.grow(&mut grid, &mut occ, &density, &mut rng);
        assert!(grower.placed.len() <= MAX_GROWTH_ITERATIONS);
    }

    #[test]
    fn test_growth_is_deterministic() {
        let (grid_a, _, _) = grown_city(1234);
        let (grid_b, _, _) = grown_city(1234);
        assert_eq!(grid_a.tiles, grid_b.tiles);
    }

    #[test]
    fn test_sidewalks_border_roads() {
        let (mut grid, mut occ, _) = grown_city(7);
        mark_sidewalks(&mut grid, &mut occ);
        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.get(x, y) == TileType::Sidewalk {
                    assert!(occ.is_occupied(x, y));
                    let (neighbors, count) = grid.neighbors4(x, y);
                    assert!(
                        neighbors[..count]
                            .iter()
                            .any(|&(nx, ny)| grid.get(nx, ny) == TileType::Road),
                        "sidewalk at ({x},{y}) not adjacent to a road"
                    );
                }
            }
        }
    }

    #[test]
    fn test_out_of_bounds_segment_dropped() {
        let mut grid = CityGrid::new(16, 16);
        let mut occ = OccupancyGrid::new(16, 16);
        let density = PopulationDensityField::uniform(16, 16, 0.0);
        let mut rng = SimRng::from_seed_u64(1);
        let mut grower = RoadNetworkGrower::new();
        grower.push(RoadSegment {
            start: (4, 4),
            end: (4, 40),
            class: SegmentClass::Local,
            time: 0,
        });
        grower.grow(&mut grid, &mut occ, &density, &mut rng);
        assert!(grower.placed.is_empty());
        assert!(grid.tiles.iter().all(|&t| t == TileType::Grass));
    }
}
