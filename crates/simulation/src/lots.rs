//! Lot subdivision: cut each block into rectangular lots sized by
//! distance from the map center, so packing is denser near downtown.

use std::collections::HashSet;

use crate::blocks::Block;
use crate::config::MIN_LOT_CELLS;

/// A subset of one block's cells plus its bounding box. Consumed exactly
/// once by the building placer.
#[derive(Debug, Clone)]
pub struct Lot {
    pub cells: Vec<(usize, usize)>,
    pub min: (usize, usize),
    pub max: (usize, usize),
}

impl Lot {
    pub fn centroid(&self) -> (f32, f32) {
        let n = self.cells.len().max(1) as f32;
        let (sx, sy) = self
            .cells
            .iter()
            .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x as f32, ay + y as f32));
        (sx / n, sy / n)
    }
}

/// Lot edge length by block-centroid distance from the map center.
fn lot_size_for_distance(distance: f32) -> usize {
    if distance < 10.0 {
        5
    } else if distance < 18.0 {
        6
    } else {
        8
    }
}

/// Tile the block's bounding box in lot-sized squares, intersect each
/// square with the block's actual membership (blocks are not
/// rectangular), and keep lots with at least `MIN_LOT_CELLS` cells.
pub fn subdivide(block: &Block, map_center: (f32, f32)) -> Vec<Lot> {
    let (bcx, bcy) = block.centroid();
    let distance = ((bcx - map_center.0).powi(2) + (bcy - map_center.1).powi(2)).sqrt();
    let lot_size = lot_size_for_distance(distance);

    let membership: HashSet<(usize, usize)> = block.cells.iter().copied().collect();
    let ((min_x, min_y), (max_x, max_y)) = block.bounding_box();

    let mut lots = Vec::new();
    let mut ty = min_y;
    while ty <= max_y {
        let mut tx = min_x;
        while tx <= max_x {
            let mut cells = Vec::new();
            for y in ty..(ty + lot_size).min(max_y + 1) {
                for x in tx..(tx + lot_size).min(max_x + 1) {
                    if membership.contains(&(x, y)) {
                        cells.push((x, y));
                    }
                }
            }
            if cells.len() >= MIN_LOT_CELLS {
                let mut lot_min = (usize::MAX, usize::MAX);
                let mut lot_max = (0, 0);
                for &(x, y) in &cells {
                    lot_min.0 = lot_min.0.min(x);
                    lot_min.1 = lot_min.1.min(y);
                    lot_max.0 = lot_max.0.max(x);
                    lot_max.1 = lot_max.1.max(y);
                }
                lots.push(Lot {
                    cells,
                    min: lot_min,
                    max: lot_max,
                });
            }
            tx += lot_size;
        }
        ty += lot_size;
    }
    lots
}
