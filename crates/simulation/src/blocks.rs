//! Block discovery: flood-fill the non-road, non-downtown area into
//! connected regions once roads are placed.

use std::collections::VecDeque;

use crate::config::{DOWNTOWN_RADIUS, MIN_BLOCK_CELLS};
use crate::grid::OccupancyGrid;

/// One flood-filled connected region bounded by streets, the downtown
/// zone, and the map edge.
#[derive(Debug, Clone)]
pub struct Block {
    pub cells: Vec<(usize, usize)>,
}

impl Block {
    /// Inclusive bounding box `(min, max)` of the block's cells.
    pub fn bounding_box(&self) -> ((usize, usize), (usize, usize)) {
        let mut min = (usize::MAX, usize::MAX);
        let mut max = (0, 0);
        for &(x, y) in &self.cells {
            min.0 = min.0.min(x);
            min.1 = min.1.min(y);
            max.0 = max.0.max(x);
            max.1 = max.1.max(y);
        }
        (min, max)
    }

    pub fn centroid(&self) -> (f32, f32) {
        let n = self.cells.len().max(1) as f32;
        let (sx, sy) = self
            .cells
            .iter()
            .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x as f32, ay + y as f32));
        (sx / n, sy / n)
    }
}

/// Flood-fill every unoccupied, non-downtown cell into blocks. Downtown
/// cells are pre-marked visited so they never join a block; they get the
/// dedicated downtown placement path instead. Blocks below
/// `MIN_BLOCK_CELLS` are discarded. An empty result is valid.
pub fn find_blocks(occupancy: &OccupancyGrid) -> Vec<Block> {
    let width = occupancy.width;
    let height = occupancy.height;
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;

    let mut visited = vec![false; width * height];
    for y in 0..height {
        for x in 0..width {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            if d < DOWNTOWN_RADIUS {
                visited[y * width + x] = true;
            }
        }
    }

    let mut blocks = Vec::new();
    for sy in 0..height {
        for sx in 0..width {
            if visited[sy * width + sx] || occupancy.is_occupied(sx, sy) {
                continue;
            }
            // 4-connected flood fill from (sx, sy).
            let mut cells = Vec::new();
            let mut queue = VecDeque::new();
            visited[sy * width + sx] = true;
            queue.push_back((sx, sy));
            while let Some((x, y)) = queue.pop_front() {
                cells.push((x, y));
                let mut neighbors = [(0usize, 0usize); 4];
                let mut count = 0;
                if x > 0 {
                    neighbors[count] = (x - 1, y);
                    count += 1;
                }
                if x + 1 < width {
                    neighbors[count] = (x + 1, y);
                    count += 1;
                }
                if y > 0 {
                    neighbors[count] = (x, y - 1);
                    count += 1;
                }
                if y + 1 < height {
                    neighbors[count] = (x, y + 1);
                    count += 1;
                }
                for &(nx, ny) in &neighbors[..count] {
                    if !visited[ny * width + nx] && !occupancy.is_occupied(nx, ny) {
                        visited[ny * width + nx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
            if cells.len() >= MIN_BLOCK_CELLS {
                blocks.push(Block { cells });
            }
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_occupied_map_has_no_blocks() {
        let mut occ = OccupancyGrid::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                occ.mark(x, y);
            }
        }
        assert!(find_blocks(&occ).is_empty());
    }

    #[test]
    fn test_open_map_yields_blocks_excluding_downtown() {
        let occ = OccupancyGrid::new(64, 64);
        let blocks = find_blocks(&occ);
        assert!(!blocks.is_empty());
        let total: usize = blocks.iter().map(|b| b.cells.len()).sum();
        for block in &blocks {
            for &(x, y) in &block.cells {
                let d = ((x as f32 - 32.0).powi(2) + (y as f32 - 32.0).powi(2)).sqrt();
                assert!(d >= DOWNTOWN_RADIUS, "downtown cell ({x},{y}) in block");
            }
        }
        // Everything outside the disk is one connected region here.
        assert!(total > 64 * 64 / 2);
    }

    #[test]
    fn test_occupied_wall_splits_blocks() {
        let mut occ = OccupancyGrid::new(64, 64);
        for y in 0..64 {
            occ.mark(10, y);
        }
        let blocks = find_blocks(&occ);
        assert!(blocks.len() >= 2, "wall should split the map into regions");
        for block in &blocks {
            let left = block.cells.iter().all(|&(x, _)| x < 10);
            let right = block.cells.iter().all(|&(x, _)| x > 10);
            assert!(left || right, "block spans the occupied wall");
        }
    }

    #[test]
    fn test_small_pockets_discarded() {
        let mut occ = OccupancyGrid::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                occ.mark(x, y);
            }
        }
        // Open a 3x3 pocket: 9 cells, below the 20-cell floor.
        for y in 1..4 {
            for x in 1..4 {
                occ.cells[y * 64 + x] = false;
            }
        }
        assert!(find_blocks(&occ).is_empty());
    }

    #[test]
    fn test_bounding_box_and_centroid() {
        let block = Block {
            cells: vec![(2, 3), (4, 3), (3, 5)],
        };
        assert_eq!(block.bounding_box(), ((2, 3), (4, 5)));
        let (cx, cy) = block.centroid();
        assert!((cx - 3.0).abs() < 1e-5);
        assert!((cy - 11.0 / 3.0).abs() < 1e-5);
    }
}
