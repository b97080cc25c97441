use std::collections::{BTreeMap, HashSet};

use glam::Vec2;

use crate::core::{rigidbody::Body, types::Aabb};

pub type CellKey = (i32, i32);

/// Uniform grid spatial partitioning used by the broad phase.
///
/// Cells are stored in key order so pair enumeration is deterministic; inside a cell,
/// body indices keep their insertion order.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: BTreeMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: BTreeMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = cell_size;
        self.cells.clear();
    }

    pub fn world_to_grid(&self, pos: Vec2) -> CellKey {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Registers `index` in every cell the box overlaps. Non-finite boxes are skipped.
    pub fn insert(&mut self, index: usize, aabb: &Aabb) -> bool {
        if !aabb.is_valid() {
            return false;
        }

        let min_cell = self.world_to_grid(aabb.min);
        let max_cell = self.world_to_grid(aabb.max);

        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                self.cells.entry((x, y)).or_default().push(index);
            }
        }
        true
    }

    /// Clears the grid and re-registers every body from its current bounds.
    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.cells.clear();

        for (index, body) in bodies.iter().enumerate() {
            if !self.insert(index, &body.aabb()) {
                log::warn!("body {index} has non-finite bounds; left out of the broad phase");
            }
        }
    }

    pub fn cell(&self, key: CellKey) -> Option<&[usize]> {
        self.cells.get(&key).map(Vec::as_slice)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &[usize])> {
        self.cells.iter().map(|(key, bucket)| (key, bucket.as_slice()))
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Keys of every bucket holding `index`.
    pub fn cells_containing(&self, index: usize) -> Vec<CellKey> {
        self.cells
            .iter()
            .filter(|(_, bucket)| bucket.contains(&index))
            .map(|(key, _)| *key)
            .collect()
    }

    /// Bodies registered in any cell the box overlaps, sorted and deduplicated.
    pub fn query(&self, aabb: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        if !aabb.is_valid() {
            return results;
        }

        let min_cell = self.world_to_grid(aabb.min);
        let max_cell = self.world_to_grid(aabb.max);

        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                if let Some(bucket) = self.cells.get(&(x, y)) {
                    results.extend(bucket);
                }
            }
        }

        results.sort_unstable();
        results.dedup();
        results
    }

    /// In-cell pairs `(i, j)` with `i < j`, each distinct pair once, in cell-key order.
    pub fn potential_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        let mut checked = HashSet::new();

        for bucket in self.cells.values() {
            for (slot, &a) in bucket.iter().enumerate() {
                for &b in &bucket[slot + 1..] {
                    let pair_key = if a < b { (a, b) } else { (b, a) };
                    if checked.insert(pair_key) {
                        pairs.push(pair_key);
                    }
                }
            }
        }

        pairs
    }
}
