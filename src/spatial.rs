//! Spatial hashing using Morton encoding (Z-order curve).
//!
//! CPU counterpart to a GPU neighbour grid: particles are keyed by the Morton
//! code of their cell, sorted by that key, and each query scans the 27 cells
//! around a particle. With the cell size equal to the connection radius every
//! pair closer than the radius is guaranteed to sit in adjacent cells.

use glam::{IVec3, UVec3, Vec3};

use crate::proximity::{ConnectionFinder, LineList};

/// Largest grid resolution representable with 10-bit Morton coordinates.
const MAX_GRID_RESOLUTION: u32 = 1024;

/// Offsets for the 27 neighbouring cells (including self).
const NEIGHBOR_OFFSETS: [IVec3; 27] = {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = IVec3::new((i % 3) as i32 - 1, ((i / 3) % 3) as i32 - 1, (i / 9) as i32 - 1);
        i += 1;
    }
    offsets
};

/// Configuration for spatial hashing grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialConfig {
    /// Size of each cell in world units
    pub cell_size: f32,
    /// Number of cells per dimension (grid is resolution^3)
    pub grid_resolution: u32,
}

impl SpatialConfig {
    pub fn new(cell_size: f32, grid_resolution: u32) -> Self {
        assert!(grid_resolution.is_power_of_two(), "Grid resolution must be power of 2");
        assert!(
            grid_resolution <= MAX_GRID_RESOLUTION,
            "Grid resolution must be <= 1024 for 30-bit Morton codes"
        );
        Self {
            cell_size,
            grid_resolution,
        }
    }

    /// Smallest power-of-two grid of `cell_size` cells that spans
    /// `[-extent, extent]`, capped at 1024 per axis.
    ///
    /// Positions outside the grid clamp into the border cells, which keeps
    /// neighbour queries correct but slower.
    pub fn covering(extent: f32, cell_size: f32) -> Self {
        let cells = (2.0 * extent / cell_size).ceil().max(1.0);
        let resolution = if cells >= MAX_GRID_RESOLUTION as f32 {
            MAX_GRID_RESOLUTION
        } else {
            (cells as u32).next_power_of_two()
        };
        Self::new(cell_size, resolution)
    }

    /// Total number of cells in the grid
    pub fn total_cells(&self) -> u32 {
        self.grid_resolution * self.grid_resolution * self.grid_resolution
    }

    /// Convert world position to cell coordinates.
    pub fn cell_of(&self, pos: Vec3) -> UVec3 {
        // Offset by half grid to center around origin
        let half_grid = self.grid_resolution as f32 * self.cell_size * 0.5;
        let normalized = (pos + Vec3::splat(half_grid)) / self.cell_size;
        let max = (self.grid_resolution - 1) as f32;
        normalized.floor().clamp(Vec3::ZERO, Vec3::splat(max)).as_uvec3()
    }

    /// Morton code for a neighbouring cell, or `None` when it lies outside the grid.
    fn neighbor_code(&self, cell: UVec3, offset: IVec3) -> Option<u32> {
        let neighbor = cell.as_ivec3() + offset;
        let res = self.grid_resolution as i32;
        if neighbor.min_element() < 0 || neighbor.max_element() >= res {
            return None;
        }
        let n = neighbor.as_uvec3();
        Some(morton_encode(n.x, n.y, n.z))
    }
}

/// Expand 10-bit integer to 30 bits by inserting 2 zeros between each bit
fn expand_bits(v: u32) -> u32 {
    let mut x = v & 0x0000_03FF;
    x = (x | (x << 16)) & 0x0300_00FF;
    x = (x | (x << 8)) & 0x0300_F00F;
    x = (x | (x << 4)) & 0x030C_30C3;
    x = (x | (x << 2)) & 0x0924_9249;
    x
}

/// Compute 30-bit Morton code for 3D cell (each coord 0-1023)
pub fn morton_encode(x: u32, y: u32, z: u32) -> u32 {
    expand_bits(x) | (expand_bits(y) << 1) | (expand_bits(z) << 2)
}

/// Grid-accelerated [`ConnectionFinder`].
///
/// Emits the same line-list as [`BruteForce`](crate::BruteForce) in the same
/// order, but only evaluates pairs that share or neighbour a cell.
#[derive(Debug, Default)]
pub struct UniformGrid {
    /// `(morton_code, particle_index)` sorted by code then index.
    entries: Vec<(u32, u32)>,
    candidates: Vec<u32>,
    last_config: Option<SpatialConfig>,
}

impl UniformGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid used by the most recent [`find`](ConnectionFinder::find), if any.
    pub fn last_config(&self) -> Option<SpatialConfig> {
        self.last_config
    }

    fn cell_range(&self, code: u32) -> &[(u32, u32)] {
        let start = self.entries.partition_point(|&(c, _)| c < code);
        let end = start + self.entries[start..].partition_point(|&(c, _)| c == code);
        &self.entries[start..end]
    }
}

impl ConnectionFinder for UniformGrid {
    fn name(&self) -> &'static str {
        "uniform-grid"
    }

    fn find(&mut self, positions: &[Vec3], radius: f32, out: &mut LineList) -> usize {
        out.clear();
        if positions.len() < 2 || radius <= 0.0 {
            return 0;
        }

        let extent = positions
            .iter()
            .fold(0.0_f32, |m, p| m.max(p.abs().max_element()));
        let config = SpatialConfig::covering(extent, radius);
        self.last_config = Some(config);

        self.entries.clear();
        self.entries.extend(positions.iter().enumerate().map(|(i, &p)| {
            let cell = config.cell_of(p);
            (morton_encode(cell.x, cell.y, cell.z), i as u32)
        }));
        self.entries.sort_unstable();

        let mut evaluated = 0;
        for (i, &a) in positions.iter().enumerate() {
            let cell = config.cell_of(a);

            let mut candidates = std::mem::take(&mut self.candidates);
            candidates.clear();
            for offset in NEIGHBOR_OFFSETS {
                let Some(code) = config.neighbor_code(cell, offset) else {
                    continue;
                };
                candidates.extend(
                    self.cell_range(code)
                        .iter()
                        .map(|&(_, j)| j)
                        .filter(|&j| j as usize > i),
                );
            }
            // Match brute-force emission order
            candidates.sort_unstable();

            for &j in &candidates {
                evaluated += 1;
                let b = positions[j as usize];
                if a.distance(b) < radius {
                    out.push_segment(a, b);
                }
            }
            self.candidates = candidates;
        }

        evaluated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::{pair_count, BruteForce};
    use crate::spawn::SpawnContext;

    #[test]
    fn test_morton_interleaves_bits() {
        assert_eq!(morton_encode(0, 0, 0), 0);
        assert_eq!(morton_encode(1, 0, 0), 0b001);
        assert_eq!(morton_encode(0, 1, 0), 0b010);
        assert_eq!(morton_encode(0, 0, 1), 0b100);
        assert_eq!(morton_encode(3, 0, 0), 0b001_001);
        assert_eq!(morton_encode(1023, 1023, 1023), 0x3FFF_FFFF);
    }

    #[test]
    fn test_covering_resolution() {
        let config = SpatialConfig::covering(5.0, 2.0);
        assert_eq!(config.grid_resolution, 8);
        assert_eq!(config.total_cells(), 512);
        // Tiny radius saturates at the Morton limit
        assert_eq!(SpatialConfig::covering(5.0, 1e-6).grid_resolution, 1024);
    }

    #[test]
    fn test_cell_of_clamps() {
        let config = SpatialConfig::new(1.0, 4);
        assert_eq!(config.cell_of(Vec3::ZERO), UVec3::splat(2));
        assert_eq!(config.cell_of(Vec3::splat(-100.0)), UVec3::ZERO);
        assert_eq!(config.cell_of(Vec3::splat(100.0)), UVec3::splat(3));
    }

    #[test]
    fn test_neighbor_offsets_cover_cube() {
        assert!(NEIGHBOR_OFFSETS.contains(&IVec3::ZERO));
        assert!(NEIGHBOR_OFFSETS.contains(&IVec3::new(-1, 1, -1)));
        for offset in NEIGHBOR_OFFSETS {
            assert!(offset.abs().max_element() <= 1);
        }
    }

    #[test]
    fn test_matches_brute_force() {
        for (count, radius, seed) in [(100, 2.0, 1), (400, 1.0, 2), (250, 3.5, 3), (50, 0.3, 4)] {
            let mut ctx = SpawnContext::new(5.0, Some(seed));
            let positions: Vec<Vec3> = (0..count).map(|_| ctx.random_in_bounds()).collect();

            let mut expected = LineList::new();
            let mut actual = LineList::new();
            BruteForce.find(&positions, radius, &mut expected);
            let evaluated = UniformGrid::new().find(&positions, radius, &mut actual);

            assert_eq!(expected, actual, "count={} radius={}", count, radius);
            assert!(evaluated <= pair_count(count));
        }
    }

    #[test]
    fn test_sparse_grid_skips_far_pairs() {
        let mut ctx = SpawnContext::new(50.0, Some(9));
        let positions: Vec<Vec3> = (0..500).map(|_| ctx.random_in_bounds()).collect();
        let mut lines = LineList::new();
        let evaluated = UniformGrid::new().find(&positions, 1.0, &mut lines);
        assert!(evaluated < pair_count(500) / 10);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut grid = UniformGrid::new();
        let mut lines = LineList::new();
        assert_eq!(grid.find(&[Vec3::ZERO], 2.0, &mut lines), 0);
        assert_eq!(grid.find(&[Vec3::ZERO, Vec3::X], 0.0, &mut lines), 0);
        assert!(lines.is_empty());
        assert!(grid.last_config().is_none());
    }
}
