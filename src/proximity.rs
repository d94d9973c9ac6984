//! Proximity graph: which particle pairs are close enough to draw a line.
//!
//! Connections are rebuilt from scratch every frame as a flat [`LineList`],
//! with no state carried between frames. [`BruteForce`] checks every
//! unordered pair, which is O(N²) per frame. That is cheap at the default
//! 100 particles, but it stops keeping up somewhere in the low thousands. Past
//! that point, swap in a spatial index through [`ConnectionFinder`], for
//! example [`UniformGrid`](crate::spatial::UniformGrid). The scheduler and
//! renderer do not change.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::spatial::UniformGrid;

/// Flat list of line-segment endpoints; every two points form one segment.
///
/// Keeps its allocation across frames but never its contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineList {
    vertices: Vec<Vec3>,
}

impl LineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(segments * 2),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Append one segment from `a` to `b`.
    #[inline]
    pub fn push_segment(&mut self, a: Vec3, b: Vec3) {
        self.vertices.push(a);
        self.vertices.push(b);
    }

    /// Number of segments (half the number of points).
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Segments as `(a, b)` endpoint pairs in insertion order.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.vertices.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Raw bytes for GPU upload (12 bytes per point).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Strategy for finding particle pairs within a connection radius.
///
/// Implementations must emit exactly the pairs `(i, j)` with `i < j` and
/// `distance < radius`, ordered by `i` then `j`. Every implementation then
/// produces an identical line-list for the same input.
pub trait ConnectionFinder {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Clear `out` and fill it with one segment per connected pair.
    ///
    /// Returns the number of candidate pairs whose distance was evaluated.
    fn find(&mut self, positions: &[Vec3], radius: f32, out: &mut LineList) -> usize;
}

/// All-pairs search. Evaluates exactly `N * (N - 1) / 2` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl ConnectionFinder for BruteForce {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn find(&mut self, positions: &[Vec3], radius: f32, out: &mut LineList) -> usize {
        out.clear();
        let mut evaluated = 0;

        for (i, &a) in positions.iter().enumerate() {
            for &b in &positions[i + 1..] {
                evaluated += 1;
                if a.distance(b) < radius {
                    out.push_segment(a, b);
                }
            }
        }

        evaluated
    }
}

/// Number of unordered pairs among `n` particles.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Selects a [`ConnectionFinder`] from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStrategy {
    /// Check every pair.
    #[default]
    BruteForce,
    /// Bucket particles into radius-sized cells first.
    UniformGrid,
}

impl ConnectionStrategy {
    pub fn finder(self) -> Box<dyn ConnectionFinder> {
        match self {
            ConnectionStrategy::BruteForce => Box::new(BruteForce),
            ConnectionStrategy::UniformGrid => Box::new(UniformGrid::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::SpawnContext;

    fn random_positions(count: usize, seed: u64) -> Vec<Vec3> {
        let mut ctx = SpawnContext::new(5.0, Some(seed));
        (0..count).map(|_| ctx.random_in_bounds()).collect()
    }

    #[test]
    fn test_two_close_particles_connect() {
        let positions = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)];
        let mut lines = LineList::new();
        BruteForce.find(&positions, 2.0, &mut lines);

        assert_eq!(lines.segment_count(), 1);
        assert_eq!(lines.as_slice(), &[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_two_distant_particles_do_not_connect() {
        let positions = [Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)];
        let mut lines = LineList::new();
        BruteForce.find(&positions, 2.0, &mut lines);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_radius_is_strict() {
        let positions = [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)];
        let mut lines = LineList::new();
        BruteForce.find(&positions, 2.0, &mut lines);
        assert_eq!(lines.segment_count(), 0);
    }

    #[test]
    fn test_evaluates_every_pair_once() {
        let positions = random_positions(100, 1);
        let mut lines = LineList::new();
        assert_eq!(BruteForce.find(&positions, 2.0, &mut lines), 4950);
        assert_eq!(pair_count(100), 4950);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(0), 0);
    }

    #[test]
    fn test_no_self_connections_and_symmetric() {
        let positions = random_positions(60, 2);
        let mut lines = LineList::new();
        BruteForce.find(&positions, 2.5, &mut lines);

        let index_of = |p: Vec3| positions.iter().position(|&q| q == p).unwrap();
        for (a, b) in lines.segments() {
            let (i, j) = (index_of(a), index_of(b));
            assert!(i < j, "pair ({}, {}) not in index order", i, j);
            // The reverse order measures the same distance
            assert!(positions[j].distance(positions[i]) < 2.5);
        }
    }

    #[test]
    fn test_repeated_find_is_identical() {
        let positions = random_positions(100, 3);
        let mut first = LineList::new();
        let mut second = LineList::new();
        BruteForce.find(&positions, 2.0, &mut first);
        BruteForce.find(&positions, 2.0, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_replaces_previous_frame() {
        let mut lines = LineList::new();
        lines.push_segment(Vec3::ONE, Vec3::ONE);
        BruteForce.find(&[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)], 2.0, &mut lines);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_line_list_bytes() {
        let mut lines = LineList::with_capacity(1);
        lines.push_segment(Vec3::ZERO, Vec3::X);
        assert_eq!(lines.as_bytes().len(), 24);
    }

    #[test]
    fn test_strategy_finder_names() {
        assert_eq!(ConnectionStrategy::BruteForce.finder().name(), "brute-force");
        assert_eq!(ConnectionStrategy::UniformGrid.finder().name(), "uniform-grid");
    }
}
