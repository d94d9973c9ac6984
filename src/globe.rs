//! Holo-globe: a slowly spinning wireframe icosphere wrapped in a point shell.
//!
//! The globe's geometry never changes after setup, so each frame only
//! re-renders it under the scheduler's scene rotation.

use std::collections::HashMap;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::config::GlobeConfig;
use crate::proximity::LineList;
use crate::resize::Viewport;
use crate::scene::{hex_color, Material, RotationRate, SceneAdapter};
use crate::scheduler::Animation;

/// Golden ratio, used for the icosahedron's vertices
const PHI: f32 = 1.618_034;

const ICOSAHEDRON_VERTICES: [Vec3; 12] = [
    Vec3::new(-1.0, PHI, 0.0),
    Vec3::new(1.0, PHI, 0.0),
    Vec3::new(-1.0, -PHI, 0.0),
    Vec3::new(1.0, -PHI, 0.0),
    Vec3::new(0.0, -1.0, PHI),
    Vec3::new(0.0, 1.0, PHI),
    Vec3::new(0.0, -1.0, -PHI),
    Vec3::new(0.0, 1.0, -PHI),
    Vec3::new(PHI, 0.0, -1.0),
    Vec3::new(PHI, 0.0, 1.0),
    Vec3::new(-PHI, 0.0, -1.0),
    Vec3::new(-PHI, 0.0, 1.0),
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Barycentric key of a subdivision point: up to three `(corner, weight)`
/// pairs, sorted, with zero weights dropped. Shared edge points get the same
/// key from both faces, so deduplication is exact.
type PointKey = [(u8, u16); 3];

/// Subdivided icosahedron projected onto a sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct IcoSphere {
    /// Unique vertices on the sphere.
    pub vertices: Vec<Vec3>,
    /// Unique edges as vertex index pairs `(low, high)`.
    pub edges: Vec<(u32, u32)>,
}

impl IcoSphere {
    /// Subdivide each icosahedron face into `(detail + 1)^2` triangles and
    /// push every vertex onto the sphere of `radius`.
    pub fn new(radius: f32, detail: u32) -> Self {
        let cols = detail as usize + 1;
        let mut vertices = Vec::new();
        let mut index_of: HashMap<PointKey, u32> = HashMap::new();
        let mut edges = Vec::new();
        let mut seen_edges = std::collections::HashSet::new();

        for face in ICOSAHEDRON_FACES {
            // grid[i][j] for i in 0..=cols, j in 0..=cols - i
            let grid: Vec<Vec<u32>> = (0..=cols)
                .map(|i| {
                    let rows = cols - i;
                    (0..=rows)
                        .map(|j| {
                            let weights = [rows - j, j, i];
                            let key = point_key(face, weights);
                            *index_of.entry(key).or_insert_with(|| {
                                let p = face
                                    .iter()
                                    .zip(weights)
                                    .map(|(&corner, w)| ICOSAHEDRON_VERTICES[corner] * w as f32)
                                    .sum::<Vec3>();
                                vertices.push(p.normalize() * radius);
                                (vertices.len() - 1) as u32
                            })
                        })
                        .collect()
                })
                .collect();

            let mut add_edge = |a: u32, b: u32| {
                let edge = (a.min(b), a.max(b));
                if seen_edges.insert(edge) {
                    edges.push(edge);
                }
            };

            for i in 0..cols {
                let rows = cols - i;
                for j in 0..2 * rows - 1 {
                    let k = j / 2;
                    let tri = if j % 2 == 0 {
                        [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                    } else {
                        [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                    };
                    add_edge(tri[0], tri[1]);
                    add_edge(tri[1], tri[2]);
                    add_edge(tri[2], tri[0]);
                }
            }
        }

        Self { vertices, edges }
    }

    /// Edges as a flat line-list.
    pub fn wireframe(&self) -> LineList {
        let mut lines = LineList::with_capacity(self.edges.len());
        for &(a, b) in &self.edges {
            lines.push_segment(self.vertices[a as usize], self.vertices[b as usize]);
        }
        lines
    }
}

fn point_key(face: [usize; 3], weights: [usize; 3]) -> PointKey {
    let mut key = [(u8::MAX, 0u16); 3];
    let mut n = 0;
    for (&corner, w) in face.iter().zip(weights) {
        if w > 0 {
            key[n] = (corner as u8, w as u16);
            n += 1;
        }
    }
    key[..n].sort_unstable();
    key
}

/// The globe animation.
pub struct Globe {
    config: GlobeConfig,
    wire: IcoSphere,
    shell: IcoSphere,
}

impl Globe {
    pub fn new(config: GlobeConfig) -> Self {
        let wire = IcoSphere::new(config.radius, config.detail);
        let shell = IcoSphere::new(config.shell_radius, config.shell_detail);
        Self { config, wire, shell }
    }

    pub fn wire(&self) -> &IcoSphere {
        &self.wire
    }

    pub fn shell(&self) -> &IcoSphere {
        &self.shell
    }
}

impl Animation for Globe {
    fn name(&self) -> &'static str {
        "globe"
    }

    fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::default().at(Vec3::new(0.0, 0.0, self.config.camera_distance))
    }

    fn rotation_rate(&self) -> RotationRate {
        self.config.rotation
    }

    fn setup(&mut self, scene: &mut dyn SceneAdapter, _viewport: Viewport) {
        let color = hex_color(self.config.color);
        let wireframe = self.wire.wireframe();
        scene.add_lines(wireframe.as_slice(), Material::lines(color, self.config.wire_opacity));
        scene.add_points(
            &self.shell.vertices,
            Material::points(color, self.config.point_size, self.config.point_opacity),
        );
        log::info!(
            "globe: {} wire edges, {} shell points",
            self.wire.edges.len(),
            self.shell.vertices.len()
        );
    }

    fn update(&mut self, _scene: &mut dyn SceneAdapter) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_icosahedron() {
        let sphere = IcoSphere::new(1.0, 0);
        assert_eq!(sphere.vertices.len(), 12);
        assert_eq!(sphere.edges.len(), 30);
    }

    #[test]
    fn test_subdivision_counts() {
        for detail in [1u32, 2, 5, 12] {
            let n = (detail as usize + 1).pow(2);
            let sphere = IcoSphere::new(1.5, detail);
            assert_eq!(sphere.vertices.len(), 10 * n + 2, "detail {}", detail);
            assert_eq!(sphere.edges.len(), 30 * n, "detail {}", detail);
        }
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let sphere = IcoSphere::new(1.51, 3);
        for v in &sphere.vertices {
            assert!((v.length() - 1.51).abs() < 1e-5);
        }
    }

    #[test]
    fn test_edges_are_short_and_unique() {
        let sphere = IcoSphere::new(1.0, 4);
        let mut seen = std::collections::HashSet::new();
        for &(a, b) in &sphere.edges {
            assert!(a < b);
            assert!(seen.insert((a, b)));
            let len = sphere.vertices[a as usize].distance(sphere.vertices[b as usize]);
            // Icosahedron edge on the unit sphere is ~1.05; subdivided by 5
            assert!(len < 0.3, "edge too long: {}", len);
        }
        assert_eq!(sphere.wireframe().segment_count(), sphere.edges.len());
    }

    #[test]
    fn test_default_globe_geometry() {
        let globe = Globe::new(GlobeConfig::default());
        assert_eq!(globe.shell().vertices.len(), 10 * 16 * 16 + 2);
        assert_eq!(globe.wire().edges.len(), 30 * 13 * 13);
        assert_eq!(globe.rotation_rate(), RotationRate::new(0.0005, 0.002));
    }
}
