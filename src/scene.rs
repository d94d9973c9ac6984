//! The scene adapter seam.
//!
//! Animations never talk to the GPU directly. They create renderables and
//! replace their coordinate buffers through [`SceneAdapter`], which the wgpu
//! renderer implements for real and tests implement with a recorder.

use glam::{EulerRot, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;
use crate::error::RenderError;
use crate::resize::Viewport;

/// Handle to a renderable created through a [`SceneAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderableId(usize);

impl RenderableId {
    /// Wrap an adapter-specific slot index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The adapter-specific slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Cosmetic appearance of a renderable. Has no effect on simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// RGB colour, 0.0-1.0.
    pub color: Vec3,
    /// Alpha applied to the whole renderable.
    pub opacity: f32,
    /// Point size in world units. Ignored for lines.
    pub size: f32,
}

impl Material {
    /// Material for a point cloud.
    pub fn points(color: Vec3, size: f32, opacity: f32) -> Self {
        Self { color, opacity, size }
    }

    /// Material for line segments.
    pub fn lines(color: Vec3, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            size: 0.0,
        }
    }
}

/// Convert a `0xRRGGBB` colour to linear-ish RGB floats.
pub fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Constant per-tick angular increments, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationRate {
    /// Increment around the X axis.
    pub x: f32,
    /// Increment around the Y axis.
    pub y: f32,
}

impl RotationRate {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Accumulated rotation of the whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneRotation {
    pub x: f32,
    pub y: f32,
}

impl SceneRotation {
    /// Apply one tick's worth of rotation.
    pub fn advance(&mut self, rate: RotationRate) {
        self.x += rate.x;
        self.y += rate.y;
    }

    /// Model matrix for this rotation (X then Y, as Euler XYZ with Z = 0).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.x, self.y, 0.0)
    }
}

/// Rendering capability consumed by animations and the frame scheduler.
///
/// Coordinate buffers are flat lists of points. For line renderables every
/// two consecutive points form one segment.
pub trait SceneAdapter {
    /// Create a point-cloud renderable from a coordinate buffer.
    fn add_points(&mut self, positions: &[Vec3], material: Material) -> RenderableId;

    /// Create a line-segment renderable from a coordinate buffer.
    fn add_lines(&mut self, positions: &[Vec3], material: Material) -> RenderableId;

    /// Replace a renderable's coordinate buffer. The length may change.
    fn set_positions(&mut self, id: RenderableId, positions: &[Vec3]);

    /// Replace a renderable's material, e.g. when point size depends on the
    /// viewport.
    fn set_material(&mut self, id: RenderableId, material: Material);

    /// Resize the output surface.
    fn set_output_size(&mut self, viewport: Viewport);

    /// Render the current scene once.
    fn render(&mut self, camera: &PerspectiveCamera, rotation: SceneRotation)
        -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        let c = hex_color(0x00f0ff);
        assert_eq!(c.x, 0.0);
        assert!((c.y - 240.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 1.0);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut rotation = SceneRotation::default();
        let rate = RotationRate::new(0.0005, 0.001);
        for _ in 0..4 {
            rotation.advance(rate);
        }
        assert!((rotation.x - 0.002).abs() < 1e-7);
        assert!((rotation.y - 0.004).abs() < 1e-7);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let m = SceneRotation::default().matrix();
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-7));
    }
}
