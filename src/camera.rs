//! Perspective camera for the background scenes.

use glam::{Mat4, Vec2, Vec3};

/// Fixed perspective camera looking down -Z from its position.
///
/// The projection matrix is cached and recomputed only when the aspect ratio
/// changes through [`set_aspect`](Self::set_aspect).
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// World-space position.
    pub position: Vec3,
    aspect: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Create a camera at the origin.
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y,
            near,
            far,
            position: Vec3::ZERO,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Place the camera at `position`.
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Current aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Set the aspect ratio and recompute the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far);
    }

    /// Cached projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Clip-space scale of a unit view-space offset, used to size point sprites.
    pub fn projection_scale(&self) -> Vec2 {
        Vec2::new(self.projection.x_axis.x, self.projection.y_axis.y)
    }

    /// Half extents of the visible plane at `distance` in front of the camera.
    pub fn visible_half_extents(&self, distance: f32) -> Vec2 {
        let half_h = distance * (self.fov_y.to_radians() * 0.5).tan();
        Vec2::new(half_h * self.aspect, half_h)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1.0, 0.1, 1000.0)
    }
}
