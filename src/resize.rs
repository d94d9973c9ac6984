//! Viewport size handling.

use log::debug;

use crate::camera::PerspectiveCamera;
use crate::scene::SceneAdapter;

/// Output size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimised window reports a zero dimension.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width / height. Only meaningful for non-empty viewports.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Reacts to viewport-size notifications by updating the camera projection
/// and the renderer's output size. Never touches animation state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeReactor;

impl ResizeReactor {
    /// Apply `viewport` to the camera and renderer.
    ///
    /// Returns `false` and leaves everything unchanged for an empty viewport.
    pub fn apply<S: SceneAdapter + ?Sized>(
        &self,
        viewport: Viewport,
        camera: &mut PerspectiveCamera,
        scene: &mut S,
    ) -> bool {
        if viewport.is_empty() {
            debug!("ignoring empty viewport {}x{}", viewport.width, viewport.height);
            return false;
        }
        camera.set_aspect(viewport.aspect());
        scene.set_output_size(viewport);
        debug!(
            "viewport {}x{} (aspect {:.3})",
            viewport.width,
            viewport.height,
            camera.aspect()
        );
        true
    }
}
