//! Frame scheduler: drives an [`Animation`] once per display refresh.
//!
//! The scheduler has a single running state, entered by [`FrameScheduler::start`]
//! and never left. Each [`tick`](FrameScheduler::tick) runs to completion:
//! update the animation, render, advance the scene rotation, then ask the
//! host for the next frame. The host owns the cadence through [`FramePacer`],
//! so tests drive ticks by hand and the windowed app drives them from redraw
//! events.
//!
//! A render fault returns from `tick` before the next frame is requested, so
//! the loop simply stops. There is no retry and no stop operation.

use log::{debug, info};

use crate::camera::PerspectiveCamera;
use crate::error::RenderError;
use crate::resize::{ResizeReactor, Viewport};
use crate::scene::{RotationRate, SceneAdapter, SceneRotation};
use crate::time::FrameClock;

/// Host primitive that schedules one callback on the next display refresh.
///
/// The scheduler re-registers itself every tick; there is no persistent
/// per-frame subscription.
pub trait FramePacer {
    fn request_frame(&mut self);
}

/// Something the frame scheduler can drive.
pub trait Animation {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Camera to render with. Its aspect is overwritten from the viewport.
    fn camera(&self) -> PerspectiveCamera;

    /// Rotation applied to the whole scene after each rendered frame.
    fn rotation_rate(&self) -> RotationRate;

    /// Create renderables. Called once, before the first tick.
    fn setup(&mut self, scene: &mut dyn SceneAdapter, viewport: Viewport);

    /// Advance one frame and push new geometry to the scene.
    fn update(&mut self, scene: &mut dyn SceneAdapter);

    /// React to a viewport change. Most animations ignore it.
    fn resize(&mut self, _viewport: Viewport) {}

    /// One-line description of the last frame for periodic logging.
    fn frame_summary(&self) -> Option<String> {
        None
    }
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn camera(&self) -> PerspectiveCamera {
        (**self).camera()
    }

    fn rotation_rate(&self) -> RotationRate {
        (**self).rotation_rate()
    }

    fn setup(&mut self, scene: &mut dyn SceneAdapter, viewport: Viewport) {
        (**self).setup(scene, viewport)
    }

    fn update(&mut self, scene: &mut dyn SceneAdapter) {
        (**self).update(scene)
    }

    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport)
    }

    fn frame_summary(&self) -> Option<String> {
        (**self).frame_summary()
    }
}

/// Lifecycle of a [`FrameScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Ticks are being scheduled. The only state.
    Running,
}

/// Owns the simulation context and drives it frame by frame.
pub struct FrameScheduler<A, S, P> {
    animation: A,
    scene: S,
    pacer: P,
    camera: PerspectiveCamera,
    rotation: SceneRotation,
    reactor: ResizeReactor,
    clock: FrameClock,
    state: SchedulerState,
}

impl<A, S, P> FrameScheduler<A, S, P>
where
    A: Animation,
    S: SceneAdapter,
    P: FramePacer,
{
    /// Set up the animation against `scene`, size it to `viewport`, and
    /// register the first frame.
    pub fn start(mut animation: A, mut scene: S, mut pacer: P, viewport: Viewport) -> Self {
        let reactor = ResizeReactor;
        let mut camera = animation.camera();
        reactor.apply(viewport, &mut camera, &mut scene);
        animation.setup(&mut scene, viewport);

        info!(
            "{} started at {}x{}",
            animation.name(),
            viewport.width,
            viewport.height
        );

        pacer.request_frame();

        Self {
            animation,
            scene,
            pacer,
            camera,
            rotation: SceneRotation::default(),
            reactor,
            clock: FrameClock::new(),
            state: SchedulerState::Running,
        }
    }

    /// Run one frame, then request the next one.
    pub fn tick(&mut self) -> Result<(), RenderError> {
        self.animation.update(&mut self.scene);
        self.scene.render(&self.camera, self.rotation)?;
        self.rotation.advance(self.animation.rotation_rate());

        if self.clock.update() {
            match self.animation.frame_summary() {
                Some(summary) => debug!("{:.1} fps, {}", self.clock.fps(), summary),
                None => debug!("{:.1} fps", self.clock.fps()),
            }
        }

        self.pacer.request_frame();
        Ok(())
    }

    /// Handle a viewport-size notification between ticks.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.reactor.apply(viewport, &mut self.camera, &mut self.scene) {
            self.animation.resize(viewport);
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn rotation(&self) -> SceneRotation {
        self.rotation
    }

    /// Frames completed since start.
    pub fn frames(&self) -> u64 {
        self.clock.frame()
    }
}
