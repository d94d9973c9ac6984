//! # Constellation
//!
//! Ambient animated backgrounds: drifting particles linked into a proximity
//! graph, a spinning holo-globe, and falling glyph rain.
//!
//! ## Quick Start
//!
//! ```ignore
//! use constellation::prelude::*;
//!
//! fn main() -> Result<(), BackgroundError> {
//!     Background::new()
//!         .with_field(
//!             FieldConfig::new()
//!                 .with_particle_count(100)
//!                 .with_bounds(5.0)
//!                 .with_connection_radius(2.0),
//!         )
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particle field
//!
//! A [`ParticleField`] owns a fixed [`ParticleStore`]. Every frame it:
//!
//! 1. advances each position by its velocity and flips a velocity component
//!    once that coordinate is outside the bounding cube ([`physics::step`])
//! 2. rebuilds the connection line-list from scratch ([`ConnectionFinder`])
//! 3. hands positions and lines to the [`SceneAdapter`]
//!
//! Reflection is checked after the move, so a particle can sit past the
//! bound for one frame before heading back.
//!
//! ### Connections
//!
//! Two particles are connected when their distance is strictly less than the
//! connection radius. The default [`BruteForce`] finder checks all
//! `N(N-1)/2` pairs, which is fine for a few hundred particles.
//! [`UniformGrid`] buckets particles into cells no smaller than the radius
//! and produces the same line-list in the same order.
//!
//! ### Frame loop
//!
//! A [`FrameScheduler`] drives any [`Animation`]. It is started once and never
//! stopped. The host supplies a [`FramePacer`] that schedules the next tick;
//! in the windowed app that is a winit redraw request, in tests a counter.
//!
//! ```ignore
//! let field = ParticleField::new(FieldConfig::new().with_seed(7));
//! let mut scheduler = FrameScheduler::start(field, my_scene, my_pacer, Viewport::new(800, 600));
//! scheduler.tick()?;
//! ```
//!
//! ## Logging
//!
//! The library logs through the `log` facade. The `constellation` binary
//! installs `env_logger`; run with `RUST_LOG=debug` to see frame statistics.

pub mod camera;
pub mod config;
pub mod error;
pub mod field;
pub mod globe;
mod gpu;
pub mod particle;
pub mod physics;
pub mod proximity;
pub mod rain;
pub mod resize;
pub mod scene;
pub mod scheduler;
mod simulation;
pub mod spatial;
mod spawn;
pub mod time;
mod window;

pub use camera::PerspectiveCamera;
pub use config::{AnimationKind, BackgroundConfig, FieldConfig, GlobeConfig, RainConfig};
pub use error::{BackgroundError, ConfigError, GpuError, RenderError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec3};
pub use globe::{Globe, IcoSphere};
pub use gpu::GpuRenderer;
pub use particle::{Particle, ParticleStore};
pub use proximity::{BruteForce, ConnectionFinder, ConnectionStrategy, LineList};
pub use rain::{GlyphCell, GlyphRain};
pub use resize::{ResizeReactor, Viewport};
pub use scene::{Material, RenderableId, RotationRate, SceneAdapter, SceneRotation};
pub use scheduler::{Animation, FramePacer, FrameScheduler, SchedulerState};
pub use simulation::Background;
pub use spatial::UniformGrid;
pub use spawn::SpawnContext;
pub use time::FrameClock;
pub use window::WindowPacer;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use constellation::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AnimationKind, BackgroundConfig, FieldConfig, GlobeConfig, RainConfig};
    pub use crate::error::BackgroundError;
    pub use crate::proximity::ConnectionStrategy;
    pub use crate::resize::Viewport;
    pub use crate::scene::SceneAdapter;
    pub use crate::scheduler::{Animation, FramePacer, FrameScheduler};
    pub use crate::simulation::Background;
    pub use crate::{ParticleField, Vec3};
}
