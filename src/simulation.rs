//! Background builder and runner

use log::info;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::{AnimationKind, BackgroundConfig, FieldConfig, GlobeConfig, RainConfig};
use crate::error::BackgroundError;
use crate::field::ParticleField;
use crate::globe::Globe;
use crate::rain::GlyphRain;
use crate::scheduler::Animation;
use crate::window::App;

/// An animated background builder.
///
/// Use method chaining to configure, then call `.run()` to open a window and
/// animate until it is closed.
///
/// ```ignore
/// Background::new()
///     .with_field(FieldConfig::new().with_particle_count(400))
///     .run()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct Background {
    config: BackgroundConfig,
}

impl Background {
    /// Create a background with the default particle field.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: BackgroundConfig) -> Self {
        Self { config }
    }

    /// Select which animation to run.
    pub fn with_kind(mut self, kind: AnimationKind) -> Self {
        self.config.kind = kind;
        self
    }

    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.config.field = field;
        self
    }

    pub fn with_globe(mut self, globe: GlobeConfig) -> Self {
        self.config.globe = globe;
        self
    }

    pub fn with_rain(mut self, rain: RainConfig) -> Self {
        self.config.rain = rain;
        self
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    /// Build the configured animation without starting it.
    pub fn build_animation(&self) -> Box<dyn Animation> {
        match self.config.kind {
            AnimationKind::Constellation => Box::new(ParticleField::new(self.config.field.clone())),
            AnimationKind::Globe => Box::new(Globe::new(self.config.globe.clone())),
            AnimationKind::Rain => Box::new(GlyphRain::new(self.config.rain.clone())),
        }
    }

    /// Run the background. This blocks until the window is closed.
    ///
    /// Startup failures (invalid config, no window, no GPU) are returned. A
    /// fault during a frame only stops the animation.
    pub fn run(self) -> Result<(), BackgroundError> {
        self.config.validate()?;

        let animation = self.build_animation();
        info!("starting {} background", animation.name());

        let event_loop = EventLoop::new()?;
        // Frames are paced by redraw requests, not by polling
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new("Constellation", animation);
        event_loop.run_app(&mut app)?;

        match app.take_startup_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_sections() {
        let bg = Background::new()
            .with_kind(AnimationKind::Globe)
            .with_field(FieldConfig::new().with_particle_count(10))
            .with_rain(RainConfig {
                font_size: 20,
                ..Default::default()
            });
        assert_eq!(bg.config().kind, AnimationKind::Globe);
        assert_eq!(bg.config().field.particle_count, 10);
        assert_eq!(bg.config().rain.font_size, 20);
        assert_eq!(bg.config().globe, GlobeConfig::default());
    }

    #[test]
    fn test_build_animation_per_kind() {
        let field = FieldConfig::new().with_seed(1);
        for (kind, name) in [
            (AnimationKind::Constellation, "constellation"),
            (AnimationKind::Globe, "globe"),
            (AnimationKind::Rain, "rain"),
        ] {
            let bg = Background::new().with_kind(kind).with_field(field.clone());
            assert_eq!(bg.build_animation().name(), name);
        }
    }

    #[test]
    fn test_run_rejects_invalid_config_before_window() {
        let bg = Background::new().with_field(FieldConfig::new().with_connection_radius(0.0));
        assert!(matches!(bg.run(), Err(BackgroundError::Config(_))));
    }
}
