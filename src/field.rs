//! The particle field: drifting points linked into a proximity graph.
//!
//! Each frame:
//! 1. [`physics::step`] moves every particle and reflects off the cube.
//! 2. The [`ConnectionFinder`] rebuilds the line-list from the new positions.
//! 3. Positions and lines replace the geometry of two renderables.

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::config::FieldConfig;
use crate::particle::ParticleStore;
use crate::physics;
use crate::proximity::{ConnectionFinder, LineList};
use crate::resize::Viewport;
use crate::scene::{hex_color, Material, RenderableId, RotationRate, SceneAdapter};
use crate::scheduler::Animation;
use crate::spawn::SpawnContext;

/// Simulation context for the particle field.
pub struct ParticleField {
    config: FieldConfig,
    store: ParticleStore,
    finder: Box<dyn ConnectionFinder>,
    /// Scratch copy of positions in index order, reused every frame.
    positions: Vec<Vec3>,
    lines: LineList,
    pairs_evaluated: usize,
    points_id: Option<RenderableId>,
    lines_id: Option<RenderableId>,
}

impl ParticleField {
    /// Spawn `config.particle_count` particles inside the bounds.
    pub fn new(config: FieldConfig) -> Self {
        let mut ctx = SpawnContext::new(config.bounds, config.seed);
        let store = ParticleStore::spawn(config.particle_count, config.max_speed, &mut ctx);
        Self::from_store(config, store)
    }

    /// Use an explicit store. `config.particle_count` is ignored.
    pub fn from_store(config: FieldConfig, store: ParticleStore) -> Self {
        let finder = config.strategy.finder();
        let mut positions = Vec::with_capacity(store.len());
        store.write_positions(&mut positions);
        Self {
            config,
            store,
            finder,
            positions,
            lines: LineList::new(),
            pairs_evaluated: 0,
            points_id: None,
            lines_id: None,
        }
    }

    /// Replace the connection search strategy.
    pub fn with_finder(mut self, finder: Box<dyn ConnectionFinder>) -> Self {
        self.finder = finder;
        self
    }

    /// Move particles one step and rebuild the connections.
    ///
    /// Returns the number of connections in the new line-list.
    pub fn advance(&mut self) -> usize {
        physics::step(&mut self.store, self.config.bounds);
        self.rebuild_connections()
    }

    /// Rebuild the line-list from the current positions without moving anything.
    pub fn rebuild_connections(&mut self) -> usize {
        self.store.write_positions(&mut self.positions);
        self.pairs_evaluated = self
            .finder
            .find(&self.positions, self.config.connection_radius, &mut self.lines);
        self.lines.segment_count()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParticleStore {
        &mut self.store
    }

    /// Positions as of the last rebuild.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Line-list from the last rebuild.
    pub fn lines(&self) -> &LineList {
        &self.lines
    }

    /// Pairs evaluated by the last rebuild.
    pub fn pairs_evaluated(&self) -> usize {
        self.pairs_evaluated
    }

    pub fn finder_name(&self) -> &'static str {
        self.finder.name()
    }
}

impl Animation for ParticleField {
    fn name(&self) -> &'static str {
        "constellation"
    }

    fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::default().at(Vec3::new(0.0, 0.0, self.config.camera_distance))
    }

    fn rotation_rate(&self) -> RotationRate {
        self.config.rotation
    }

    fn setup(&mut self, scene: &mut dyn SceneAdapter, _viewport: Viewport) {
        let color = hex_color(self.config.color);
        self.store.write_positions(&mut self.positions);
        self.points_id = Some(scene.add_points(
            &self.positions,
            Material::points(color, self.config.point_size, self.config.point_opacity),
        ));
        self.lines_id =
            Some(scene.add_lines(&[], Material::lines(color, self.config.line_opacity)));

        log::info!(
            "{} particles, radius {}, {} search",
            self.store.len(),
            self.config.connection_radius,
            self.finder.name()
        );
    }

    fn update(&mut self, scene: &mut dyn SceneAdapter) {
        self.advance();
        if let Some(id) = self.points_id {
            scene.set_positions(id, &self.positions);
        }
        if let Some(id) = self.lines_id {
            scene.set_positions(id, self.lines.as_slice());
        }
    }

    fn frame_summary(&self) -> Option<String> {
        Some(format!(
            "{} connections ({} pairs checked)",
            self.lines.segment_count(),
            self.pairs_evaluated
        ))
    }
}
