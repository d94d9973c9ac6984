//! Glyph rain: columns of falling characters.
//!
//! Every tick each column emits one glyph at its drop's row and the drop
//! moves down a row. Once a drop is below the bottom edge it restarts at the
//! top with a small chance per tick, which staggers the columns over time.
//!
//! The column count is fixed by the first non-empty layout. Later resizes
//! only change the height drops fall through, so widening the window leaves
//! the right side empty until restart. Sprites are resized to the new glyph
//! height on the next update.
//!
//! Digits appear in both [`LATIN`] and [`NUMS`], so they are drawn twice as
//! often as any single letter.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::camera::PerspectiveCamera;
use crate::config::RainConfig;
use crate::resize::Viewport;
use crate::scene::{hex_color, Material, RenderableId, RotationRate, SceneAdapter};
use crate::scheduler::Animation;

pub const KATAKANA: &str = "アァカサタナハマヤャラワガザダバパイィキシチニヒミリヰギジヂビピウゥクスツヌフムユュルグズブヅプエェケセテネヘメレヱゲゼデベペオォコソトノホモヨョロヲゴゾドボポヴッン";
pub const LATIN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const NUMS: &str = "0123456789";

/// One glyph drawn this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphCell {
    pub column: usize,
    /// Row in glyph units; the glyph's baseline sits at `row * font_size` pixels.
    pub row: u32,
    pub glyph: char,
    pub highlighted: bool,
}

pub struct GlyphRain {
    config: RainConfig,
    rng: SmallRng,
    alphabet: Vec<char>,
    /// Row of each column's drop, starting at 1.
    drops: Vec<u32>,
    viewport: Viewport,
    cells: Vec<GlyphCell>,
    normal: Vec<Vec3>,
    highlighted: Vec<Vec3>,
    normal_id: Option<RenderableId>,
    highlight_id: Option<RenderableId>,
    /// Viewport height the sprite materials were last sized for.
    sized_for: u32,
}

impl GlyphRain {
    pub fn new(config: RainConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let alphabet = KATAKANA.chars().chain(LATIN.chars()).chain(NUMS.chars()).collect();
        Self {
            config,
            rng,
            alphabet,
            drops: Vec::new(),
            viewport: Viewport::new(0, 0),
            cells: Vec::new(),
            normal: Vec::new(),
            highlighted: Vec::new(),
            normal_id: None,
            highlight_id: None,
            sized_for: 0,
        }
    }

    /// Track the viewport. The first non-empty call fixes the column count
    /// at `ceil(width / font_size)`.
    pub fn layout(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        if self.drops.is_empty() {
            let columns = viewport.width.div_ceil(self.config.font_size) as usize;
            self.drops = vec![1; columns];
        }
        self.viewport = viewport;
    }

    /// Emit one glyph per column and advance every drop.
    pub fn step(&mut self) -> &[GlyphCell] {
        self.cells.clear();
        let font = self.config.font_size;
        let height = self.viewport.height;

        for (column, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.alphabet[self.rng.gen_range(0..self.alphabet.len())];
            let highlighted = self.rng.gen::<f64>() < self.config.highlight_chance;
            self.cells.push(GlyphCell {
                column,
                row: *drop,
                glyph,
                highlighted,
            });

            if u64::from(*drop) * u64::from(font) > u64::from(height)
                && self.rng.gen::<f64>() < self.config.reset_chance
            {
                *drop = 0;
            }
            *drop += 1;
        }

        &self.cells
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    /// Glyphs from the last step.
    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    fn half_extents(&self) -> Vec2 {
        let mut camera = PerspectiveCamera::default();
        if !self.viewport.is_empty() {
            camera.set_aspect(self.viewport.aspect());
        }
        camera.visible_half_extents(self.config.camera_distance)
    }

    /// Map a cell to the z = 0 plane so it lands on its pixel position.
    pub fn world_position(&self, cell: &GlyphCell) -> Vec3 {
        let half = self.half_extents();
        let font = self.config.font_size as f32;
        let width = self.viewport.width.max(1) as f32;
        let height = self.viewport.height.max(1) as f32;

        let x = ((cell.column as f32 + 0.5) * font / width * 2.0 - 1.0) * half.x;
        let y = (1.0 - cell.row as f32 * font / height * 2.0) * half.y;
        Vec3::new(x, y, 0.0)
    }

    /// One glyph cell's height in world units.
    fn glyph_size(&self) -> f32 {
        let height = self.viewport.height.max(1) as f32;
        self.config.font_size as f32 / height * 2.0 * self.half_extents().y
    }

    /// Normal and highlighted sprite materials for the current viewport.
    fn materials(&self) -> (Material, Material) {
        let size = self.glyph_size();
        (
            Material::points(hex_color(self.config.color), size, 1.0),
            Material::points(hex_color(self.config.highlight_color), size, 1.0),
        )
    }
}

impl Animation for GlyphRain {
    fn name(&self) -> &'static str {
        "rain"
    }

    fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::default().at(Vec3::new(0.0, 0.0, self.config.camera_distance))
    }

    fn rotation_rate(&self) -> RotationRate {
        RotationRate::ZERO
    }

    fn setup(&mut self, scene: &mut dyn SceneAdapter, viewport: Viewport) {
        self.layout(viewport);
        let (normal, highlighted) = self.materials();
        self.normal_id = Some(scene.add_points(&[], normal));
        self.highlight_id = Some(scene.add_points(&[], highlighted));
        self.sized_for = self.viewport.height;
        log::info!("rain: {} columns of {}px glyphs", self.columns(), self.config.font_size);
    }

    fn update(&mut self, scene: &mut dyn SceneAdapter) {
        self.step();

        if self.viewport.height != self.sized_for {
            let (normal, highlighted) = self.materials();
            if let Some(id) = self.normal_id {
                scene.set_material(id, normal);
            }
            if let Some(id) = self.highlight_id {
                scene.set_material(id, highlighted);
            }
            self.sized_for = self.viewport.height;
        }

        let mut normal = std::mem::take(&mut self.normal);
        let mut highlighted = std::mem::take(&mut self.highlighted);
        normal.clear();
        highlighted.clear();
        for cell in &self.cells {
            let p = self.world_position(cell);
            if cell.highlighted {
                highlighted.push(p);
            } else {
                normal.push(p);
            }
        }

        if let Some(id) = self.normal_id {
            scene.set_positions(id, &normal);
        }
        if let Some(id) = self.highlight_id {
            scene.set_positions(id, &highlighted);
        }
        self.normal = normal;
        self.highlighted = highlighted;
    }

    fn resize(&mut self, viewport: Viewport) {
        self.layout(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain(reset_chance: f64, highlight_chance: f64) -> GlyphRain {
        GlyphRain::new(RainConfig {
            reset_chance,
            highlight_chance,
            seed: Some(3),
            ..Default::default()
        })
    }

    #[test]
    fn test_columns_round_up() {
        let mut r = rain(0.0, 0.0);
        r.layout(Viewport::new(100, 64));
        assert_eq!(r.columns(), 7);
        assert!(r.drops().iter().all(|&d| d == 1));
    }

    #[test]
    fn test_columns_fixed_after_first_layout() {
        let mut r = rain(0.0, 0.0);
        r.layout(Viewport::new(0, 0));
        assert_eq!(r.columns(), 0);
        r.layout(Viewport::new(160, 64));
        r.layout(Viewport::new(320, 64));
        assert_eq!(r.columns(), 10);
    }

    #[test]
    fn test_drops_fall_one_row_per_step() {
        let mut r = rain(1.0, 0.0);
        r.layout(Viewport::new(32, 64));
        let cells = r.step().to_vec();
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.row == 1 && !c.highlighted));
        r.step();
        assert_eq!(r.drops(), &[3, 3]);
    }

    #[test]
    fn test_reset_only_below_bottom() {
        // 64px tall, 16px glyphs: row 4 sits on the edge, row 5 is past it
        let mut r = rain(1.0, 0.0);
        r.layout(Viewport::new(16, 64));
        for _ in 0..4 {
            r.step();
        }
        assert_eq!(r.drops(), &[5]);
        r.step();
        assert_eq!(r.cells()[0].row, 5);
        assert_eq!(r.drops(), &[1]);
    }

    #[test]
    fn test_zero_reset_chance_keeps_falling() {
        let mut r = rain(0.0, 0.0);
        r.layout(Viewport::new(16, 64));
        for _ in 0..20 {
            r.step();
        }
        assert_eq!(r.drops(), &[21]);
    }

    #[test]
    fn test_highlight_chance_extremes() {
        let mut r = rain(0.0, 1.0);
        r.layout(Viewport::new(160, 64));
        assert!(r.step().iter().all(|c| c.highlighted));

        let mut r = rain(0.0, 0.0);
        r.layout(Viewport::new(160, 64));
        assert!(r.step().iter().all(|c| !c.highlighted));
    }

    #[test]
    fn test_digits_weighted_twice() {
        let r = rain(0.0, 0.0);
        assert_eq!(r.alphabet.len(), KATAKANA.chars().count() + 26 + 20);
        assert_eq!(r.alphabet.iter().filter(|c| c.is_ascii_digit()).count(), 20);
        assert_eq!(r.alphabet.iter().filter(|&&c| c == '7').count(), 2);
    }

    #[test]
    fn test_glyphs_from_alphabet() {
        let mut r = rain(0.0, 0.0);
        r.layout(Viewport::new(800, 64));
        for cell in r.step() {
            assert!(
                KATAKANA.contains(cell.glyph)
                    || LATIN.contains(cell.glyph)
                    || NUMS.contains(cell.glyph)
            );
        }
    }

    #[test]
    fn test_world_position_maps_edges() {
        let mut r = rain(0.0, 0.0);
        r.layout(Viewport::new(32, 32));
        let half = r.half_extents();

        let top_left = r.world_position(&GlyphCell {
            column: 0,
            row: 0,
            glyph: 'A',
            highlighted: false,
        });
        assert!((top_left.x - (-0.5 * half.x)).abs() < 1e-5);
        assert!((top_left.y - half.y).abs() < 1e-5);

        let bottom = r.world_position(&GlyphCell {
            column: 1,
            row: 2,
            glyph: 'A',
            highlighted: false,
        });
        assert!((bottom.x - 0.5 * half.x).abs() < 1e-5);
        assert!((bottom.y + half.y).abs() < 1e-5);
    }
}
