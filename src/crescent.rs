//! Moon illumination sprite.
//!
//! The lit part of the moon is a full disc with a second, larger circle either
//! cut out of it (waning edges, new moon side) or intersected with it (gibbous
//! side). The cutting circle's radius blows up near the quarters; past
//! [`FLAT_FILL_THRESHOLD`] it is replaced by a straight half-disc cut.

use crate::color::Rgb;
use crate::display::PixelBuffer;

/// Cut radius beyond which the arc is treated as a straight edge
pub const FLAT_FILL_THRESHOLD: f32 = 3000.0;
/// Share of the half-cycle at each end that gets linearized
const EDGE_WINDOW: f32 = 0.01;
/// Largest push toward 0/1 applied inside the edge window
const EDGE_NUDGE: f32 = 0.0007;
/// Scales the extra cut radius that closes the seam at new/full moon
const SEAM_PAD: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Remove the cut shape from the disc
    Subtract,
    /// Keep only the part of the disc inside the cut shape
    Intersect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutShape {
    /// Straight cut along the vertical diameter
    HalfDisc(Half),
    /// Circle whose center sits `center_offset` px right of the disc center
    Circle { center_offset: f32, radius: f32 },
}

/// Geometry of one lunar phase, before any pixels are touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrescentCut {
    /// Position within the current half-cycle, before easing
    pub subcarve: f32,
    /// `subcarve` after easing and edge linearization
    pub eased: f32,
    pub carve: f32,
    pub mode: MaskMode,
    pub shape: CutShape,
}

/// Exponential ease-in-out; exact endpoints pass through untouched
fn ease_in_out_expo(t: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * 2f32.powf(10.0 * (t - 1.0))
    } else {
        0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0)))
    }
}

/// Push values in the outer edge window toward 0/1 so the cut radius never
/// creeps asymptotically toward the disc radius.
fn linearize_ends(t: f32) -> f32 {
    let edge = (0.5 - (0.5 - t).abs()) * 2.0 / EDGE_WINDOW;
    if edge >= 1.0 {
        return t;
    }
    let nudge = (1.0 - edge) * EDGE_NUDGE;
    if t > 0.5 {
        (t + nudge).min(1.0)
    } else {
        (t - nudge).max(0.0)
    }
}

impl CrescentCut {
    /// Plan the cut for `phase` in [0, 1) on a disc of `radius` px
    pub fn plan(phase: f32, radius: f32) -> Self {
        let subcarve = phase.rem_euclid(0.5) * 2.0;
        let eased = linearize_ends(ease_in_out_expo(subcarve));
        let carve = eased / 2.0 + if phase >= 0.5 { 0.5 } else { 0.0 };

        let mode = if carve <= 0.25 || carve >= 0.75 {
            MaskMode::Subtract
        } else {
            MaskMode::Intersect
        };

        let quarter = carve % 0.5;
        let denominator = (1.0 - quarter * 4.0).abs();

        // Same as radius / denominator > threshold, without dividing by zero
        let shape = if denominator * FLAT_FILL_THRESHOLD < radius {
            let right = (carve < 0.25 || carve > 0.75) ^ (carve < 0.5);
            CutShape::HalfDisc(if right { Half::Right } else { Half::Left })
        } else {
            let arc_radius = radius / denominator;
            let side = if quarter > 0.25 { 1.0 } else { -1.0 };
            CutShape::Circle {
                center_offset: side * (arc_radius * arc_radius - radius * radius).max(0.0).sqrt(),
                radius: arc_radius + SEAM_PAD * (0.5 - eased).abs(),
            }
        };

        Self {
            subcarve,
            eased,
            carve,
            mode,
            shape,
        }
    }

    /// Whether sprite point (`x`, `y`) is lit on a disc of `radius` centered at (`radius`, `radius`)
    pub fn is_lit(&self, radius: f32, x: f32, y: f32) -> bool {
        let dx = x - radius;
        let dy = y - radius;
        if dx * dx + dy * dy > radius * radius {
            return false;
        }

        let in_cut = match self.shape {
            CutShape::HalfDisc(Half::Right) => x >= radius,
            CutShape::HalfDisc(Half::Left) => x < radius,
            CutShape::Circle {
                center_offset,
                radius: cut,
            } => {
                let cx = dx - center_offset;
                cx * cx + dy * dy <= cut * cut
            },
        };

        match self.mode {
            MaskMode::Subtract => !in_cut,
            MaskMode::Intersect => in_cut,
        }
    }
}

/// Lit-moon sprite, reused until the phase or radius changes
pub struct MoonSprite {
    phase: f32,
    radius: f32,
    cut: CrescentCut,
    sprite: PixelBuffer,
}

impl MoonSprite {
    /// Render the lit part of the moon into a transparent `2r x 2r` sprite
    pub fn render(phase: f32, radius: f32, color: Rgb) -> Self {
        let cut = CrescentCut::plan(phase, radius);
        let size = (radius * 2.0).ceil().max(1.0) as u32;
        let mut sprite = PixelBuffer::with_size(size, size);

        for y in 0..size {
            for x in 0..size {
                if cut.is_lit(radius, x as f32 + 0.5, y as f32 + 0.5) {
                    sprite.set_pixel_rgba(x as i32, y as i32, color[0], color[1], color[2], 255);
                }
            }
        }

        Self {
            phase,
            radius,
            cut,
            sprite,
        }
    }

    pub fn matches(&self, phase: f32, radius: f32) -> bool {
        self.phase == phase && self.radius == radius
    }

    pub fn cut(&self) -> &CrescentCut {
        &self.cut
    }

    pub fn sprite(&self) -> &PixelBuffer {
        &self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celestial::MOON_RADIUS;
    use crate::color::WHITE;

    fn disc_pixels(radius: f32) -> usize {
        let mut full = PixelBuffer::with_size((radius * 2.0) as u32, (radius * 2.0) as u32);
        full.fill_disc(radius, radius, radius, 255, 255, 255, 255);
        full.covered_pixels()
    }

    fn lit(phase: f32) -> usize {
        MoonSprite::render(phase, MOON_RADIUS, WHITE).sprite().covered_pixels()
    }

    #[test]
    fn test_new_moon_is_dark() {
        assert_eq!(lit(0.0), 0);
        let cut = CrescentCut::plan(0.0, MOON_RADIUS);
        assert_eq!(cut.mode, MaskMode::Subtract);
        assert!(matches!(cut.shape, CutShape::Circle { .. }));
    }

    #[test]
    fn test_full_moon_is_whole_disc() {
        assert_eq!(lit(0.5), disc_pixels(MOON_RADIUS));
        assert_eq!(CrescentCut::plan(0.5, MOON_RADIUS).mode, MaskMode::Intersect);
    }

    #[test]
    fn test_quarters_use_flat_fill() {
        let first = CrescentCut::plan(0.25, MOON_RADIUS);
        assert_eq!(first.shape, CutShape::HalfDisc(Half::Right));
        assert_eq!(first.mode, MaskMode::Subtract);

        let last = CrescentCut::plan(0.75, MOON_RADIUS);
        assert_eq!(last.shape, CutShape::HalfDisc(Half::Left));
        assert_eq!(last.mode, MaskMode::Subtract);

        let half = disc_pixels(MOON_RADIUS) / 2;
        assert_eq!(lit(0.25), half);
        assert_eq!(lit(0.75), half);
    }

    #[test]
    fn test_quarters_light_opposite_sides() {
        let first = MoonSprite::render(0.25, MOON_RADIUS, WHITE);
        let last = MoonSprite::render(0.75, MOON_RADIUS, WHITE);
        assert!(first.sprite().get_pixel_rgba(10, 50).unwrap().3 > 0);
        assert_eq!(first.sprite().get_pixel_rgba(90, 50).unwrap().3, 0);
        assert_eq!(last.sprite().get_pixel_rgba(10, 50).unwrap().3, 0);
        assert!(last.sprite().get_pixel_rgba(90, 50).unwrap().3 > 0);
    }

    #[test]
    fn test_waxing_grows() {
        let full = disc_pixels(MOON_RADIUS);
        let crescent = lit(0.1);
        let gibbous = lit(0.4);
        assert!(crescent > 0 && crescent < full / 2, "crescent lit {}", crescent);
        assert!(gibbous > full / 2 && gibbous < full, "gibbous lit {}", gibbous);
    }

    #[test]
    fn test_waning_shrinks() {
        let full = disc_pixels(MOON_RADIUS);
        let gibbous = lit(0.6);
        let crescent = lit(0.9);
        assert!(gibbous > full / 2, "gibbous lit {}", gibbous);
        assert!(crescent < full / 2, "crescent lit {}", crescent);
    }

    #[test]
    fn test_cut_is_finite_everywhere() {
        for i in 0..2000 {
            let cut = CrescentCut::plan(i as f32 / 2000.0, MOON_RADIUS);
            assert!((0.0..=1.0).contains(&cut.carve));
            if let CutShape::Circle {
                center_offset,
                radius,
            } = cut.shape
            {
                assert!(center_offset.is_finite() && radius.is_finite());
                assert!(radius <= FLAT_FILL_THRESHOLD + SEAM_PAD);
            }
        }
    }

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_expo(0.0), 0.0);
        assert_eq!(ease_in_out_expo(1.0), 1.0);
        assert_eq!(ease_in_out_expo(0.5), 0.5);
        assert!(ease_in_out_expo(0.1) < 0.01);
    }

    #[test]
    fn test_linearize_pushes_edges_out() {
        assert_eq!(linearize_ends(0.0), 0.0);
        assert_eq!(linearize_ends(1.0), 1.0);
        assert!(linearize_ends(0.001) < 0.001);
        assert!(linearize_ends(0.999) > 0.999);
        assert_eq!(linearize_ends(0.3), 0.3);
    }

    #[test]
    fn test_sprite_cache_key() {
        let moon = MoonSprite::render(0.3, MOON_RADIUS, WHITE);
        assert!(moon.matches(0.3, MOON_RADIUS));
        assert!(!moon.matches(0.31, MOON_RADIUS));
        assert_eq!(moon.sprite().width(), 100);
    }
}
