//! Oversized star sprite, regenerated rarely and rotated with the time of day.

use crate::color::Rgb;
use crate::display::PixelBuffer;
use crate::sky::{Period, SkyReading};
use std::f32::consts::TAU;

/// Sprite is this many times the viewport in each axis so rotation never shows an edge
pub const OVERSCAN: u32 = 3;
/// Upper bound on the random star count
pub const MAX_STARS: f32 = 1500.0;
/// Largest scatter star radius, in px
pub const MAX_STAR_RADIUS: f32 = 2.0;
/// Vertical position of the rotation pivot on screen
pub const PIVOT_Y: f32 = 150.0;
/// Below this dusk factor daytime stars are skipped entirely
pub const DAYTIME_STAR_CUTOFF: f32 = 0.15;

/// Fixed accents: (dx, dy, radius) from the sprite center
const MARKERS: [(f32, f32, f32); 8] = [
    (0.0, 0.0, 3.0),
    (150.0, 0.0, 2.0),
    (205.0, 17.0, 3.0),
    (150.0, 120.0, 1.0),
    (200.0, 110.0, 2.0),
    (125.0, 180.0, 3.0),
    (120.0, 225.0, 2.0),
    (150.0, 290.0, 3.0),
];

/// Cached star sprite tagged with the simulated day it was made on
pub struct Starfield {
    sprite: PixelBuffer,
    generated_on: u64,
}

impl Starfield {
    /// Scatter a fresh sky for a `width x height` viewport
    pub fn generate(width: u32, height: u32, day_counter: u64, color: Rgb, rng: &mut fastrand::Rng) -> Self {
        let sprite_w = width * OVERSCAN;
        let sprite_h = height * OVERSCAN;
        let mut sprite = PixelBuffer::with_size(sprite_w, sprite_h);
        let [r, g, b] = color;

        let count = (rng.f32() * MAX_STARS).ceil() as usize;
        for _ in 0..count {
            let x = rng.f32() * sprite_w as f32;
            let y = rng.f32() * sprite_h as f32;
            let radius = rng.f32() * MAX_STAR_RADIUS;
            let alpha = rng.f32() / 3.0 + 0.66;
            sprite.fill_disc(x, y, radius, r, g, b, (alpha * 255.0) as u8);
        }

        let cx = sprite_w as f32 / 2.0;
        let cy = sprite_h as f32 / 2.0;
        for (dx, dy, radius) in MARKERS {
            sprite.fill_disc(cx + dx, cy + dy, radius, r, g, b, 255);
        }

        log::info!(
            "Generated {}x{} starfield with {} stars on day {}",
            sprite_w,
            sprite_h,
            count,
            day_counter
        );

        Self {
            sprite,
            generated_on: day_counter,
        }
    }

    pub fn sprite(&self) -> &PixelBuffer {
        &self.sprite
    }

    pub fn generated_on(&self) -> u64 {
        self.generated_on
    }

    /// Whether the sprite was made for a `width x height` viewport
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.sprite.width() == width * OVERSCAN && self.sprite.height() == height * OVERSCAN
    }

    /// A new day has begun and it is bright afternoon, so a swap goes unseen
    pub fn is_stale(&self, day_counter: u64, reading: &SkyReading) -> bool {
        day_counter > self.generated_on && reading.period == Period::Day && reading.subscale > 0.5
    }
}

/// Opacity for the starfield this frame, or None when it should not be drawn
pub fn visibility(reading: &SkyReading) -> Option<f32> {
    match reading.period {
        Period::Day if reading.dusk_factor > DAYTIME_STAR_CUTOFF => Some(reading.dusk_factor),
        Period::Day => None,
        Period::Dusk | Period::Night => Some(1.0),
    }
}

/// One full turn per day
pub fn rotation(day_fraction: f32) -> f32 {
    TAU * day_fraction
}
