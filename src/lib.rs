//! Clock-driven celestial backdrop.
//!
//! Every tick samples the wall clock, works out the lighting period, and
//! repaints a software frame: sky gradient, a rotating starfield, the sun or
//! a phase-accurate moon on a parabolic arc, and layered mountains with
//! cast shadows. See [`scene::SkyController`] for the entry point.

pub mod celestial;
pub mod clock;
pub mod color;
pub mod config;
pub mod crescent;
pub mod display;
pub mod lunar;
pub mod mountains;
pub mod scene;
pub mod sky;
pub mod starfield;

/// Largest f32 strictly below 1.0
pub(crate) const UNIT_MAX: f32 = 1.0 - f32::EPSILON / 2.0;

/// Clamp into [0, 1); NaN maps to 0
pub(crate) fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, UNIT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(0.4), 0.4);
        assert!(clamp_unit(1.0) < 1.0);
        assert!(clamp_unit(7.5) < 1.0);
        assert_eq!(clamp_unit(f32::NAN), 0.0);
    }
}
