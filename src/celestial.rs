//! Sun and moon placement along a parabolic arc across the viewport.

use crate::config::CelestialConfig;
use crate::sky::Period;

pub const SUN_RADIUS: f32 = 100.0;
pub const MOON_RADIUS: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    pub fn radius(self) -> f32 {
        match self {
            Body::Sun => SUN_RADIUS,
            Body::Moon => MOON_RADIUS,
        }
    }

    /// Body that owns the sky in `period`; nothing is up at dusk
    pub fn for_period(period: Period) -> Option<Self> {
        match period {
            Period::Day => Some(Body::Sun),
            Period::Night => Some(Body::Moon),
            Period::Dusk => None,
        }
    }
}

/// Center of a body in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// 0 at the apex (subscale 0.5), `height` at either end
pub fn vertical_position(subscale: f32, height: f32) -> f32 {
    (subscale * 2.0 - 1.0).powi(2) * height
}

/// Sweeps from fully off the left edge to fully off the right edge
pub fn horizontal_position(subscale: f32, width: f32, radius: f32) -> f32 {
    subscale * (width + 2.0 * radius) - radius
}

pub fn position(subscale: f32, width: f32, height: f32, radius: f32) -> BodyPosition {
    BodyPosition {
        x: horizontal_position(subscale, width, radius),
        y: vertical_position(subscale, height),
        radius,
    }
}

/// Triangular sun-height proxy: 1 at solar noon, falling linearly to 0.5 at
/// sunrise and sunset and below zero deep into the night.
pub fn azimuth(day_fraction: f32, celestial: &CelestialConfig) -> f32 {
    1.0 - (day_fraction - celestial.mid_daytime()).abs() / celestial.daytime_span()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_arc() {
        assert_eq!(vertical_position(0.0, 600.0), 600.0);
        assert_eq!(vertical_position(1.0, 600.0), 600.0);
        assert_eq!(vertical_position(0.5, 600.0), 0.0);
        assert!((vertical_position(0.25, 600.0) - 150.0).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_sweep_leaves_frame() {
        assert_eq!(horizontal_position(0.0, 800.0, SUN_RADIUS), -SUN_RADIUS);
        assert_eq!(horizontal_position(1.0, 800.0, SUN_RADIUS), 800.0 + SUN_RADIUS);
        assert_eq!(horizontal_position(0.5, 800.0, MOON_RADIUS), 400.0);
    }

    #[test]
    fn test_noon_scenario_left_of_center() {
        let c = CelestialConfig::default();
        let subscale = (0.5 - c.sunrise) / c.daytime_span();
        let pos = position(subscale, 800.0, 600.0, SUN_RADIUS);
        assert!(pos.x < 400.0 && pos.x > 0.0);
        // Still climbing: an earlier moment sits lower on screen
        let earlier = position(subscale - 0.05, 800.0, 600.0, SUN_RADIUS);
        assert!(earlier.y > pos.y);
    }

    #[test]
    fn test_azimuth_peaks_at_noon() {
        let c = CelestialConfig::default();
        assert!((azimuth(c.mid_daytime(), &c) - 1.0).abs() < 1e-6);
        assert!((azimuth(c.sunrise, &c) - 0.5).abs() < 1e-5);
        assert!((azimuth(c.sunset, &c) - 0.5).abs() < 1e-5);
        assert!(azimuth(0.0, &c) < 0.0);
    }

    #[test]
    fn test_bodies_per_period() {
        assert_eq!(Body::for_period(Period::Day), Some(Body::Sun));
        assert_eq!(Body::for_period(Period::Night), Some(Body::Moon));
        assert_eq!(Body::for_period(Period::Dusk), None);
        assert!(Body::Sun.radius() > Body::Moon.radius());
    }
}
