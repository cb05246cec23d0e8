//! Lighting period classification and sky color.

use crate::color::{mix, Rgb};
use crate::config::{CelestialConfig, Palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Dusk,
    Night,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Dusk => "dusk",
            Period::Night => "night",
        }
    }
}

/// Everything derived from the time of day that the rest of the frame needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyReading {
    pub period: Period,
    /// Progress through the active period's window, in [0, 1)
    pub subscale: f32,
    /// Twilight weight in [0, 1]; 1 throughout dusk
    pub dusk_factor: f32,
    pub sky_color: Rgb,
}

impl SkyReading {
    pub fn is_day(&self) -> bool {
        self.period == Period::Day
    }
}

#[inline]
fn within(value: f32, start: f32, end: f32) -> bool {
    value >= start && value < end
}

/// Period and progress for a day fraction.
///
/// Precedence matters when the configured windows overlap: dusk is tested
/// first, then night (anything outside the sun's window), and day is whatever
/// remains.
pub fn period_and_subscale(day_fraction: f32, celestial: &CelestialConfig) -> (Period, f32) {
    let c = celestial;
    let t = day_fraction;

    let (period, subscale) = if within(t, c.sunset, c.moonrise) {
        (Period::Dusk, (t - c.sunset) / (c.moonrise - c.sunset))
    } else if within(t, c.moonset, c.sunrise) {
        (Period::Dusk, (t - c.moonset) / (c.sunrise - c.moonset))
    } else if !within(t, c.sunrise, c.sunset) {
        // Night window runs moonrise -> moonset across midnight
        let elapsed = if t <= c.moonset {
            t + (1.0 - c.moonrise)
        } else {
            t - c.moonrise
        };
        (Period::Night, elapsed / c.nighttime_span())
    } else {
        (Period::Day, (t - c.sunrise) / c.daytime_span())
    };

    (period, crate::clamp_unit(subscale))
}

/// Cubic ease on distance from the window's midpoint; pinned to 1 at dusk
pub fn dusk_factor(period: Period, subscale: f32) -> f32 {
    if period == Period::Dusk {
        1.0
    } else {
        ((subscale - 0.5).abs() * 2.0).powi(3)
    }
}

pub fn sky_color(period: Period, dusk_factor: f32, palette: &Palette) -> Rgb {
    let balance = if period == Period::Day { dusk_factor } else { 1.0 };
    mix(palette.day_sky, palette.night_sky, balance)
}

pub fn classify(day_fraction: f32, celestial: &CelestialConfig, palette: &Palette) -> SkyReading {
    let (period, subscale) = period_and_subscale(day_fraction, celestial);
    let dusk_factor = dusk_factor(period, subscale);
    SkyReading {
        period,
        subscale,
        dusk_factor,
        sky_color: sky_color(period, dusk_factor, palette),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(t: f32) -> SkyReading {
        classify(t, &CelestialConfig::default(), &Palette::default())
    }

    #[test]
    fn test_solar_noon() {
        let r = reading(0.5);
        assert_eq!(r.period, Period::Day);
        assert!((r.subscale - 0.367).abs() < 1e-3, "subscale {}", r.subscale);
        assert!(r.dusk_factor < 0.02);
    }

    #[test]
    fn test_midnight_is_night() {
        let r = reading(0.0);
        assert_eq!(r.period, Period::Night);
        // 0.15 of a 0.40 window
        assert!((r.subscale - 0.375).abs() < 1e-5);
        assert_eq!(r.sky_color, Palette::default().night_sky);
    }

    #[test]
    fn test_twilight_windows() {
        let evening = reading(0.83);
        assert_eq!(evening.period, Period::Dusk);
        assert!((evening.subscale - 0.5).abs() < 1e-4);
        assert_eq!(evening.dusk_factor, 1.0);

        let morning = reading(0.30);
        assert_eq!(morning.period, Period::Dusk);
        assert!((morning.subscale - 5.0 / 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let c = CelestialConfig::default();
        assert_eq!(reading(c.sunrise).period, Period::Day);
        assert_eq!(reading(c.sunrise).subscale, 0.0);
        assert_eq!(reading(c.sunset).period, Period::Dusk);
        assert_eq!(reading(c.moonrise).period, Period::Night);
        assert_eq!(reading(c.moonrise).subscale, 0.0);
        assert_eq!(reading(c.moonset).period, Period::Dusk);
    }

    #[test]
    fn test_every_fraction_has_unit_subscale() {
        for i in 0..10_000 {
            let t = i as f32 / 10_000.0;
            let r = reading(t);
            assert!((0.0..1.0).contains(&r.subscale), "t={} subscale={}", t, r.subscale);
            assert!((0.0..=1.0).contains(&r.dusk_factor));
        }
    }

    #[test]
    fn test_overlapping_windows_resolve_by_precedence() {
        // Moon rises before the sun sets and sets after it rises
        let c = CelestialConfig {
            sunrise: 0.2,
            sunset: 0.9,
            moonrise: 0.8,
            moonset: 0.3,
        };
        let p = Palette::default();
        assert_eq!(classify(0.85, &c, &p).period, Period::Day);
        assert_eq!(classify(0.25, &c, &p).period, Period::Day);
        assert_eq!(classify(0.95, &c, &p).period, Period::Night);
        assert_eq!(classify(0.1, &c, &p).period, Period::Night);
        for i in 0..1000 {
            let r = classify(i as f32 / 1000.0, &c, &p);
            assert!((0.0..1.0).contains(&r.subscale));
        }
    }

    #[test]
    fn test_night_arc_starts_at_moonrise_for_valid_configs() {
        let p = Palette::default();
        for moonrise in [0.82, 0.85, 0.9, 0.99] {
            for moonset in [0.0, 0.1, 0.25, 0.3] {
                let c = CelestialConfig {
                    moonrise,
                    moonset,
                    ..CelestialConfig::default()
                };
                assert!(c.validate().is_ok());
                let rise = classify(moonrise, &c, &p);
                assert_eq!(rise.period, Period::Night);
                assert_eq!(rise.subscale, 0.0);
                // Twilight separates sunset from moonrise
                assert_eq!(classify(c.sunset, &c, &p).period, Period::Dusk);
            }
        }
    }

    #[test]
    fn test_day_sky_darkens_toward_edges() {
        let noon = reading(0.565);
        let late = reading(0.80);
        assert_eq!(noon.sky_color, Palette::default().day_sky);
        assert!(late.sky_color[0] < noon.sky_color[0]);
        assert!(late.dusk_factor > 0.8);
    }

    #[test]
    fn test_dusk_factor_curve() {
        assert_eq!(dusk_factor(Period::Day, 0.5), 0.0);
        assert!((dusk_factor(Period::Night, 0.0) - 1.0).abs() < 1e-6);
        assert!((dusk_factor(Period::Day, 0.75) - 0.125).abs() < 1e-6);
        assert_eq!(dusk_factor(Period::Dusk, 0.5), 1.0);
    }
}
