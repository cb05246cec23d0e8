//! Mountain silhouettes: twilight/night color grading and cast shadows.

use crate::celestial::BodyPosition;
use crate::color::{mix, Rgb, BLACK};
use crate::config::MountainLayer;
use crate::sky::SkyReading;

/// How far toward the night filter a layer drifts in full darkness
pub const NIGHT_MIX: f32 = 0.95;
/// Gain on the extra darkening of moonless nights
pub const NIGHT_DAMP_GAIN: f32 = 1.5;
/// Shadows are cast from this far above the body
pub const SHADOW_LIFT: f32 = 500.0;
/// Shadow edges run this far past the apex, well off-frame
pub const SHADOW_REACH: f32 = 5000.0;
/// Shadow pass restricted to already-painted terrain
pub const SHADOW_ATOP_ALPHA: u8 = 13; // ~0.05
/// Faint shadow pass over everything
pub const SHADOW_WASH_ALPHA: u8 = 4; // ~0.015

/// Smallest horizontal run used for the shadow slope
const MIN_SHADOW_RUN: f32 = 1e-3;

/// Layer ready to paint: optional shadow wedge first, then the silhouette
#[derive(Debug, Clone, PartialEq)]
pub struct MountainShape {
    pub silhouette: [(f32, f32); 3],
    pub shadow: Option<[(f32, f32); 4]>,
    pub color: Rgb,
}

/// Extra darkening for nights without much moon, 0 during the day
pub fn night_damp(reading: &SkyReading, moon_brightness: f32) -> f32 {
    if reading.is_day() {
        0.0
    } else {
        ((1.0 - moon_brightness) * (1.0 - reading.dusk_factor) * NIGHT_DAMP_GAIN).min(1.0)
    }
}

/// Graded layer color for the current light
pub fn layer_color(base: Rgb, night_filter: Rgb, reading: &SkyReading, moon_brightness: f32) -> Rgb {
    let day = reading.is_day();
    let night_mix = if day { NIGHT_MIX * reading.dusk_factor } else { NIGHT_MIX };
    let color = mix(base, night_filter, night_mix);
    let fade = reading.dusk_factor.powi(if day { 2 } else { 1 }).max(0.0);
    let color = mix(color, BLACK, fade);
    if day {
        color
    } else {
        mix(color, BLACK, night_damp(reading, moon_brightness))
    }
}

fn apex(layer: &MountainLayer, ground: f32) -> (f32, f32) {
    (layer.offset + layer.width / 2.0, ground - layer.height)
}

/// Ground-apex-ground triangle with its base on `ground`
pub fn silhouette(layer: &MountainLayer, ground: f32) -> [(f32, f32); 3] {
    [
        (layer.offset, ground),
        (layer.offset + layer.width, ground),
        apex(layer, ground),
    ]
}

/// Wedge of shade behind the apex as seen from `origin`.
///
/// The edge runs from the origin through the apex and on past it, away from
/// the light; the wedge closes along the ground at the mountain's foot on
/// the shaded side.
pub fn shadow_wedge(layer: &MountainLayer, origin: (f32, f32), ground: f32) -> [(f32, f32); 4] {
    let (apex_x, apex_y) = apex(layer, ground);
    let mut run = origin.0 - apex_x;
    if run.abs() < MIN_SHADOW_RUN {
        run = MIN_SHADOW_RUN.copysign(run);
    }
    let slope = (origin.1 - apex_y) / run;
    let cast_dir = if origin.0 < apex_x { -1.0 } else { 1.0 };
    let far_x = apex_x - SHADOW_REACH * cast_dir;
    let foot_x = if cast_dir > 0.0 {
        layer.offset
    } else {
        layer.offset + layer.width
    };

    [
        (far_x, apex_y - SHADOW_REACH * slope * cast_dir),
        (apex_x, apex_y),
        (foot_x, ground),
        (far_x, ground),
    ]
}

/// Plan every layer back-to-front. Shadows are only cast in daylight, and
/// never by the backmost layer.
pub fn plan_layers(
    layers: &[MountainLayer],
    night_filter: Rgb,
    reading: &SkyReading,
    moon_brightness: f32,
    light: Option<&BodyPosition>,
    ground: f32,
) -> Vec<MountainShape> {
    let origin = light
        .filter(|_| reading.is_day())
        .map(|body| (body.x, body.y - SHADOW_LIFT));

    layers
        .iter()
        .enumerate()
        .map(|(i, layer)| MountainShape {
            silhouette: silhouette(layer, ground),
            shadow: origin.filter(|_| i > 0).map(|o| shadow_wedge(layer, o, ground)),
            color: layer_color(layer.color, night_filter, reading, moon_brightness),
        })
        .collect()
}
