//! Scene state, per-frame planning and the single compositing pass.
//!
//! Each redraw first builds a [`FramePlan`] from the configuration and the
//! current [`SceneState`] without touching pixels. [`compose`] then paints
//! the plan onto the host's surface.

use chrono::NaiveDateTime;

use crate::celestial::{self, Body, BodyPosition};
use crate::clock::ClockState;
use crate::config::{Palette, SceneConfig};
use crate::crescent::MoonSprite;
use crate::display::{Paint, PixelBuffer};
use crate::lunar;
use crate::mountains::{self, MountainShape, SHADOW_ATOP_ALPHA, SHADOW_WASH_ALPHA};
use crate::sky::{self, Period, SkyReading};
use crate::starfield::{self, Starfield};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldDraw {
    pub pivot: (f32, f32),
    pub angle: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyDraw {
    Sun(BodyPosition),
    /// Dark disc with the cached lit sprite on top
    Moon(BodyPosition),
}

/// Everything one frame will paint, in paint order
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub viewport: Viewport,
    pub day_fraction: f32,
    pub day_counter: u64,
    pub azimuth: f32,
    pub reading: SkyReading,
    pub starfield: Option<StarfieldDraw>,
    pub body: Option<BodyDraw>,
    pub mountains: Vec<MountainShape>,
}

/// State carried between ticks; owned by one [`SkyController`]
pub struct SceneState {
    pub clock: ClockState,
    /// Fixed for the session
    pub lunar_phase: f32,
    pub viewport: Viewport,
    starfield: Starfield,
    starfield_generations: u32,
    moon: Option<MoonSprite>,
}

impl SceneState {
    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// Starfields generated so far, the initial one included
    pub fn starfield_generations(&self) -> u32 {
        self.starfield_generations
    }

    pub fn moon(&self) -> Option<&MoonSprite> {
        self.moon.as_ref()
    }
}

/// Decide what the current frame shows. Pure: reads config and state only.
pub fn plan_frame(config: &SceneConfig, state: &SceneState) -> FramePlan {
    let viewport = state.viewport;
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    let day_fraction = state.clock.day_fraction;
    let reading = sky::classify(day_fraction, &config.celestial, &config.palette);

    let starfield = starfield::visibility(&reading).map(|opacity| StarfieldDraw {
        pivot: (width / 2.0, starfield::PIVOT_Y),
        angle: starfield::rotation(day_fraction),
        opacity,
    });

    let body = Body::for_period(reading.period).map(|body| {
        let position = celestial::position(reading.subscale, width, height, body.radius());
        match body {
            Body::Sun => BodyDraw::Sun(position),
            Body::Moon => BodyDraw::Moon(position),
        }
    });
    let light = match &body {
        Some(BodyDraw::Sun(p) | BodyDraw::Moon(p)) => Some(p),
        None => None,
    };

    let mountains = mountains::plan_layers(
        &config.mountains,
        config.palette.night_filter,
        &reading,
        lunar::moon_brightness(state.lunar_phase),
        light,
        height,
    );

    FramePlan {
        viewport,
        day_fraction,
        day_counter: state.clock.day_counter,
        azimuth: celestial::azimuth(day_fraction, &config.celestial),
        reading,
        starfield,
        body,
        mountains,
    }
}

/// Paint `plan` onto `surface`, which should match the plan's viewport.
///
/// Sky and stars go straight onto the surface. Bodies, shadows and mountains
/// go onto a transparent foreground layer first so shadows can be limited to
/// terrain already painted, then the layer is laid over the sky.
pub fn compose(plan: &FramePlan, state: &SceneState, palette: &Palette, surface: &mut PixelBuffer) {
    let [r, g, b] = plan.reading.sky_color;
    surface.clear(r, g, b);

    if let Some(stars) = &plan.starfield {
        surface.draw_rotated(
            state.starfield.sprite(),
            stars.pivot.0,
            stars.pivot.1,
            stars.angle,
            stars.opacity,
        );
    }

    let mut layer = PixelBuffer::with_size(surface.width(), surface.height());

    match plan.body {
        Some(BodyDraw::Sun(pos)) => {
            let [r, g, b] = palette.sun;
            layer.fill_disc(pos.x, pos.y, pos.radius, r, g, b, 255);
        },
        Some(BodyDraw::Moon(pos)) => {
            let [r, g, b] = palette.moon_dark;
            layer.fill_disc(pos.x, pos.y, pos.radius, r, g, b, 255);
            if let Some(moon) = &state.moon {
                let x = (pos.x - pos.radius).round() as i32;
                let y = (pos.y - pos.radius).round() as i32;
                layer.composite(moon.sprite(), x, y);
            }
        },
        None => {},
    }

    for mountain in &plan.mountains {
        if let Some(wedge) = &mountain.shadow {
            layer.fill_polygon(wedge, 0, 0, 0, SHADOW_ATOP_ALPHA, Paint::Atop);
            layer.fill_polygon(wedge, 0, 0, 0, SHADOW_WASH_ALPHA, Paint::Over);
        }
        let [r, g, b] = mountain.color;
        layer.fill_polygon(&mountain.silhouette, r, g, b, 255, Paint::Over);
    }

    surface.composite(&layer, 0, 0);
}

/// Owns the scene state and drives one redraw per tick or resize
pub struct SkyController {
    config: SceneConfig,
    rng: fastrand::Rng,
    state: SceneState,
}

impl SkyController {
    /// Start a session: fixes the lunar phase for `now`'s date and scatters
    /// the first starfield. Nothing is painted until the first tick.
    pub fn new(config: SceneConfig, mut rng: fastrand::Rng, now: NaiveDateTime, viewport: Viewport) -> Self {
        let lunar_phase = lunar::phase_for_date(now.date());
        log::info!(
            "Lunar phase {:.2} (illumination {:.2}) for {}",
            lunar_phase,
            lunar::moon_brightness(lunar_phase),
            now.date()
        );

        let starfield = Starfield::generate(viewport.width, viewport.height, 0, config.palette.star, &mut rng);

        Self {
            config,
            rng,
            state: SceneState {
                clock: ClockState::new(),
                lunar_phase,
                viewport,
                starfield,
                starfield_generations: 1,
                moon: None,
            },
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Periodic redraw
    pub fn tick(&mut self, now: NaiveDateTime, surface: &mut PixelBuffer) -> FramePlan {
        self.state.clock.sample(now.time());
        let plan = plan_frame(&self.config, &self.state);

        if self.state.starfield.is_stale(plan.day_counter, &plan.reading) {
            self.regenerate_starfield();
        }

        self.paint(&plan, surface);
        plan
    }

    /// Viewport changed: new starfield at the new size, then an immediate redraw
    pub fn resize(&mut self, viewport: Viewport, now: NaiveDateTime, surface: &mut PixelBuffer) -> FramePlan {
        log::info!(
            "Viewport resized {}x{} -> {}x{}",
            self.state.viewport.width,
            self.state.viewport.height,
            viewport.width,
            viewport.height
        );
        self.state.viewport = viewport;
        self.regenerate_starfield();
        self.tick(now, surface)
    }

    fn regenerate_starfield(&mut self) {
        let Viewport { width, height } = self.state.viewport;
        self.state.starfield = Starfield::generate(
            width,
            height,
            self.state.clock.day_counter,
            self.config.palette.star,
            &mut self.rng,
        );
        self.state.starfield_generations += 1;
    }

    fn paint(&mut self, plan: &FramePlan, surface: &mut PixelBuffer) {
        if let Some(BodyDraw::Moon(pos)) = plan.body {
            let phase = self.state.lunar_phase;
            if !self.state.moon.as_ref().is_some_and(|m| m.matches(phase, pos.radius)) {
                self.state.moon = Some(MoonSprite::render(phase, pos.radius, self.config.palette.moon_lit));
            }
        }

        compose(plan, &self.state, &self.config.palette, surface);
        self.log_frame(plan);
    }

    fn log_frame(&self, plan: &FramePlan) {
        let reading = &plan.reading;
        log::debug!(
            "tod={:.2} sub={:.2} {} az={:.2} dusk={:.2} day={} moon={:.2} illum={:.2}",
            plan.day_fraction,
            reading.subscale,
            reading.period.label(),
            plan.azimuth,
            reading.dusk_factor,
            plan.day_counter,
            self.state.lunar_phase,
            lunar::moon_brightness(self.state.lunar_phase)
        );
        if let Some(stars) = &plan.starfield {
            log::debug!(
                "starfield rot={:.2} opacity={:.2} age={}",
                stars.angle,
                stars.opacity,
                self.state.starfield.generated_on()
            );
        }
        if let (Some(BodyDraw::Moon(_)), Some(moon)) = (&plan.body, &self.state.moon) {
            let cut = moon.cut();
            log::debug!(
                "crescent carve={:.2} sub={:.2}/{:.2} {:?} {:?}",
                cut.carve,
                cut.eased,
                cut.subcarve,
                cut.mode,
                cut.shape
            );
        }
        if reading.period != Period::Day {
            log::debug!(
                "mountain night damp={:.2}",
                mountains::night_damp(reading, lunar::moon_brightness(self.state.lunar_phase))
            );
        }
    }
}
