//! Wall-clock sampling: time of day as a fraction plus a day-rollover counter.

use chrono::{NaiveTime, Timelike};

pub const MILLIS_PER_DAY: u32 = 86_400_000;

/// Fraction of the local day elapsed at `time`, in [0, 1).
pub fn day_fraction(time: NaiveTime) -> f32 {
    // Leap seconds show up as nanosecond values past 1e9; clamp them into the day
    let millis = (time.num_seconds_from_midnight() * 1000 + time.nanosecond() / 1_000_000)
        .min(MILLIS_PER_DAY - 1);
    crate::clamp_unit((f64::from(millis) / f64::from(MILLIS_PER_DAY)) as f32)
}

/// Time-of-day state carried between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    /// Current fraction of the day, 0 = local midnight
    pub day_fraction: f32,
    /// Number of midnight wraparounds observed since start
    pub day_counter: u64,
    previous: Option<f32>,
}

impl ClockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new sample. A fraction smaller than the previous one counts
    /// as one midnight crossing; a backwards clock jump is counted the same way.
    pub fn sample(&mut self, time: NaiveTime) -> f32 {
        let fraction = day_fraction(time);
        if let Some(previous) = self.previous {
            if fraction < previous {
                self.day_counter += 1;
                log::debug!("Day rollover, day counter now {}", self.day_counter);
            }
        }
        self.previous = Some(fraction);
        self.day_fraction = fraction;
        fraction
    }
}
