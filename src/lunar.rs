//! Approximate lunar phase from the calendar date.
//!
//! Golden-number moon age: a 19-year anchor table plus a per-month offset.
//! Good to roughly a day, which is plenty for a backdrop.

use chrono::{Datelike, NaiveDate};

/// Moon age on the first of the year, indexed by `(year + 1) mod 19`
const GOLDEN_ANCHORS: [i32; 19] = [18, 0, 11, 22, 3, 14, 25, 6, 17, 28, 9, 20, 1, 12, 23, 4, 15, 26, 7];

/// Days to add per month, January first. The usual twelve-entry golden-number
/// correction table; October shares September's 7.
const MONTH_OFFSETS: [i32; 12] = [-1, 1, 0, 1, 2, 3, 4, 5, 7, 7, 9, 9];

const CYCLE_DAYS: f32 = 30.0;

/// Phase in [0, 1) for a calendar date; 0 = new moon, 0.5 = full.
/// `month` and `day` are 1-based; out-of-range months are clamped.
pub fn compute_phase(year: i32, month: u32, day: u32) -> f32 {
    let anchor = GOLDEN_ANCHORS[(year + 1).rem_euclid(19) as usize];
    let offset = MONTH_OFFSETS[(month.clamp(1, 12) - 1) as usize];
    let age = anchor + (day as i32 + offset).rem_euclid(30);
    crate::clamp_unit((age as f32 / CYCLE_DAYS).rem_euclid(1.0))
}

pub fn phase_for_date(date: NaiveDate) -> f32 {
    compute_phase(date.year(), date.month(), date.day())
}

/// Illuminated share of the night: 1 at full moon, 0 at new moon
pub fn moon_brightness(phase: f32) -> f32 {
    1.0 - (0.5 - phase).abs() * 2.0
}
