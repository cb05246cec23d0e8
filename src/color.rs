//! Color mixing for sky, mountain and body colors

/// Three-channel 8-bit color
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

/// Linear mix of two equally sized channel arrays.
/// `balance` 0 yields `a`, 1 yields `b`; each channel is rounded.
pub fn mix<const N: usize>(a: [u8; N], b: [u8; N], balance: f32) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, channel) in out.iter_mut().enumerate() {
        let value = a[i] as f32 * (1.0 - balance) + b[i] as f32 * balance;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        let a = [192, 222, 237];
        let b = [17, 17, 30];
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
    }

    #[test]
    fn test_mix_midpoint_rounds() {
        assert_eq!(mix([1, 2, 255], [2, 3, 0], 0.5), [2, 3, 128]);
        assert_eq!(mix([0, 10], [5, 20], 0.5), [3, 15]);
    }

    #[test]
    fn test_mix_four_channels() {
        let a = [10, 20, 30, 255];
        let b = [30, 40, 50, 0];
        assert_eq!(mix(a, b, 0.5), [20, 30, 40, 128]);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
    }

    #[test]
    fn test_mix_toward_black() {
        assert_eq!(mix(WHITE, BLACK, 0.25), [191, 191, 191]);
    }
}
