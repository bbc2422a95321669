//! Conversions between 8-bit color pickers and shader colors.

/// Map each 0..=255 channel to 0.0..=1.0.
pub fn normalize_rgb(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| f32::from(c) / 255.0)
}

/// Inverse of [`normalize_rgb`], rounding to the nearest channel value.
/// Out-of-range inputs saturate.
pub fn to_rgb8(rgb: [f32; 3]) -> [u8; 3] {
    rgb.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(normalize_rgb([0, 0, 0]), [0.0, 0.0, 0.0]);
        assert_eq!(normalize_rgb([255, 255, 255]), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_every_channel_in_unit_range() {
        for c in 0..=255u8 {
            let [r, _, _] = normalize_rgb([c, 0, 0]);
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_every_channel_survives_conversion_back() {
        for c in 0..=255u8 {
            assert_eq!(to_rgb8(normalize_rgb([c, c, c])), [c, c, c]);
        }
    }

    #[test]
    fn test_to_rgb8_rounds_and_saturates() {
        assert_eq!(to_rgb8([0.95, 0.67, 0.26]), [242, 171, 66]);
        assert_eq!(to_rgb8([-1.0, 2.0, 0.5]), [0, 255, 128]);
    }
}
