//! Colour helpers
//!
//! Hex colours are authored in sRGB; shading and blending happen in linear
//! space, so every authored colour goes through [`srgb_hex_to_linear`].

/// sRGB transfer function, one channel.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a `0xRRGGBB` sRGB colour to linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes() {
        assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = srgb_hex_to_linear(0xffffff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_mid_grey_and_channel_order() {
        let grey = srgb_to_linear(0.5);
        assert!((grey - 0.214).abs() < 1e-3);
        let [r, g, b] = srgb_hex_to_linear(0xff0000);
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn test_dark_background() {
        let [r, g, b] = srgb_hex_to_linear(0x1a1a1a);
        assert!((r - 0.0103).abs() < 1e-3);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
