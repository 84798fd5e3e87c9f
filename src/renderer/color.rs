//! RGBA colour and the per-pixel compositing rules.

use super::Rgba;

/// One 8-bit-per-channel pixel.
///
/// Channels are stored explicitly; packing to a 32-bit word only happens
/// at the presentation boundary via [`Color::to_argb`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    pub const MAGENTA: Color = Color::opaque(0xFF, 0x00, 0xFF);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Pack to `0xAARRGGBB`.
    #[inline]
    pub const fn to_argb(self) -> Rgba {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn from_argb(px: Rgba) -> Self {
        Self {
            a: (px >> 24) as u8,
            r: (px >> 16) as u8,
            g: (px >> 8) as u8,
            b: px as u8,
        }
    }

    /// Multiply the colour channels by `mul` (alpha untouched).
    #[inline]
    pub fn scale(self, mul: f32) -> Self {
        let f = |c: u8| (c as f32 * mul).clamp(0.0, 255.0) as u8;
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }

    /// Halve the colour intensity; the cheap side-shading used for Y-step faces.
    #[inline]
    pub const fn half(self) -> Self {
        Self {
            r: self.r >> 1,
            g: self.g >> 1,
            b: self.b >> 1,
            a: self.a,
        }
    }

    /// Composite `src` over `self` using `src.a` as coverage.
    ///
    /// `a == 255` returns `src` exactly, `a == 0` returns `self` exactly.
    #[inline]
    pub fn layer(self, src: Color) -> Self {
        match src.a {
            255 => src,
            0 => self,
            a => {
                let t = a as f32 / 255.0;
                let mix = |under: u8, over: u8| {
                    (under as f32 * (1.0 - t) + over as f32 * t)
                        .round()
                        .clamp(0.0, 255.0) as u8
                };
                Self {
                    r: mix(self.r, src.r),
                    g: mix(self.g, src.g),
                    b: mix(self.b, src.b),
                    a: self.a.max(a),
                }
            }
        }
    }
}

/// Linear distance fog: 1 at the eye, 0 at `cutoff` and beyond.
#[inline]
pub fn fog_factor(dist: f32, cutoff: f32) -> f32 {
    (1.0 - dist / cutoff).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [Color; 4] = [
        Color::BLACK,
        Color::MAGENTA,
        Color::rgba(12, 200, 77, 31),
        Color::rgba(255, 255, 255, 128),
    ];

    #[test]
    fn opaque_layer_replaces() {
        let top = Color::opaque(10, 20, 30);
        for under in SAMPLES {
            assert_eq!(under.layer(top), top);
        }
    }

    #[test]
    fn transparent_layer_is_identity() {
        let top = Color::rgba(200, 100, 50, 0);
        for under in SAMPLES {
            assert_eq!(under.layer(top), under);
        }
    }

    #[test]
    fn half_alpha_mixes_evenly() {
        let out = Color::BLACK.layer(Color::rgba(200, 100, 0, 128));
        // 128/255 ≈ 0.502
        assert_eq!((out.r, out.g, out.b), (100, 50, 0));
        assert_eq!(out.a, 255);
    }

    #[test]
    fn fog_endpoints_and_clamp() {
        assert_eq!(fog_factor(0.0, 5.0), 1.0);
        assert_eq!(fog_factor(5.0, 5.0), 0.0);
        assert_eq!(fog_factor(50.0, 5.0), 0.0);
        let mut last = 1.0;
        for i in 0..=60 {
            let f = fog_factor(i as f32 * 0.1, 5.0);
            assert!(f <= last);
            last = f;
        }
    }

    #[test]
    fn scale_keeps_alpha() {
        let c = Color::rgba(100, 200, 50, 77).scale(0.5);
        assert_eq!(c, Color::rgba(50, 100, 25, 77));
    }

    #[test]
    fn argb_packing() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_argb(), 0x4411_2233);
        assert_eq!(Color::from_argb(0x4411_2233), c);
    }
}
