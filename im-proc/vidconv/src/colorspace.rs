//! RGB to YCbCr conversion.
//!
//! BT.601 coefficients, full range, as 8 bit fixed point with rounding. See
//! <https://en.wikipedia.org/wiki/YCbCr#JPEG_conversion>.
//!
//! Output spans 0-255 on every channel, not the 16-235 studio range.

/// One full resolution YCbCr sample.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Yuv444 {
    pub y: u8,
    pub u: u8,
    pub v: u8,
}

#[inline]
fn clamp(i: i32) -> u8 {
    i.clamp(0, 255) as u8
}

/// Luma of one RGB pixel.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    // Coefficients sum to 256 so white maps to 255.
    clamp((77 * r + 150 * g + 29 * b + 128) >> 8)
}

/// Blue-difference chroma of one RGB pixel.
#[inline]
pub fn chroma_u(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    clamp(((-43 * r - 85 * g + 128 * b + 128) >> 8) + 128)
}

/// Red-difference chroma of one RGB pixel.
#[inline]
pub fn chroma_v(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    clamp(((128 * r - 107 * g - 21 * b + 128) >> 8) + 128)
}

#[inline]
pub fn rgb_to_yuv444(r: u8, g: u8, b: u8) -> Yuv444 {
    Yuv444 {
        y: luma(r, g, b),
        u: chroma_u(r, g, b),
        v: chroma_v(r, g, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Floating point BT.601 full range reference.
    fn reference(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let u = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
        let v = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
        (
            y.round().clamp(0.0, 255.0),
            u.round().clamp(0.0, 255.0),
            v.round().clamp(0.0, 255.0),
        )
    }

    #[test]
    fn known_colors() {
        assert_eq!(
            rgb_to_yuv444(255, 255, 255),
            Yuv444 {
                y: 255,
                u: 128,
                v: 128
            }
        );
        assert_eq!(rgb_to_yuv444(0, 0, 0), Yuv444 { y: 0, u: 128, v: 128 });

        let red = rgb_to_yuv444(255, 0, 0);
        assert!((red.y as i32 - 76).abs() <= 1, "{red:?}");
        assert!((red.u as i32 - 85).abs() <= 1, "{red:?}");
        assert_eq!(red.v, 255);

        assert_eq!(rgb_to_yuv444(0, 255, 0), Yuv444 { y: 149, u: 43, v: 21 });
    }

    #[test]
    fn within_one_of_reference() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(5) {
                for b in (0..=255u8).step_by(5) {
                    let actual = rgb_to_yuv444(r, g, b);
                    let (y, u, v) = reference(r, g, b);
                    for (name, a, e) in [("y", actual.y, y), ("u", actual.u, u), ("v", actual.v, v)]
                    {
                        assert!(
                            (a as f64 - e).abs() <= 1.0,
                            "{name} for rgb({r},{g},{b}): expected {e}, actual {a}"
                        );
                    }
                }
            }
        }
    }
}
