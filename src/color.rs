//! Color-space conversions.
//!
//! Two independent conversions feed the RGBA color buffer:
//! - 8-bit integer channels scaled into unit range
//! - spherical-harmonics DC coefficients mapped to RGB through a sigmoid

use crate::util::Vec4;

/// Zeroth-order real spherical-harmonics basis coefficient, `1 / (2 * sqrt(pi))`.
pub const SH_C0: f32 = 0.28209479;

/// Opaque white, the color of points that carry none.
pub const WHITE: Vec4 = Vec4::ONE;

/// Scale an 8-bit channel value into `[0, 1]`.
#[inline]
pub fn normalize_u8(v: f32) -> f32 {
    v / 255.0
}

/// Logistic function `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Map a spherical-harmonics DC coefficient to a unit-range channel.
#[inline]
pub fn sh_to_unit(c: f32) -> f32 {
    sigmoid(SH_C0 * c + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_u8() {
        assert_eq!(normalize_u8(255.0), 1.0);
        assert_eq!(normalize_u8(0.0), 0.0);
        assert!((normalize_u8(51.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_sh_zero() {
        // sigmoid(0.5)
        assert!((sh_to_unit(0.0) - 0.622_459_3).abs() < 1e-5);
    }

    #[test]
    fn test_sh_extremes() {
        assert_eq!(sh_to_unit(f32::MAX), 1.0);
        assert_eq!(sh_to_unit(f32::MIN), 0.0);
        assert_eq!(sh_to_unit(f32::INFINITY), 1.0);
        assert_eq!(sh_to_unit(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_sh_monotonic() {
        assert!(sh_to_unit(-1.0) < sh_to_unit(0.0));
        assert!(sh_to_unit(0.0) < sh_to_unit(1.0));
    }
}
