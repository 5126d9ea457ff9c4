//! Set of all dimension units used by textraster, along with conversion rules
//! to go from one to another easily.
//!
//! The main conversion rules used so far are that 1 in = 72 pt = dpi px and 1 px = 64 fixed
//! units.
use std::ops::{Add, AddAssign, Mul};
use std::{f64, fmt};

use serde::{Deserialize, Serialize};

use crate::saturating::Saturating;

/// Number of fractional bits of a `Fixed`.
pub const FRACTIONAL_BITS: u32 = 6;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// A 26.6 fixed point number, equal to 1/64 of a pixel.
///
/// Positions and advances are kept in this unit so that sub-pixel offsets returned by the font
/// engine can be accumulated without drifting, while wrap decisions are still made on whole
/// pixels. Additions saturate at the bounds of the type.
#[derive(Copy, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(pub i32);

/// Points.
#[derive(Copy, Clone, Serialize, Deserialize, PartialEq, PartialOrd, Default)]
pub struct Pt(pub f64);

impl Fixed {
    /// The largest whole number of pixels a `Fixed` can hold.
    pub const MAX_PIXELS: i32 = i32::max_value() >> FRACTIONAL_BITS;

    /// Creates a fixed point number from a whole number of pixels.
    pub fn from_pixels(pixels: i32) -> Fixed {
        Fixed(pixels << FRACTIONAL_BITS)
    }

    /// Creates a fixed point number from a wider value, clamped to the range of the type.
    pub fn clamped(value: i64) -> Fixed {
        Fixed(value.max(i64::from(i32::min_value())).min(i64::from(i32::max_value())) as i32)
    }

    /// Returns the nearest whole number of pixels, rounding half up.
    pub fn round(self) -> i32 {
        self.0.sadd(&(1 << (FRACTIONAL_BITS - 1))) >> FRACTIONAL_BITS
    }

    /// Returns the largest whole number of pixels less than or equal to self.
    pub fn floor(self) -> i32 {
        self.0 >> FRACTIONAL_BITS
    }

    /// Returns the sub-pixel part of self.
    pub fn fract(self) -> Fixed {
        Fixed(self.0 & ((1 << FRACTIONAL_BITS) - 1))
    }
}

impl Pt {
    /// Converts a length in points to fixed units at the given resolution.
    ///
    /// The result is truncated toward zero, never rounded.
    pub fn to_fixed(self, dpi: f64) -> Fixed {
        Fixed((self.0 * dpi * (64.0 / POINTS_PER_INCH)) as i32)
    }

    /// Converts a length in points to fixed units, or returns `None` if the result isn't a finite
    /// number that a `Fixed` can hold.
    pub fn checked_to_fixed(self, dpi: f64) -> Option<Fixed> {
        let fixed = self.0 * dpi * (64.0 / POINTS_PER_INCH);

        if fixed.is_finite() && fixed.abs() <= f64::from(i32::max_value()) {
            Some(Fixed(fixed as i32))
        } else {
            None
        }
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 >> FRACTIONAL_BITS, self.fract().0)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", f64::from(self.0) / 64.0)
    }
}

impl fmt::Debug for Pt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} pt", self.0)
    }
}

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}pt", self.0)
    }
}

macro_rules! impl_operators {
    ($the_type: ty, $constructor: expr) => {
        impl Add for $the_type {
            type Output = $the_type;

            fn add(self, other: $the_type) -> $the_type {
                $constructor(self.0.sadd(&other.0))
            }
        }

        impl AddAssign for $the_type {
            fn add_assign(&mut self, other: $the_type) {
                self.0 = self.0.sadd(&other.0);
            }
        }
    };
}

impl_operators!(Fixed, Fixed);

impl Mul<f64> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f64) -> Pt {
        Pt(self.0 * rhs)
    }
}

/// Compares two float numbers to check if they're close enough to be
/// considered equal.
///
/// Inspired by [this post](https://users.rust-lang.org/t/assert-eq-for-float-numbers/7034/3).
///
/// # Examples
///
/// ```
/// # use textraster::units::nearly_equal;
/// assert_eq!(nearly_equal(3.0, 2.99999), true);
/// assert_eq!(nearly_equal(4.0, 3.999), false);
/// ```
pub fn nearly_equal(a: f64, b: f64) -> bool {
    let abs_a = a.abs();
    let abs_b = b.abs();
    let diff = (a - b).abs();

    if a == b {
        // Handle infinities.
        true
    } else if a == 0.0 || b == 0.0 || diff < f64::MIN_POSITIVE {
        // One of a or b is zero (or both are extremely close to it,) use absolute error.
        diff < (f64::EPSILON * f64::MIN_POSITIVE)
    } else {
        // Use relative error.
        (diff / f64::min(abs_a + abs_b, f64::MAX)) < 10e-5
    }
}

#[cfg(test)]
mod tests {
    use crate::units::{Fixed, Pt};
    use test_case::test_case;

    #[test_case(Fixed(0), 0 ; "zero")]
    #[test_case(Fixed(31), 0 ; "below half")]
    #[test_case(Fixed(32), 1 ; "half rounds up")]
    #[test_case(Fixed(640), 10 ; "whole pixels")]
    #[test_case(Fixed(671), 10 ; "just below half")]
    #[test_case(Fixed(-32), 0 ; "negative half")]
    #[test_case(Fixed(i32::max_value()), Fixed::MAX_PIXELS ; "largest")]
    fn round_to_pixels(value: Fixed, expected: i32) {
        assert_eq!(value.round(), expected);
    }

    #[test]
    fn floor_and_fract() {
        let value = Fixed(10 * 64 + 17);
        assert_eq!(value.floor(), 10);
        assert_eq!(value.fract(), Fixed(17));
        assert_eq!(Fixed::from_pixels(value.floor()) + value.fract(), value);
    }

    #[test]
    fn addition_saturates() {
        let mut pen = Fixed(i32::max_value() - 100);
        assert_eq!(pen + Fixed(64), Fixed(i32::max_value()));

        pen += Fixed(1000);
        pen += Fixed(1000);
        assert_eq!(pen, Fixed(i32::max_value()));
    }

    #[test]
    fn clamp_wide_values() {
        assert_eq!(Fixed::clamped(2986), Fixed(2986));
        assert_eq!(Fixed::clamped(1 << 40), Fixed(i32::max_value()));
        assert_eq!(Fixed::clamped(-(1 << 40)), Fixed(i32::min_value()));
    }

    #[test]
    fn from_pixels_shifts() {
        assert_eq!(Fixed::from_pixels(10), Fixed(640));
    }

    #[test]
    fn convert_pt_to_fixed() {
        // 12pt at 72dpi is exactly 12px.
        assert_eq!(Pt(12.0).to_fixed(72.0), Fixed(768));

        // 14pt at 240dpi is 46.666..px, truncated in 1/64 px.
        assert_eq!(Pt(14.0).to_fixed(240.0), Fixed(2986));
    }

    #[test]
    fn checked_conversion() {
        assert_eq!(Pt(14.0).checked_to_fixed(240.0), Some(Fixed(2986)));
        assert_eq!(Pt(1e9).checked_to_fixed(240.0), None);
        assert_eq!(Pt(f64::INFINITY).checked_to_fixed(72.0), None);
        assert_eq!(Pt(f64::NAN).checked_to_fixed(72.0), None);
        assert_eq!(Pt(1000.0).checked_to_fixed(72.0), Some(Fixed(64000)));
    }

    #[test]
    fn debug_shows_pixels_and_fraction() {
        assert_eq!(format!("{:?}", Fixed(64 * 3 + 5)), "3:05");
    }
}
