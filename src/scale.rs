//! Exact scaling by integer powers of two.
//!
//! Nothing here looks at the bit layout of a float. Scaling is done by
//! multiplying with entries of two tables of repeated squares,
//! `up[i] = 2^(2^i)` and `down[i] = 2^-(2^i)`, which the format probe grows
//! until squaring stops round-tripping.

use crate::error::{Error, Result};
use crate::probe::float_format;

/// Which way a table scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Towards overflow: entries `2^(2^i)`.
    Up,
    /// Towards underflow: entries `2^-(2^i)`.
    Down,
}

impl Direction {
    /// The first table entry, `2^1` or `2^-1`.
    fn seed(self) -> f64 {
        match self {
            Direction::Up => 2.0,
            Direction::Down => 0.5,
        }
    }
}

/// The two geometric sequences used for power-of-two scaling.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PowerTables {
    up: Vec<f64>,
    down: Vec<f64>,
}

impl PowerTables {
    /// Tables holding only the seed entries `2` and `1/2`.
    pub(crate) fn new() -> Self {
        Self {
            up: vec![Direction::Up.seed()],
            down: vec![Direction::Down.seed()],
        }
    }

    pub(crate) fn table(&self, direction: Direction) -> &[f64] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Square the last entry of one table and append it, if the square
    /// scales back down to the previous entry exactly.
    ///
    /// Returns `false` (leaving the table untouched) once squaring has
    /// saturated to infinity or vanished to zero.
    pub(crate) fn grow(&mut self, direction: Direction) -> bool {
        let table = match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        };
        let Some(&last) = table.last() else {
            table.push(direction.seed());
            return true;
        };
        let square = last * last;
        if square / last != last {
            return false;
        }
        table.push(square);
        true
    }

    /// Compute `value * 2^exp`.
    ///
    /// Exact whenever the result is representable. Zero (of either sign),
    /// infinities and NaN are returned unchanged.
    pub(crate) fn scale(&self, value: f64, exp: i32) -> f64 {
        // Zero keeps its sign; NaN would never saturate below.
        if value == 0.0 || value != value {
            return value;
        }
        let table = if exp < 0 { &self.down } else { &self.up };
        let mut remaining = u64::from(exp.unsigned_abs());
        let mut result = value;

        for &factor in table {
            if remaining == 0 {
                return result;
            }
            if remaining & 1 == 1 {
                result *= factor;
            }
            remaining >>= 1;
        }

        // Whatever is left is a multiple of 2^len. The last entry is
        // 2^(2^(len-1)), so it takes two multiplications per unit. This only
        // happens for exponents that already guarantee overflow or underflow.
        let Some(&last) = table.last() else {
            return result;
        };
        let mut steps = remaining.saturating_mul(2);
        while steps > 0 {
            let next = result * last;
            if next == result {
                // Saturated at infinity (or at zero, handled below).
                break;
            }
            result = next;
            if result == 0.0 {
                break;
            }
            steps -= 1;
        }
        result
    }
}

/// Return `2^exp`.
///
/// Fails unless `exp` lies within `[min_finite_exp, max_finite_exp]`.
pub fn pow2(exp: i32) -> Result<f64> {
    let format = float_format();
    let (min, max) = (format.min_finite_exp(), format.max_finite_exp());
    if exp < min || exp > max {
        return Err(Error::ExponentOutOfRange { exp, min, max });
    }
    Ok(format.tables().scale(1.0, exp))
}

/// Return `value * 2^exp`.
///
/// The result is exact whenever it is representable; otherwise it
/// overflows to infinity or underflows to zero the way multiplication does.
/// Zeros are returned unchanged, keeping their sign.
pub fn mult_pow2(value: f64, exp: i32) -> f64 {
    float_format().tables().scale(value, exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grown() -> PowerTables {
        let mut tables = PowerTables::new();
        while tables.grow(Direction::Up) {}
        while tables.grow(Direction::Down) {}
        tables
    }

    #[test]
    fn test_table_growth_stops() {
        let tables = grown();
        // 2^512 is the last square below overflow.
        assert_eq!(tables.table(Direction::Up).len(), 10);
        assert_eq!(*tables.table(Direction::Up).last().unwrap(), 2f64.powi(512));
        // 2^-1024 is a subnormal, still exact.
        assert_eq!(tables.table(Direction::Down).len(), 11);
        assert_eq!(
            *tables.table(Direction::Down).last().unwrap(),
            2f64.powi(-512) * 2f64.powi(-512)
        );
    }

    #[track_caller]
    fn check_scale(value: f64, exp: i32, expected: f64) {
        let result = grown().scale(value, exp);
        assert_eq!(result, expected, "{value:e} * 2^{exp}");
    }

    #[test]
    fn test_scale() {
        check_scale(1.0, 0, 1.0);
        check_scale(1.0, 1, 2.0);
        check_scale(1.0, -1, 0.5);
        check_scale(3.0, 10, 3072.0);
        check_scale(-3.0, -2, -0.75);
        check_scale(1.0, 1023, f64::MAX / (2.0 - f64::EPSILON));
        check_scale(1.0, -1022, f64::MIN_POSITIVE);
        check_scale(1.0, -1074, 5e-324);
        check_scale(5e-324, 1074, 1.0);
        check_scale(f64::MAX, -1023, 2.0 - f64::EPSILON);
    }

    #[test]
    fn test_scale_saturates() {
        check_scale(1.0, 1024, f64::INFINITY);
        check_scale(-1.0, 5000, f64::NEG_INFINITY);
        check_scale(1.0, i32::MAX, f64::INFINITY);
        check_scale(1.0, -1075, 0.0);
        check_scale(1.0, i32::MIN, 0.0);
        check_scale(f64::MAX, 1, f64::INFINITY);
    }

    #[test]
    fn test_scale_specials_unchanged() {
        let tables = grown();
        let neg_zero = tables.scale(-0.0, 100);
        assert_eq!(neg_zero, 0.0);
        assert!(neg_zero.is_sign_negative());
        assert!(tables.scale(f64::NAN, 3).is_nan());
        assert_eq!(tables.scale(f64::INFINITY, -3000), f64::INFINITY);
    }

    #[test]
    fn test_pow2() {
        assert_eq!(pow2(0).unwrap(), 1.0);
        assert_eq!(pow2(-1074).unwrap(), 5e-324);
        assert_eq!(pow2(1023).unwrap(), 8.98846567431158e307);
        assert_eq!(
            pow2(1024).unwrap_err(),
            Error::ExponentOutOfRange {
                exp: 1024,
                min: -1074,
                max: 1023
            }
        );
        pow2(-1075).unwrap_err();
    }

    #[test]
    fn test_mult_pow2() {
        assert_eq!(mult_pow2(1.5, 4), 24.0);
        assert_eq!(mult_pow2(24.0, -4), 1.5);
        assert!(mult_pow2(-0.0, 7).is_sign_negative());
    }
}
