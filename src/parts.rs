use std::fmt;

use crate::class::{magnitude, unordered};
use crate::error::{Error, Result};
use crate::probe::{float_format, FloatFormat};
use crate::scale::Direction;

/// The sign of a nonzero or signed-zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => f.write_str("+"),
            Sign::Negative => f.write_str("-"),
        }
    }
}

/// A finite nonzero value split into sign, exponent and significand.
///
/// For normal values the significand lies in `[1, 2)`. For subnormal values
/// it lies in `(0, 1)` and the exponent is the minimum normal exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatParts {
    pub sign: Sign,
    pub exponent: i32,
    pub significand: f64,
}

impl FloatParts {
    /// Rebuild the value, `±significand * 2^exponent`.
    pub fn value(&self) -> f64 {
        let value = float_format().tables().scale(self.significand, self.exponent);
        match self.sign {
            Sign::Positive => value,
            Sign::Negative => -value,
        }
    }
}

/// Reduce a positive finite value to `significand * 2^exponent` with the
/// significand in `[1, 2)`, using only exact power-of-two scaling.
///
/// The value must not be subnormal.
pub(crate) fn normalize(format: &FloatFormat, value: f64) -> (i32, f64) {
    let tables = format.tables();
    let mut x = value;
    let mut exponent = 0i32;

    if x < 1.0 {
        // Invariant after step i: x in [2^-(2^i), 1).
        let down = tables.table(Direction::Down);
        for i in (0..down.len()).rev() {
            if x < down[i] {
                x /= down[i];
                exponent -= 1 << i;
            }
        }
        x *= 2.0;
        exponent -= 1;
    } else if x >= 2.0 {
        // Invariant after step i: x in [1, 2^(2^i)).
        let up = tables.table(Direction::Up);
        for i in (0..up.len()).rev() {
            if x >= up[i] {
                x /= up[i];
                exponent += 1 << i;
            }
        }
    }
    (exponent, x)
}

/// Exponent and significand of a positive finite nonzero value. Subnormals
/// keep the minimum normal exponent.
pub(crate) fn decompose(format: &FloatFormat, value: f64) -> (i32, f64) {
    if format.have_subnormal() && value < format.min_normal() {
        let exponent = format.min_normal_exp();
        (exponent, format.tables().scale(value, -exponent))
    } else {
        normalize(format, value)
    }
}

/// Split a finite nonzero value into sign, exponent and significand.
///
/// Fails with [`Error::NotFiniteNonzero`] for zero, infinities and NaN.
pub fn float_parts(value: f64) -> Result<FloatParts> {
    let format = float_format();
    if value == 0.0 || unordered(value) || format.pos_infinity() == Some(magnitude(value)) {
        return Err(Error::NotFiniteNonzero);
    }
    let sign = if value < 0.0 {
        Sign::Negative
    } else {
        Sign::Positive
    };
    let (exponent, significand) = decompose(format, magnitude(value));
    Ok(FloatParts {
        sign,
        exponent,
        significand,
    })
}
