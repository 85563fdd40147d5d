use std::fmt;

use crate::error::{Error, Result};
use crate::parts::Sign;
use crate::probe::{float_format, FloatFormat};

/// The five mutually exclusive kinds of float value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatClass {
    Normal,
    Subnormal,
    Zero,
    Infinite,
    NaN,
}

impl fmt::Display for FloatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FloatClass::Normal => "NORMAL",
            FloatClass::Subnormal => "SUBNORMAL",
            FloatClass::Zero => "ZERO",
            FloatClass::Infinite => "INFINITE",
            FloatClass::NaN => "NAN",
        };
        f.write_str(name)
    }
}

/// True if `value` compares unequal to itself.
#[allow(clippy::eq_op)]
pub(crate) fn unordered(value: f64) -> bool {
    value != value
}

/// Absolute value by comparison; zeros and NaN pass through.
pub(crate) fn magnitude(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Classify `value`.
pub fn float_class(value: f64) -> FloatClass {
    classify(float_format(), value)
}

pub(crate) fn classify(format: &FloatFormat, value: f64) -> FloatClass {
    if value == 0.0 {
        return FloatClass::Zero;
    }
    if unordered(value) {
        return FloatClass::NaN;
    }
    let value = magnitude(value);
    if format.pos_infinity() == Some(value) {
        FloatClass::Infinite
    } else if format.have_subnormal() && value < format.min_normal() {
        FloatClass::Subnormal
    } else {
        FloatClass::Normal
    }
}

pub fn float_is_normal(value: f64) -> bool {
    float_class(value) == FloatClass::Normal
}

pub fn float_is_subnormal(value: f64) -> bool {
    float_class(value) == FloatClass::Subnormal
}

/// True for finite values other than zero.
pub fn float_is_nzfinite(value: f64) -> bool {
    matches!(
        float_class(value),
        FloatClass::Normal | FloatClass::Subnormal
    )
}

pub fn float_is_zero(value: f64) -> bool {
    float_class(value) == FloatClass::Zero
}

pub fn float_is_finite(value: f64) -> bool {
    matches!(
        float_class(value),
        FloatClass::Normal | FloatClass::Subnormal | FloatClass::Zero
    )
}

/// Always false when the format has no infinities.
pub fn float_is_infinite(value: f64) -> bool {
    float_class(value) == FloatClass::Infinite
}

pub fn float_is_nan(value: f64) -> bool {
    float_class(value) == FloatClass::NaN
}

/// True if `value` is negative, including negative zero.
///
/// The sign of a zero is read from its formatted text, so an unsigned zero
/// is never negative. The result for NaN is unspecified.
pub fn signbit(value: f64) -> bool {
    if value < 0.0 {
        return true;
    }
    value == 0.0 && float_format().have_signed_zero() && format!("{value}").starts_with('-')
}

/// The sign of `value`; fails for NaN.
pub fn float_sign(value: f64) -> Result<Sign> {
    if unordered(value) {
        return Err(Error::NotANumber);
    }
    Ok(if signbit(value) {
        Sign::Negative
    } else {
        Sign::Positive
    })
}
