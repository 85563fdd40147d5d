use crate::class::{classify, magnitude, signbit, unordered, FloatClass};
use crate::error::{Error, Result};
use crate::parts::decompose;
use crate::probe::{float_format, FloatFormat};

/// Return `value` with the sign of `sign_from`.
///
/// NaN `value` is returned unchanged. Fails if `sign_from` is NaN.
pub fn copysign(value: f64, sign_from: f64) -> Result<f64> {
    if unordered(sign_from) {
        return Err(Error::NotANumber);
    }
    if unordered(value) || signbit(value) == signbit(sign_from) {
        Ok(value)
    } else {
        Ok(-value)
    }
}

/// Same as [`copysign`] for a `sign_from` already known not to be NaN.
fn with_sign_of(value: f64, sign_from: f64) -> f64 {
    if signbit(value) == signbit(sign_from) {
        value
    } else {
        -value
    }
}

/// The next representable value after `value` in the direction of
/// `direction`.
///
/// NaN in either argument is returned. If the two are equal, `value` is
/// returned unchanged.
pub fn nextafter(value: f64, direction: f64) -> f64 {
    step_toward(float_format(), value, direction)
}

fn step_toward(format: &FloatFormat, value: f64, direction: f64) -> f64 {
    if unordered(value) {
        return value;
    }
    if unordered(direction) {
        return direction;
    }
    if value == direction {
        return value;
    }

    let (mut exponent, mut significand) = match classify(format, value) {
        FloatClass::NaN => return value,
        FloatClass::Zero => return with_sign_of(format.min_finite(), direction),
        FloatClass::Infinite => return with_sign_of(format.max_finite(), value),
        FloatClass::Normal | FloatClass::Subnormal => decompose(format, magnitude(value)),
    };
    let step = format.significand_step();

    let away_from_zero = (value > 0.0) == (direction > value);
    if away_from_zero {
        significand += step;
        if significand >= 2.0 {
            if exponent >= format.max_finite_exp() {
                return direction;
            }
            significand = 1.0;
            exponent += 1;
        }
    } else {
        if significand == 1.0 {
            if exponent > format.min_normal_exp() {
                significand = 2.0;
                exponent -= 1;
            } else if !format.have_subnormal() {
                return format.zero(signbit(value));
            }
        }
        significand -= step;
    }

    let magnitude = format.tables().scale(significand, exponent);
    with_sign_of(magnitude, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copysign() {
        assert_eq!(copysign(3.0, -1.0).unwrap(), -3.0);
        assert_eq!(copysign(-3.0, 0.0).unwrap(), 3.0);
        assert_eq!(copysign(3.0, 2.0).unwrap(), 3.0);
        assert!(copysign(0.0, -0.0).unwrap().is_sign_negative());
        assert_eq!(copysign(f64::INFINITY, -1.0).unwrap(), f64::NEG_INFINITY);
        assert!(copysign(f64::NAN, -1.0).unwrap().is_nan());
        assert_eq!(copysign(1.0, f64::NAN).unwrap_err(), Error::NotANumber);
    }

    #[track_caller]
    fn check_next(value: f64, direction: f64, expected: f64) {
        let next = nextafter(value, direction);
        assert_eq!(next, expected, "nextafter({value:e}, {direction:e})");
        assert_eq!(
            next.is_sign_negative(),
            expected.is_sign_negative(),
            "nextafter({value:e}, {direction:e})"
        );
    }

    #[test]
    fn test_nextafter_normal() {
        check_next(1.0, 2.0, 1.0 + f64::EPSILON);
        check_next(1.0, 0.0, 1.0 - f64::EPSILON / 2.0);
        check_next(-1.0, -2.0, -1.0 - f64::EPSILON);
        check_next(-1.0, 0.0, -1.0 + f64::EPSILON / 2.0);
        check_next(2.0 - f64::EPSILON, 3.0, 2.0);
        check_next(2.0, 1.0, 2.0 - f64::EPSILON);
        check_next(1.5, 1.5, 1.5);
    }

    #[test]
    fn test_nextafter_zero() {
        check_next(0.0, 1.0, 5e-324);
        check_next(0.0, -1.0, -5e-324);
        check_next(-0.0, 1.0, 5e-324);
        check_next(5e-324, 0.0, 0.0);
        check_next(-5e-324, 0.0, -0.0);
        check_next(-5e-324, 1.0, -0.0);
        check_next(0.0, -0.0, 0.0);
    }

    #[test]
    fn test_nextafter_subnormal_boundary() {
        check_next(f64::MIN_POSITIVE, 0.0, f64::MIN_POSITIVE - 5e-324);
        check_next(f64::MIN_POSITIVE - 5e-324, 1.0, f64::MIN_POSITIVE);
        check_next(1e-310, f64::INFINITY, 1e-310 + 5e-324);
    }

    #[test]
    fn test_nextafter_extremes() {
        check_next(f64::MAX, f64::INFINITY, f64::INFINITY);
        check_next(-f64::MAX, f64::NEG_INFINITY, f64::NEG_INFINITY);
        check_next(f64::INFINITY, 0.0, f64::MAX);
        check_next(f64::NEG_INFINITY, 0.0, -f64::MAX);
        check_next(f64::MAX, 0.0, 1.7976931348623155e308);
    }

    #[test]
    fn test_nextafter_without_subnormals() {
        let format = FloatFormat::without_specials();
        let min_normal = format.min_normal();
        let check = |value: f64, direction: f64, expected: f64| {
            let next = step_toward(&format, value, direction);
            assert_eq!(next, expected, "step_toward({value:e}, {direction:e})");
            assert_eq!(next.is_sign_negative(), expected.is_sign_negative());
        };

        check(min_normal, 0.0, 0.0);
        check(-min_normal, 0.0, -0.0);
        check(min_normal, -1.0, 0.0);
        check(0.0, 1.0, min_normal);
        check(-0.0, -1.0, -min_normal);
        check(min_normal, 1.0, f64::MIN_POSITIVE + 5e-324);
        check(2.0 * min_normal, 0.0, 2.0 * f64::MIN_POSITIVE - 5e-324);
        check(1.0, 2.0, 1.0 + f64::EPSILON);
    }

    #[test]
    fn test_nextafter_nan() {
        assert!(nextafter(f64::NAN, 1.0).is_nan());
        assert!(nextafter(1.0, f64::NAN).is_nan());
    }
}
