use std::fmt::Display;

use crate::class::{float_class, signbit, FloatClass};
use crate::error::{Error, Result};
use crate::options::{
    DigitsModifier, HexFormatOptions, RangeModifier, SubnormalStrategy, ZeroStrategy,
};
use crate::parts::{float_parts, normalize};
use crate::probe::{float_format, FloatFormat};
use crate::HexFloat;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Fraction digits are extracted seven at a time.
const CHUNK_DIGITS: u32 = 7;
/// `16^7`.
const CHUNK_SCALE: f64 = 268_435_456.0;

/// A hex significand ready for output: `leading.digits * 2^exponent`.
#[derive(Debug, PartialEq)]
struct HexSignificand {
    leading: u8,
    digits: Vec<u8>,
    exponent: i32,
}

impl HexSignificand {
    fn zero(exponent: i32) -> Self {
        Self {
            leading: 0,
            digits: Vec::new(),
            exponent,
        }
    }

    /// Pad with zeros or round to nearest-even so exactly `count` fraction
    /// digits remain.
    fn set_len(&mut self, count: usize) {
        if self.digits.len() <= count {
            self.digits.resize(count, 0);
            return;
        }
        let dropped = self.digits.split_off(count);
        let last_kept = self.digits.last().copied().unwrap_or(self.leading);
        let tie = dropped[0] == 8 && dropped[1..].iter().all(|&d| d == 0);
        if dropped[0] < 8 || (tie && last_kept % 2 == 0) {
            return;
        }
        for digit in self.digits.iter_mut().rev() {
            if *digit < 15 {
                *digit += 1;
                return;
            }
            *digit = 0;
        }
        // The carry reached the leading digit.
        self.leading += 1;
        if self.leading == 2 {
            self.leading = 1;
            self.exponent += 1;
        }
    }
}

/// Expand a fraction in `[0, 1)` into hex digits, without trailing zeros.
fn fraction_digits(mut fraction: f64) -> Vec<u8> {
    let mut digits = Vec::new();
    while fraction != 0.0 {
        fraction *= CHUNK_SCALE;
        // fraction < 16^7, so the integer part fits and converts exactly.
        let chunk = fraction as u32;
        fraction -= f64::from(chunk);
        for shift in (0..CHUNK_DIGITS).rev() {
            digits.push(((chunk >> (4 * shift)) & 0xf) as u8);
        }
    }
    while digits.last() == Some(&0) {
        digits.pop();
    }
    digits
}

/// Decide how many fraction digits to print.
///
/// `bits_digits` is enough digits to show every significand bit;
/// `value_digits` is the length of this value's exact expansion.
fn fraction_len(
    options: &HexFormatOptions,
    bits_digits: usize,
    value_digits: usize,
) -> Result<usize> {
    let mut min = 0;
    let mut max = usize::MAX;
    for (modifier, bound) in [
        (options.frac_digits_bits_mod, bits_digits),
        (options.frac_digits_value_mod, value_digits),
    ] {
        match modifier {
            DigitsModifier::Ignore => {}
            DigitsModifier::AtLeast => min = min.max(bound),
            DigitsModifier::AtMost => max = max.min(bound),
            DigitsModifier::Exactly => {
                min = min.max(bound);
                max = max.min(bound);
            }
        }
    }
    if min > max {
        return Err(Error::InvalidConfiguration(format!(
            "fraction digits must be at least {min} and at most {max}"
        )));
    }
    Ok(options.frac_digits.clamp(min, max))
}

/// Decimal width of the widest exponent the format can show.
fn exponent_range_width(format: &FloatFormat) -> usize {
    let widest = format
        .max_finite_exp()
        .unsigned_abs()
        .max(format.min_finite_exp().unsigned_abs());
    widest.to_string().len()
}

fn render(
    sign: &str,
    significand: &HexSignificand,
    options: &HexFormatOptions,
    format: &FloatFormat,
) -> String {
    let mut out = String::with_capacity(sign.len() + significand.digits.len() + 12);
    out.push_str(sign);
    out.push_str("0x");
    out.push(HEX_DIGITS[usize::from(significand.leading)] as char);
    if !significand.digits.is_empty() {
        out.push('.');
        out.extend(
            significand
                .digits
                .iter()
                .map(|&d| HEX_DIGITS[usize::from(d)] as char),
        );
    }

    let mut width = options.exp_digits;
    if options.exp_digits_range_mod == RangeModifier::AtLeast {
        width = width.max(exponent_range_width(format));
    }
    let exp_sign = if significand.exponent < 0 {
        &options.exp_neg_sign
    } else {
        &options.exp_pos_sign
    };
    out.push('p');
    out.push_str(exp_sign);
    out.push_str(&format!("{:0width$}", significand.exponent.unsigned_abs()));
    out
}

/// A sign string followed by a fixed string.
fn signed_text(sign: &str, text: &str) -> String {
    let mut out = String::with_capacity(sign.len() + text.len());
    out.push_str(sign);
    out.push_str(text);
    out
}

/// Render `value` as an exact hexadecimal float string.
///
/// Finite values render as `[sign]0x<digit>[.<digits>]p<sign><exponent>`;
/// infinities and NaN render as the configured strings. Fails only when the
/// fraction digit modifiers cannot be satisfied together.
pub fn float_hex(value: f64, options: &HexFormatOptions) -> Result<String> {
    let format = float_format();
    let class = float_class(value);
    if class == FloatClass::NaN {
        return Ok(options.nan_string.clone());
    }
    let sign = if signbit(value) {
        &options.neg_sign
    } else {
        &options.pos_sign
    };

    let mut significand = match class {
        FloatClass::Infinite => return Ok(signed_text(sign, &options.infinite_string)),
        FloatClass::Zero => match &options.zero_strategy {
            ZeroStrategy::FixedString(text) => return Ok(signed_text(sign, text)),
            ZeroStrategy::AsSubnormal => HexSignificand::zero(format.min_normal_exp()),
            ZeroStrategy::AtExponent(exponent) => HexSignificand::zero(*exponent),
        },
        _ => {
            let parts = float_parts(value)?;
            let (mut exponent, mut fraction) = (parts.exponent, parts.significand);
            if fraction < 1.0 && options.subnormal_strategy == SubnormalStrategy::Normalized {
                let (shift, normalized) = normalize(format, fraction);
                exponent += shift;
                fraction = normalized;
            }
            let leading: u8 = if fraction < 1.0 { 0 } else { 1 };
            HexSignificand {
                leading,
                digits: fraction_digits(fraction - f64::from(leading)),
                exponent,
            }
        }
    };

    let bits_digits = (format.significand_bits() as usize).div_ceil(4);
    let count = fraction_len(options, bits_digits, significand.digits.len())?;
    significand.set_len(count);
    Ok(render(sign, &significand, options, format))
}

impl Display for HexFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text =
            float_hex(self.0, &HexFormatOptions::default()).map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}
