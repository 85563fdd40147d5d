use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::error::{Capability, Error, Result};
use crate::probe::{float_format, FloatFormat};
use crate::HexFloat;

/// Hex digits per limb.
const LIMB_DIGITS: usize = 7;
const LIMB_BITS: usize = 4 * LIMB_DIGITS;
const LIMB_MASK: u32 = (1 << LIMB_BITS) - 1;

impl FromStr for HexFloat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        hex_float(s).map(HexFloat)
    }
}

/// Parse a hexadecimal float string.
///
/// Accepts, case-insensitively, `[sign]0x<hex>[.<hex>][p[sign]<decimal>]`,
/// `[sign]inf`, `[sign]nan` and the zeros `[sign]0` and `[sign]0.0...`.
/// The result is rounded to nearest, ties to even. Values beyond the largest
/// finite value become infinity (or the largest finite value, if the format
/// has no infinities); values below half the smallest become zero.
pub fn hex_float(s: &str) -> Result<f64> {
    parse_with(float_format(), s)
}

fn parse_with(format: &FloatFormat, s: &str) -> Result<f64> {
    let malformed = || Error::MalformedInput(s.to_owned());

    let body = s.to_ascii_lowercase();
    let (negative, body) = match body.as_bytes().first() {
        Some(b'-') => (true, &body[1..]),
        Some(b'+') => (false, &body[1..]),
        _ => (false, body.as_str()),
    };

    match body {
        "inf" => {
            let inf = format
                .pos_infinity()
                .ok_or(Error::UnsupportedCapability(Capability::Infinity))?;
            return Ok(if negative { -inf } else { inf });
        }
        "nan" => {
            return format
                .nan()
                .ok_or(Error::UnsupportedCapability(Capability::NaN));
        }
        _ => {}
    }

    let Some(hex) = body.strip_prefix("0x") else {
        if is_zero(body) {
            return Ok(format.zero(negative));
        }
        return Err(malformed());
    };

    let mut chars = hex.chars().peekable();
    let hexpoint = take_hex(&mut chars).ok_or_else(malformed)?;
    let exponent = match chars.next() {
        // Exponent is missing; assume zero.
        None => 0,
        Some('p') => take_decimal(&mut chars).ok_or_else(malformed)?,
        Some(_) => return Err(malformed()),
    };

    Ok(round_to_format(format, negative, &hexpoint, exponent))
}

/// A single `0`, optionally followed by `.` and one or more zeros.
fn is_zero(s: &str) -> bool {
    match s.strip_prefix('0') {
        Some("") => true,
        Some(frac) => frac
            .strip_prefix('.')
            .is_some_and(|zeros| !zeros.is_empty() && zeros.bytes().all(|b| b == b'0')),
        None => false,
    }
}

/// The hex digits of a significand and the position of the point.
#[derive(Debug, PartialEq)]
struct HexPoint {
    // All of the hex digits, integer part first.
    digits: Vec<u8>,
    // The number of digits to the right of the point character.
    frac_len: usize,
}

/// Consume `<hex>[.<hex>]`, stopping before a `p` or at the end of input.
///
/// Both runs of digits must be non-empty. Returns `None` on any other
/// character.
fn take_hex(chars: &mut Peekable<Chars>) -> Option<HexPoint> {
    let mut digits = Vec::new();
    let mut frac_len = None;

    loop {
        // Don't consume the 'p' character
        let next = chars.peek().copied();
        if matches!(next, None | Some('p')) {
            break;
        }
        chars.next();
        match next {
            Some('.') => {
                if digits.is_empty() || frac_len.replace(0).is_some() {
                    // Missing integer digits, or multiple `.` characters.
                    return None;
                }
            }
            Some(c) => {
                let nibble = c.to_digit(16)?;
                digits.push(nibble as u8);
                if let Some(len) = frac_len.as_mut() {
                    *len += 1;
                }
            }
            None => break,
        }
    }

    if digits.is_empty() || frac_len == Some(0) {
        return None;
    }
    Some(HexPoint {
        digits,
        frac_len: frac_len.unwrap_or(0),
    })
}

/// Parse a decimal value from the input iterator.
///
/// Allows a leading `+` or `-`, and requires at least one digit. Stops at
/// end of string; any nondigit character is an error, because the exponent
/// is always the last part of a hexfloat. Saturates rather than overflowing:
/// such an exponent is far outside every format anyway.
fn take_decimal(chars: &mut Peekable<Chars>) -> Option<i64> {
    let negative = match chars.next_if(|c| matches!(c, '+' | '-')) {
        Some(sign) => sign == '-',
        None => false,
    };

    let mut value = 0i64;
    let mut count = 0;
    for c in chars {
        let digit = c.to_digit(10)?;
        value = value.saturating_mul(10).saturating_add(i64::from(digit));
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Hex digits packed into fixed-width limbs, most significant first.
///
/// Bit positions count from the most significant bit of the first limb.
#[derive(Debug, PartialEq)]
struct Limbs(Vec<u32>);

impl Limbs {
    /// Pack the digits behind one extra zero digit, so a carry out of the
    /// top digit always has room.
    fn pack(digits: &[u8]) -> Self {
        let padded: Vec<u8> = std::iter::once(0).chain(digits.iter().copied()).collect();
        let limbs = padded
            .chunks(LIMB_DIGITS)
            .map(|chunk| {
                let limb = chunk.iter().fold(0u32, |limb, &d| (limb << 4) | u32::from(d));
                limb << (4 * (LIMB_DIGITS - chunk.len()))
            })
            .collect();
        Limbs(limbs)
    }

    fn bit(&self, pos: usize) -> bool {
        match self.0.get(pos / LIMB_BITS) {
            Some(limb) => (limb >> (LIMB_BITS - 1 - pos % LIMB_BITS)) & 1 == 1,
            None => false,
        }
    }

    /// True if any bit at `pos` or below is set.
    fn any_from(&self, pos: usize) -> bool {
        let index = pos / LIMB_BITS;
        match self.0.get(index) {
            Some(limb) => {
                limb & (LIMB_MASK >> (pos % LIMB_BITS)) != 0
                    || self.0[index + 1..].iter().any(|&limb| limb != 0)
            }
            None => false,
        }
    }

    /// Clear every bit at position `len` and below.
    fn truncate(&mut self, len: usize) {
        let index = len / LIMB_BITS;
        if let Some(limb) = self.0.get_mut(index) {
            *limb &= !(LIMB_MASK >> (len % LIMB_BITS)) & LIMB_MASK;
            self.0.truncate(index + 1);
        }
    }

    /// Add one unit at bit position `pos`, carrying towards the top.
    fn increment(&mut self, pos: usize) {
        let mut index = pos / LIMB_BITS;
        self.0[index] += 1 << (LIMB_BITS - 1 - pos % LIMB_BITS);
        while index > 0 && self.0[index] > LIMB_MASK {
            self.0[index] &= LIMB_MASK;
            index -= 1;
            self.0[index] += 1;
        }
    }
}

fn overflow(format: &FloatFormat, negative: bool) -> f64 {
    let value = format.pos_infinity().unwrap_or(format.max_finite());
    if negative {
        -value
    } else {
        value
    }
}

/// Round `digits * 16^-frac_len * 2^exponent` to the nearest representable
/// value, ties to even.
fn round_to_format(
    format: &FloatFormat,
    negative: bool,
    hexpoint: &HexPoint,
    exponent: i64,
) -> f64 {
    let Some(start) = hexpoint.digits.iter().position(|&d| d != 0) else {
        return format.zero(negative);
    };
    let digits = &hexpoint.digits[start..];

    // The leading digit is 1..=15: 0 to 3 of its four bits are zero.
    let lead_zeros = digits[0].leading_zeros() as usize - 4;
    let int_len = i64::try_from(digits.len()).unwrap_or(i64::MAX);
    let frac_len = i64::try_from(hexpoint.frac_len).unwrap_or(i64::MAX);

    // The value is 1.xxx * 2^top.
    let top = int_len
        .saturating_sub(frac_len)
        .saturating_mul(4)
        .saturating_sub(lead_zeros as i64 + 1)
        .saturating_add(exponent);

    let max_exp = i64::from(format.max_finite_exp());
    if top > max_exp {
        return overflow(format, negative);
    }
    let precision = if top >= i64::from(format.min_normal_exp()) {
        i64::from(format.significand_bits()) + 1
    } else {
        top - i64::from(format.min_finite_exp()) + 1
    };
    if precision < 0 {
        return format.zero(negative);
    }

    // Bit position of the leading one, behind the zero digit `pack` adds.
    let lead = 4 + lead_zeros;
    let cut = lead + precision as usize;
    let mut limbs = Limbs::pack(digits);

    let guard = limbs.bit(cut);
    let sticky = limbs.any_from(cut + 1);
    let odd = limbs.bit(cut - 1);
    limbs.truncate(cut);

    let mut rounded_top = top;
    if guard && (sticky || odd) {
        limbs.increment(cut - 1);
        if limbs.bit(lead - 1) {
            rounded_top += 1;
        }
    }
    if rounded_top > max_exp {
        return overflow(format, negative);
    }

    // Sum the kept limbs as an integer, then shift it into place. Bit `q`
    // of the stream weighs 2^(top + lead - q).
    let tables = format.tables();
    let last = (cut - 1) / LIMB_BITS;
    let mut value = 0.0;
    for (index, &limb) in limbs.0.iter().enumerate().take(last + 1) {
        value += tables.scale(f64::from(limb), ((last - index) * LIMB_BITS) as i32);
    }
    let shift = top + lead as i64 - (last * LIMB_BITS + LIMB_BITS - 1) as i64;
    let value = tables.scale(value, shift as i32);

    if negative {
        -value
    } else {
        value
    }
}
