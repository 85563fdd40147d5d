//! Configuration for [`float_hex`](crate::float_hex).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a requested digit count is combined with a computed bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DigitsModifier {
    /// The bound plays no part.
    #[default]
    Ignore,
    /// Never print fewer digits than the bound.
    AtLeast,
    /// Never print more digits than the bound.
    AtMost,
    /// Print exactly as many digits as the bound.
    Exactly,
}

/// How the exponent width is combined with the width of the exponent range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RangeModifier {
    #[default]
    Ignore,
    /// Pad to at least as many digits as the widest representable exponent.
    AtLeast,
}

/// How subnormal values are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubnormalStrategy {
    /// Leading digit `0` at the minimum normal exponent, e.g. `0x0.8p-1022`.
    #[default]
    AsStored,
    /// Leading digit `1` with a smaller exponent, e.g. `0x1p-1023`.
    Normalized,
}

/// How zeros are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZeroStrategy {
    /// A sign followed by this string.
    FixedString(String),
    /// Like a subnormal with an all-zero significand: `0x0p-1022`.
    AsSubnormal,
    /// `0x0` at the given exponent.
    AtExponent(i32),
}

impl Default for ZeroStrategy {
    fn default() -> Self {
        ZeroStrategy::FixedString("0.0".to_owned())
    }
}

/// Formatting options for hexadecimal float output.
///
/// The default renders `1.0` as `+0x1p+0`, `3.0` as `+0x1.8p+1` and `0.0`
/// as `+0.0`, with as many fraction digits as the value needs. A larger
/// `frac_digits` pads with zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HexFormatOptions {
    /// Minimum number of exponent digits.
    pub exp_digits: usize,
    /// Applies the width of the full exponent range to `exp_digits`.
    pub exp_digits_range_mod: RangeModifier,
    pub exp_neg_sign: String,
    pub exp_pos_sign: String,
    /// Requested number of fraction digits.
    pub frac_digits: usize,
    /// Applies the digits needed for every significand bit to `frac_digits`.
    pub frac_digits_bits_mod: DigitsModifier,
    /// Applies the digits needed for this value exactly to `frac_digits`.
    pub frac_digits_value_mod: DigitsModifier,
    pub infinite_string: String,
    pub nan_string: String,
    pub neg_sign: String,
    pub pos_sign: String,
    pub subnormal_strategy: SubnormalStrategy,
    pub zero_strategy: ZeroStrategy,
}

impl Default for HexFormatOptions {
    fn default() -> Self {
        Self {
            exp_digits: 0,
            exp_digits_range_mod: RangeModifier::Ignore,
            exp_neg_sign: "-".to_owned(),
            exp_pos_sign: "+".to_owned(),
            frac_digits: 0,
            frac_digits_bits_mod: DigitsModifier::Ignore,
            frac_digits_value_mod: DigitsModifier::AtLeast,
            infinite_string: "inf".to_owned(),
            nan_string: "nan".to_owned(),
            neg_sign: "-".to_owned(),
            pos_sign: "+".to_owned(),
            subnormal_strategy: SubnormalStrategy::AsStored,
            zero_strategy: ZeroStrategy::default(),
        }
    }
}

impl HexFormatOptions {
    /// The output of C's `printf("%a")`: `0x1.8p+1`, `-0x0p+0`, `inf`.
    pub fn printf() -> Self {
        Self {
            pos_sign: String::new(),
            zero_strategy: ZeroStrategy::AtExponent(0),
            ..Self::default()
        }
    }
}
