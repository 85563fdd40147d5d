//! Runtime discovery of the native floating point format, plus exact
//! classification, decomposition, hex encoding and adjacency built on it.
//!
//! Nothing in this crate reads the bits of a float. The first use of any
//! operation probes the host format with arithmetic alone (see
//! [`FloatFormat::probe`]) and caches the result for the rest of the process.
//!
//! ```
//! use floatprobe::{float_hex, hex_float, nextafter, HexFormatOptions};
//!
//! let hex = float_hex(3.0, &HexFormatOptions::default()).unwrap();
//! assert_eq!(hex, "+0x1.8p+1");
//! assert_eq!(hex_float(&hex).unwrap(), 3.0);
//!
//! assert_eq!(nextafter(0.0, 1.0), floatprobe::float_format().min_finite());
//! ```

use std::ops::{Deref, DerefMut};

mod adjacent;
mod class;
mod error;
mod format;
mod options;
mod order;
mod parser;
mod parts;
mod probe;
mod scale;

pub use adjacent::{copysign, nextafter};
pub use class::{
    float_class, float_is_finite, float_is_infinite, float_is_nan, float_is_normal,
    float_is_nzfinite, float_is_subnormal, float_is_zero, float_sign, signbit, FloatClass,
};
pub use error::{Capability, Error, Result};
pub use format::float_hex;
pub use options::{DigitsModifier, HexFormatOptions, RangeModifier, SubnormalStrategy, ZeroStrategy};
pub use order::float_id_cmp;
pub use parser::hex_float;
pub use parts::{float_parts, FloatParts, Sign};
pub use probe::{float_format, FloatFormat};
pub use scale::{mult_pow2, pow2};

/// A float that displays and parses as a hex float string, using the
/// default [`HexFormatOptions`].
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct HexFloat(pub f64);

impl AsRef<f64> for HexFloat {
    fn as_ref(&self) -> &f64 {
        &self.0
    }
}

impl Deref for HexFloat {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HexFloat {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl HexFloat {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }
}
