//! Runtime discovery of the native floating point format.
//!
//! The probe makes no assumption about bit width or layout. It only
//! multiplies, divides and compares, and derives every limit of the format
//! from the points where those operations stop round-tripping.

use std::sync::OnceLock;

use log::{debug, trace};

use crate::class::unordered;
use crate::scale::{Direction, PowerTables};

static FORMAT: OnceLock<FloatFormat> = OnceLock::new();

/// The format descriptor, probed on first use.
///
/// The first call runs [`FloatFormat::probe`]; every later call (from any
/// thread) returns the same immutable descriptor.
pub fn float_format() -> &'static FloatFormat {
    FORMAT.get_or_init(FloatFormat::probe)
}

/// Characteristics of the native `f64` format, as discovered at runtime.
#[derive(Debug, Clone)]
pub struct FloatFormat {
    significand_bits: u32,
    significand_step: f64,
    max_finite_exp: i32,
    min_normal_exp: i32,
    min_finite_exp: i32,
    max_finite: f64,
    max_finite_pow2: f64,
    min_normal: f64,
    min_finite: f64,
    max_integer: f64,
    have_subnormal: bool,
    have_signed_zero: bool,
    have_infinite: bool,
    have_nan: bool,
    pos_infinity: Option<f64>,
    nan: Option<f64>,
    tables: PowerTables,
}

/// An extremal exponent and the power of two it names.
struct Boundary {
    exp: i32,
    value: f64,
}

/// Grow one power table until squaring saturates, then refine the exponent
/// bit by bit to the last power of two that still round-trips.
fn find_boundary(tables: &mut PowerTables, direction: Direction) -> Boundary {
    while tables.grow(direction) {}

    let table = tables.table(direction);
    let top = table.len().saturating_sub(1);
    let mut exp = 1i32 << top;
    let mut value = table[top];
    for i in (0..top).rev() {
        let factor = table[i];
        let candidate = value * factor;
        if candidate / factor == value {
            value = candidate;
            exp += 1 << i;
        }
    }
    trace!("{direction:?} boundary at 2^{exp} after {} squarings", top);

    let exp = match direction {
        Direction::Up => exp,
        Direction::Down => -exp,
    };
    Boundary { exp, value }
}

/// Find the number of fractional significand bits: the largest `k` such
/// that `1 + 2^-k` is distinguishable from `1`.
fn significand_width(tables: &PowerTables) -> (u32, f64) {
    let fits = |step: f64| (1.0 + step) - 1.0 == step;
    let down = tables.table(Direction::Down);

    if !fits(down[0]) {
        return (0, 1.0);
    }
    let mut top = 0;
    while top + 1 < down.len() && fits(down[top + 1]) {
        top += 1;
    }
    let mut bits = 1u32 << top;
    let mut step = down[top];
    for i in (0..top).rev() {
        let candidate = step * down[i];
        if fits(candidate) {
            step = candidate;
            bits += 1 << i;
        }
    }
    (bits, step)
}

/// Return the first candidate that compares unequal to itself.
fn find_nan(pos_infinity: Option<f64>) -> Option<f64> {
    let zero = 0.0f64;
    let candidates = [
        ("inf/inf", pos_infinity.map(|inf| inf / inf)),
        ("log(-1)", Some((-1.0f64).ln())),
        ("0/0", Some(zero / zero)),
        ("literal", "nan".parse::<f64>().ok()),
    ];
    candidates
        .into_iter()
        .find_map(|(name, candidate)| match candidate {
            Some(value) if unordered(value) => Some(value),
            _ => {
                trace!("{name} does not produce NaN");
                None
            }
        })
}

impl FloatFormat {
    /// Probe the host format.
    ///
    /// This never fails: any capability that cannot be established is
    /// reported as absent.
    pub fn probe() -> Self {
        let mut tables = PowerTables::new();

        // Both tables must reach convergence before any refinement.
        let upper = find_boundary(&mut tables, Direction::Up);
        let lower = find_boundary(&mut tables, Direction::Down);
        let (significand_bits, significand_step) = significand_width(&tables);
        let bits = significand_bits as i32;

        let max_finite_exp = upper.exp;
        let max_finite_pow2 = upper.value;
        let max_finite = tables.scale(
            max_finite_pow2 - tables.scale(1.0, max_finite_exp - bits - 1),
            1,
        );
        let max_integer = tables.scale(1.0, bits + 1);

        let min_finite_exp = lower.exp;
        let min_finite = lower.value;
        let stepped = min_finite * 1.5;
        let have_subnormal = stepped == min_finite || stepped == min_finite * 2.0;
        let (min_normal_exp, min_normal) = if have_subnormal {
            (min_finite_exp + bits, tables.scale(min_finite, bits))
        } else {
            (min_finite_exp, min_finite)
        };

        let neg_zero = -(0.0f64);
        let have_signed_zero = format!("{neg_zero}").starts_with('-');

        let squared = max_finite * max_finite;
        let have_infinite = !unordered(squared) && squared != max_finite;
        let pos_infinity = have_infinite.then_some(squared);

        let nan = find_nan(pos_infinity);

        let format = FloatFormat {
            significand_bits,
            significand_step,
            max_finite_exp,
            min_normal_exp,
            min_finite_exp,
            max_finite,
            max_finite_pow2,
            min_normal,
            min_finite,
            max_integer,
            have_subnormal,
            have_signed_zero,
            have_infinite,
            have_nan: nan.is_some(),
            pos_infinity,
            nan,
            tables,
        };
        debug!(
            "probed float format: {} significand bits, exponents {}..={} (normal from {}), \
             subnormal={} signed_zero={} infinite={} nan={}",
            format.significand_bits,
            format.min_finite_exp,
            format.max_finite_exp,
            format.min_normal_exp,
            format.have_subnormal,
            format.have_signed_zero,
            format.have_infinite,
            format.have_nan,
        );
        format
    }

    /// Number of fractional bits stored beyond the implicit leading bit.
    pub fn significand_bits(&self) -> u32 {
        self.significand_bits
    }

    /// Smallest increment in `[1, 2)`, i.e. `2^-significand_bits`.
    pub fn significand_step(&self) -> f64 {
        self.significand_step
    }

    pub fn max_finite_exp(&self) -> i32 {
        self.max_finite_exp
    }

    pub fn min_normal_exp(&self) -> i32 {
        self.min_normal_exp
    }

    pub fn min_finite_exp(&self) -> i32 {
        self.min_finite_exp
    }

    /// Largest finite value.
    pub fn max_finite(&self) -> f64 {
        self.max_finite
    }

    /// `2^max_finite_exp`.
    pub fn max_finite_pow2(&self) -> f64 {
        self.max_finite_pow2
    }

    /// Smallest positive normal value.
    pub fn min_normal(&self) -> f64 {
        self.min_normal
    }

    /// Smallest positive value (subnormal, if the format has them).
    pub fn min_finite(&self) -> f64 {
        self.min_finite
    }

    /// `2^(significand_bits + 1)`; every integer up to it is exact.
    pub fn max_integer(&self) -> f64 {
        self.max_integer
    }

    pub fn have_subnormal(&self) -> bool {
        self.have_subnormal
    }

    pub fn have_signed_zero(&self) -> bool {
        self.have_signed_zero
    }

    pub fn have_infinite(&self) -> bool {
        self.have_infinite
    }

    pub fn have_nan(&self) -> bool {
        self.have_nan
    }

    /// Positive zero, if zeros are signed.
    pub fn pos_zero(&self) -> Option<f64> {
        self.have_signed_zero.then_some(0.0)
    }

    /// Negative zero, if zeros are signed.
    pub fn neg_zero(&self) -> Option<f64> {
        self.have_signed_zero.then_some(-0.0)
    }

    pub fn pos_infinity(&self) -> Option<f64> {
        self.pos_infinity
    }

    pub fn neg_infinity(&self) -> Option<f64> {
        self.pos_infinity.map(|inf| -inf)
    }

    pub fn nan(&self) -> Option<f64> {
        self.nan
    }

    /// The host format with infinities, NaN and subnormals taken away.
    #[cfg(test)]
    pub(crate) fn without_specials() -> Self {
        let host = Self::probe();
        FloatFormat {
            min_finite_exp: host.min_normal_exp,
            min_finite: host.min_normal,
            have_subnormal: false,
            have_infinite: false,
            have_nan: false,
            pos_infinity: None,
            nan: None,
            ..host
        }
    }

    pub(crate) fn tables(&self) -> &PowerTables {
        &self.tables
    }

    /// The unsigned zero used where the format has no signed zeros.
    pub(crate) fn zero(&self, negative: bool) -> f64 {
        match self.neg_zero() {
            Some(neg_zero) if negative => neg_zero,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_binary64() {
        let format = FloatFormat::probe();

        assert_eq!(format.significand_bits(), f64::MANTISSA_DIGITS - 1);
        assert_eq!(format.significand_step(), f64::EPSILON);
        assert_eq!(format.max_finite_exp(), f64::MAX_EXP - 1);
        assert_eq!(format.min_normal_exp(), f64::MIN_EXP - 1);
        assert_eq!(format.min_finite_exp(), -1074);

        assert_eq!(format.max_finite(), f64::MAX);
        assert_eq!(format.max_finite_pow2(), 8.98846567431158e307);
        assert_eq!(format.min_normal(), f64::MIN_POSITIVE);
        assert_eq!(format.min_finite(), 5e-324);
        assert_eq!(format.max_integer(), 9007199254740992.0);

        assert!(format.have_subnormal());
        assert!(format.have_signed_zero());
        assert!(format.have_infinite());
        assert!(format.have_nan());
    }

    #[test]
    fn test_special_values() {
        let format = float_format();

        assert_eq!(format.pos_infinity(), Some(f64::INFINITY));
        assert_eq!(format.neg_infinity(), Some(f64::NEG_INFINITY));
        assert!(format.nan().unwrap().is_nan());

        let pos_zero = format.pos_zero().unwrap();
        let neg_zero = format.neg_zero().unwrap();
        assert_eq!(pos_zero, 0.0);
        assert!(pos_zero.is_sign_positive());
        assert_eq!(neg_zero, 0.0);
        assert!(neg_zero.is_sign_negative());
        assert!(format.zero(true).is_sign_negative());
        assert!(format.zero(false).is_sign_positive());
    }

    #[test]
    fn test_without_specials() {
        let format = FloatFormat::without_specials();
        assert_eq!(format.min_finite(), format.min_normal());
        assert_eq!(format.min_finite_exp(), format.min_normal_exp());
        assert!(!format.have_subnormal());
        assert!(!format.have_infinite());
        assert!(!format.have_nan());
        assert_eq!(format.neg_infinity(), None);
        assert_eq!(format.nan(), None);
        assert!(format.have_signed_zero());
    }

    #[test]
    fn test_probe_is_cached() {
        assert!(std::ptr::eq(float_format(), float_format()));
        let fresh = FloatFormat::probe();
        assert_eq!(float_format().tables(), fresh.tables());
        assert_eq!(float_format().max_finite(), fresh.max_finite());
    }

    #[test]
    fn test_nan_candidates() {
        assert!(find_nan(None).unwrap().is_nan());
        assert!(find_nan(Some(f64::INFINITY)).unwrap().is_nan());
    }

    #[test]
    fn test_probe_from_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| float_format().max_finite()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), f64::MAX);
        }
    }
}
