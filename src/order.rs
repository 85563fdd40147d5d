use std::cmp::Ordering;

use crate::class::{signbit, unordered};

/// Total order over floats.
///
/// NaN is equal to NaN and less than everything else. `-0` sorts before
/// `+0` when zeros are signed. Everything else compares numerically.
pub fn float_id_cmp(a: f64, b: f64) -> Ordering {
    match (unordered(a), unordered(b)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    if a == 0.0 && b == 0.0 {
        // Negative zero first.
        return signbit(b).cmp(&signbit(a));
    }
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_first() {
        assert_eq!(float_id_cmp(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(float_id_cmp(f64::NAN, f64::NEG_INFINITY), Ordering::Less);
        assert_eq!(float_id_cmp(0.0, -f64::NAN), Ordering::Greater);
    }

    #[test]
    fn test_signed_zeros() {
        assert_eq!(float_id_cmp(-0.0, 0.0), Ordering::Less);
        assert_eq!(float_id_cmp(0.0, -0.0), Ordering::Greater);
        assert_eq!(float_id_cmp(-0.0, -0.0), Ordering::Equal);
        assert_eq!(float_id_cmp(-5e-324, -0.0), Ordering::Less);
        assert_eq!(float_id_cmp(0.0, 5e-324), Ordering::Less);
    }

    #[test]
    fn test_sort() {
        let mut values = vec![
            3.0,
            f64::INFINITY,
            -0.0,
            f64::NAN,
            -1.0,
            0.0,
            f64::NEG_INFINITY,
            5e-324,
            -f64::MAX,
        ];
        values.sort_by(|a, b| float_id_cmp(*a, *b));

        assert!(values[0].is_nan());
        assert_eq!(
            &values[1..],
            &[
                f64::NEG_INFINITY,
                -f64::MAX,
                -1.0,
                -0.0,
                0.0,
                5e-324,
                3.0,
                f64::INFINITY
            ]
        );
        assert!(values[4].is_sign_negative());
        assert!(values[5].is_sign_positive());
    }
}
