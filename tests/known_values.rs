use floatprobe::{
    float_class, float_format, float_hex, float_parts, hex_float, pow2, FloatClass,
    HexFormatOptions, Sign,
};

#[track_caller]
fn check_parse(s: &str, expected: f64) {
    assert_eq!(hex_float(s).unwrap(), expected);
}

#[track_caller]
fn check_hex(value: f64, expected: &str) {
    assert_eq!(float_hex(value, &HexFormatOptions::default()).unwrap(), expected);
}

#[test]
fn known_values() {
    #![allow(clippy::excessive_precision)]

    // 2^53 - 1
    check_parse("0x1fffffffffffff", 9007199254740991.0);
    // 2^54 - 1 is a tie between 2^54 - 2 and 2^54; ties go to the even
    // significand, which is 2^54.
    check_parse("0x3fffffffffffff", 18014398509481984.0);
    // 2^54 - 3 rounds down to the even 2^54 - 4.
    check_parse("0x3ffffffffffffd", 18014398509481980.0);

    // The real value is 1.0000000000000002220446049250313080847263336181640625
    check_parse("0x1.0000000000001p0", 1.000000000000000222);
    check_parse("0x1.921fb54442d18p+1", std::f64::consts::PI);
}

#[test]
fn known_encodings() {
    check_hex(1.0, "+0x1p+0");
    check_hex(0.0, "+0.0");
    check_hex(std::f64::consts::PI, "+0x1.921fb54442d18p+1");
    check_hex(-std::f64::consts::E, "-0x1.5bf0a8b145769p+1");
    check_hex(9007199254740991.0, "+0x1.fffffffffffffp+52");
}

#[test]
fn known_format() {
    let format = float_format();
    assert_eq!(format.significand_bits(), 52);
    assert_eq!(format.max_finite_exp(), 1023);
    assert_eq!(format.min_normal_exp(), -1022);
    assert_eq!(format.min_finite_exp(), -1074);
    assert_eq!(format.max_integer(), 9007199254740992.0);
    assert_eq!(pow2(-1022).unwrap(), f64::MIN_POSITIVE);
}

#[test]
fn known_classes() {
    assert_eq!(float_class(0.0), FloatClass::Zero);
    assert_eq!(float_class(1.0), FloatClass::Normal);
    assert_eq!(float_class(f64::NAN), FloatClass::NaN);
    assert_eq!(float_class(f64::INFINITY), FloatClass::Infinite);
    let below_normal = float_format().min_normal() - float_format().min_finite();
    assert_eq!(float_class(below_normal), FloatClass::Subnormal);

    let parts = float_parts(-6.0).unwrap();
    assert_eq!(parts.sign, Sign::Negative);
    assert_eq!(parts.exponent, 2);
    assert_eq!(parts.significand, 1.5);
}
