use proptest::prelude::*;
use veil_core::Error;
use veil_core::number::{
    Sign, hex_literal, parse_hex, parse_signed_hex_term, signed_hex_term, to_hex, try_to_hex,
};

proptest! {
    #[test]
    fn hex_decodes_back(value in 0u64..=(1u64 << 40)) {
        let digits = to_hex(value);
        prop_assert_eq!(u64::from_str_radix(&digits, 16).unwrap(), value);
        prop_assert_eq!(parse_hex(&hex_literal(value)).unwrap(), value);
        prop_assert!(digits == "0" || !digits.starts_with('0'));
        prop_assert_eq!(digits.to_lowercase(), digits);
    }

    #[test]
    fn adjustment_parses_back(diff in any::<i64>()) {
        let term = signed_hex_term(diff);
        prop_assert!(term.starts_with(Sign::of(diff).token()));
        prop_assert_eq!(parse_signed_hex_term(&term).unwrap(), diff);
    }
}

#[test]
fn test_hex_bijection_around_u32_max() {
    for value in [0, 1, 15, 16, u64::from(u32::MAX) - 1, u64::from(u32::MAX), 1 << 32] {
        assert_eq!(parse_hex(&hex_literal(value)).unwrap(), value);
    }
    assert_eq!(hex_literal(u64::from(u32::MAX)), "0xffffffff");
}

#[test]
fn test_negative_hex_is_a_domain_error() {
    assert!(matches!(try_to_hex(-5), Err(Error::NegativeHex(-5))));
}
