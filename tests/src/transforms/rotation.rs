use proptest::prelude::*;
use veil_core::number::parse_signed_hex_term;
use veil_transform::rotation::RotationFormula;
use veil_verification::{Environment, check_rotation_round_trip, evaluate};

fn rotation_values() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(0u32),
        1u32..=1_000,
        (i32::MAX as u32 - 1_000)..=i32::MAX as u32,
        any::<u32>().prop_map(|v| v & 0x7fff_ffff),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn expression_plus_adjustment_is_the_rotation_value(
        rotation in rotation_values(),
        hash in any::<i32>(),
        random1 in 0i32..=1_000_000,
        random2 in 0i32..=1_000_000,
    ) {
        prop_assert!(check_rotation_round_trip(rotation, hash, random1, random2).is_ok());
    }

    #[test]
    fn adjustment_token_is_the_exact_difference(
        rotation in rotation_values(),
        hash in any::<i32>(),
        random1 in 0i32..=1_000_000,
        random2 in 0i32..=1_000_000,
    ) {
        let formula = RotationFormula::derive(rotation, hash, random1, random2, "h");
        prop_assert_eq!(parse_signed_hex_term(formula.adjustment()).unwrap(), formula.diff);
        prop_assert_eq!(i64::from(formula.calculated) + formula.diff, i64::from(rotation));
    }

    #[test]
    fn a_different_hash_breaks_the_expression(
        rotation in rotation_values(),
        hash in any::<i32>(),
        random1 in 0i32..=1_000_000,
        random2 in 0i32..=1_000_000,
    ) {
        let formula = RotationFormula::derive(rotation, hash, random1, random2, "h");
        let tampered = Environment::from([("h".to_string(), i64::from(hash.wrapping_add(1)))]);
        let value = evaluate(&formula.expression(), &tampered).unwrap();
        prop_assert_ne!(value, i64::from(rotation));
    }
}

#[test]
fn test_hardened_scenario_with_zero_inputs() {
    let formula = RotationFormula::derive(1, 0, 0, 0, "h");
    assert_eq!(formula.calculated, 0);
    assert_eq!(formula.diff, 1);
    assert_eq!(formula.adjustment(), "+0x1");

    let env = Environment::from([("h".to_string(), 0)]);
    assert_eq!(evaluate(&formula.expression(), &env).unwrap(), 1);
}
