use proptest::prelude::*;
use veil_core::int32::{hash_step, self_defense_term, to_int32};
use veil_verification::{Environment, evaluate};

proptest! {
    #[test]
    fn self_defense_term_matches_engine_semantics(
        hash in any::<i32>(),
        random1 in 0i32..=1_000_000,
        random2 in 0i32..=1_000_000,
    ) {
        let env = Environment::from([("h".to_string(), i64::from(hash))]);
        let expression = format!("((((h^{random1}) << 5) - h^{random2})|0)");
        let evaluated = evaluate(&expression, &env).unwrap();
        prop_assert_eq!(evaluated, i64::from(self_defense_term(hash, random1, random2)));
    }

    #[test]
    fn hash_step_is_times_31_plus_unit(text in "\\PC{0,24}") {
        let mut expected = 0i32;
        let mut hash = 0i32;
        for unit in text.encode_utf16() {
            expected = expected.wrapping_mul(31).wrapping_add(i32::from(unit));
            hash = hash_step(hash, unit);
        }
        prop_assert_eq!(hash, expected);
    }

    #[test]
    fn evaluator_bitwise_operators_follow_js(a in any::<i32>(), b in any::<i32>(), shift in 0u32..64) {
        let env = Environment::from([
            ("a".to_string(), i64::from(a)),
            ("b".to_string(), i64::from(b)),
            ("s".to_string(), i64::from(shift)),
        ]);
        let eval = |expression: &str| evaluate(expression, &env).unwrap();
        prop_assert_eq!(eval("a | b"), i64::from(a | b));
        prop_assert_eq!(eval("a ^ b"), i64::from(a ^ b));
        prop_assert_eq!(eval("a & b"), i64::from(a & b));
        prop_assert_eq!(eval("a << s"), i64::from(((i64::from(a)) << (shift % 32)) as i32));
        prop_assert_eq!(eval("a - b | 0"), i64::from(a.wrapping_sub(b)));
    }

    #[test]
    fn to_int32_keeps_low_bits(value in any::<i64>()) {
        prop_assert_eq!(to_int32(value) as u32, value as u64 as u32);
    }
}

#[test]
fn test_self_defense_term_of_zeroes() {
    assert_eq!(self_defense_term(0, 0, 0), 0);
    assert_eq!(self_defense_term(1, 0, 0), 31);
}
