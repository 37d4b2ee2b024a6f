use rand::RngCore;
use veil_core::seed::Seed;

#[test]
fn test_deterministic_rng() {
    let seed = Seed::from_hex("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")
        .unwrap();

    let mut rng1 = seed.create_deterministic_rng();
    let mut rng2 = seed.create_deterministic_rng();

    assert_eq!(rng1.next_u32(), rng2.next_u32());
    assert_eq!(rng1.next_u64(), rng2.next_u64());
}

#[test]
fn test_u64_seeds_are_stable() {
    let mut rng1 = Seed::from_u64(42).create_deterministic_rng();
    let mut rng2 = Seed::from_u64(42).create_deterministic_rng();
    let mut rng3 = Seed::from_u64(43).create_deterministic_rng();

    let first = rng1.next_u64();
    assert_eq!(first, rng2.next_u64());
    assert_ne!(first, rng3.next_u64());
}

#[test]
fn test_hex_round_trip() {
    let seed = Seed::from_u64(7);
    let restored = Seed::from_hex(&seed.to_hex()).unwrap();
    assert_eq!(seed.to_hex(), restored.to_hex());
}

#[test]
fn test_rejects_bad_hex() {
    assert!(Seed::from_hex("0xzz").is_err());
    assert!(Seed::from_hex("0x1234").is_err());
}
