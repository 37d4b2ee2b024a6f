//! Fixed-width signed integer arithmetic as performed by JavaScript bitwise operators.
//!
//! Every operator converts its operands with `ToInt32` and produces a value in
//! `[-2^31, 2^31 - 1]`. Results that leave that range wrap around instead of
//! growing, so the values computed here are exactly what generated code yields
//! once a JS engine executes it.

/// `a ^ b`
#[inline]
pub fn xor(a: i32, b: i32) -> i32 {
    a ^ b
}

/// `a & b`
#[inline]
pub fn and(a: i32, b: i32) -> i32 {
    a & b
}

/// `a | b`
#[inline]
pub fn or(a: i32, b: i32) -> i32 {
    a | b
}

/// `a << bits`. Only the low five bits of the shift count are used.
#[inline]
pub fn shl(a: i32, bits: u32) -> i32 {
    a.wrapping_shl(bits & 0x1f)
}

/// `(a - b) | 0`
#[inline]
pub fn sub(a: i32, b: i32) -> i32 {
    a.wrapping_sub(b)
}

/// `(a + b) | 0`
#[inline]
pub fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// `ToInt32` of an integral value: keep the low 32 bits, reinterpret as signed.
#[inline]
pub fn to_int32(value: i64) -> i32 {
    value as i32
}

/// Computes `(((hash ^ random1) << 5) - hash ^ random2) | 0`.
///
/// `-` binds tighter than `^`, so the difference is truncated by `ToInt32`
/// before it is xored with `random2`.
pub fn self_defense_term(hash: i32, random1: i32, random2: i32) -> i32 {
    xor(sub(shl(xor(hash, random1), 5), hash), random2)
}

/// One step of the string array hash: `((hash << 5) - hash + unit) | 0`.
#[inline]
pub fn hash_step(hash: i32, unit: u16) -> i32 {
    add(sub(shl(hash, 5), hash), i32::from(unit))
}
