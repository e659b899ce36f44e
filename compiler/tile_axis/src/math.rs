//! Integer helpers shared by every merge and transfer rule.

/// Divisibility assigned to the value 0, which every power of two divides.
///
/// Capped at `2^62` instead of "unbounded" so the lattice stays a finite
/// descending chain of positive `i64`s and products of two sentinels can
/// be detected as overflow rather than wrapping silently.
pub const ZERO_DIVISIBILITY: i64 = 1 << 62;

/// Greatest common divisor by the Euclidean algorithm.
///
/// `gcd(0, b) == b` and `gcd(0, 0) == 0`. Negative inputs are taken by
/// magnitude; the analysis itself only ever passes positive values.
pub fn gcd(a: i64, b: i64) -> i64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while a != 0 {
        let r = b % a;
        b = a;
        a = r;
    }
    // Only gcd(i64::MIN, 0) and gcd(i64::MIN, i64::MIN) reach 2^63.
    i64::try_from(b).unwrap_or(ZERO_DIVISIBILITY)
}

/// Largest power of two dividing `n`, capped at [`ZERO_DIVISIBILITY`].
///
/// `highest_pow2_divisor(0) == ZERO_DIVISIBILITY`.
pub fn highest_pow2_divisor(n: i64) -> i64 {
    if n == 0 {
        return ZERO_DIVISIBILITY;
    }
    1i64 << n.trailing_zeros().min(62)
}

/// Divisibility of a product: `a * b`, or `max(a, b)` if that overflows.
///
/// Each factor divides the true product, so the fallback stays sound.
pub fn mul_divisibility(a: i64, b: i64) -> i64 {
    a.checked_mul(b).unwrap_or(a.max(b))
}
