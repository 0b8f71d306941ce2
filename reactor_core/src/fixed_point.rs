//! Integer arithmetic helpers for the pipeline.
//!
//! Every stage works on `i32` readings with wider intermediates, so no input
//! combination can overflow and results are identical on every target.

/// Divide `num` by `den`, rounding to nearest with ties away from zero.
///
/// `den` must be non-zero; a negative denominator is folded into the numerator.
#[inline]
pub fn div_round_half_away(num: i64, den: i64) -> i64 {
    debug_assert!(den != 0, "div_round_half_away: zero denominator");
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let half = den / 2;
    if num >= 0 {
        (num + half) / den
    } else {
        (num - half) / den
    }
}

/// Linear re-scale of `x` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
///
/// Truncating division, as the classic microcontroller `map()` does. A
/// degenerate input span maps everything onto `out_lo`.
///
/// Two full-width spans multiply to 64 significant bits, so the product is
/// taken in i128.
#[inline]
pub fn map_linear(x: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    let in_span = i128::from(in_hi) - i128::from(in_lo);
    if in_span == 0 {
        return out_lo;
    }
    let out_span = i128::from(out_hi) - i128::from(out_lo);
    let scaled = (i128::from(x) - i128::from(in_lo)) * out_span / in_span + i128::from(out_lo);
    saturate_i32(i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX }))
}

#[inline]
pub fn saturate_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Absolute difference of two i32 values as u32 without overflow.
///
/// Uses 64-bit intermediates to avoid overflow during subtraction.
/// For any `i32` inputs, `|a - b| <= u32::MAX`, so the cast is always lossless.
#[inline]
pub fn abs_diff_i32_u32(a: i32, b: i32) -> u32 {
    let diff = i64::from(a) - i64::from(b);
    let mag = diff.unsigned_abs();
    debug_assert!(
        mag <= u64::from(u32::MAX),
        "abs_diff_i32_u32: magnitude out of u32 range: {mag}"
    );
    mag as u32
}
