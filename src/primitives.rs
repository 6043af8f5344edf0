//! Byte arithmetic shared by every kernel: mod-256 addition, the PNG
//! Average filter's floor-average, the udiv3 trick used to express a
//! divide-by-three as a multiply-high, and two algebraically equivalent
//! formulations of the Paeth predictor.

/// `(a + b) mod 256`, computed in `u32` to avoid relying on wrapping
/// semantics at every call site.
#[inline(always)]
pub fn sum_mod256(a: u32, b: u32) -> u32 {
    (a + b) & 0xFF
}

/// Floor average of two byte values, computed with enough precision that
/// the intermediate sum never overflows. This is *not* the same as a
/// hardware rounded average (`PAVGB`/`_mm_avg_epu8`) — SIMD code paths
/// that reach for that instruction must correct its rounding bias (see
/// `src/simd/avg.rs`).
#[inline(always)]
pub fn avg(a: u32, b: u32) -> u32 {
    (a + b) >> 1
}

/// `x / 3` for `x in [0, 255]`, expressed as a multiply-high by `0xAB`.
/// The SIMD analogue multiplies by `0xAB << 7 == 0x5580` and takes the
/// high 16 bits of the 32-bit product (a 16-bit multiply-high), which is
/// the same shift amount rebalanced around a 16-bit lane.
#[inline(always)]
pub fn udiv3(x: u32) -> u32 {
    (x * 0xAB) >> 9
}

/// The canonical PNG-spec Paeth predictor: pick whichever of `a` (left),
/// `b` (above) or `c` (above-left) is nearest to `p = a + b - c`, ties
/// broken in favour of `a` then `b`. This is the oracle `paeth_opt` is
/// checked against.
#[inline(always)]
pub fn paeth_ref(b: u8, a: u8, c: u8) -> u8 {
    let a = i32::from(a);
    let b = i32::from(b);
    let c = i32::from(c);

    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

/// Branchless Paeth, built from `udiv3` and sign-extended shifts exactly
/// as described for the SIMD lanes in `src/simd/paeth.rs` — the scalar
/// and vector Paeth implementations in this crate share this one
/// derivation rather than the (also-valid, but differently shaped) STB
/// threshold formulation, so that `defilter_opt` and `defilter_simd`
/// are provably running the same arithmetic.
///
/// Note the argument order: `(a, b, c)` — left, above, above-left —
/// which is swapped relative to [`paeth_ref`]'s `(b, a, c)`.
#[inline(always)]
pub fn paeth_opt(a: u8, b: u8, c: u8) -> u8 {
    let a = i32::from(a);
    let b = i32::from(b);
    let c = i32::from(c);

    let lo = a.min(b);
    let hi = a.max(b);
    let d = udiv3((hi - lo) as u32) as i32;

    let lo_c = lo - c;
    let hi_c = hi - c;

    // mask_hi is all-ones when `hi` is the nearest candidate, i.e. when
    // `d + lo_c >= 0`; mask_lo is all-ones when `lo` is nearest, i.e.
    // when `d - hi_c < 0`. At most one of the two conditions holds at a
    // time except where `pa == pb`, where picking `hi` and `lo`
    // disagree only in which of the two equally-near candidates is
    // chosen, and `paeth_ref`'s tie-break (favour `a`) is preserved
    // because `lo`/`hi` are defined from `a`/`b` by value, not identity,
    // and `c` is the fallback when neither mask fires.
    let mask_hi = !((d + lo_c) >> 31);
    let mask_lo = !((d - hi_c) >> 31);

    let result = c + (hi_c & mask_hi) + (lo_c & mask_lo);
    result as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn udiv3_matches_integer_division() {
        for x in 0u32..=255 {
            assert_eq!(udiv3(x), x / 3, "udiv3({x})");
        }
    }

    #[test]
    fn avg_is_floor_not_round() {
        assert_eq!(avg(1, 2), 1);
        assert_eq!(avg(3, 4), 3);
        assert_eq!(avg(255, 255), 255);
        assert_eq!(avg(0, 1), 0);
    }

    #[test]
    fn paeth_opt_matches_paeth_ref_exhaustively() {
        // 256^3 triples; cheap scalar work, runs in well under a second.
        for a in 0u8..=255 {
            for b in 0u8..=255 {
                for c in 0u8..=255 {
                    let expected = paeth_ref(b, a, c);
                    let actual = paeth_opt(a, b, c);
                    assert_eq!(
                        actual, expected,
                        "paeth_opt({a}, {b}, {c}) = {actual}, expected {expected}"
                    );
                }
            }
        }
    }
}
