//! Paeth filter — same per-group serial walk as `avg.rs` (`current[i]`
//! depends on `current[i - bpp]`), but the predictor itself needs more
//! than 8 bits of headroom (`p = a + b - c` ranges well outside
//! `0..=255`), so each pixel group is widened from 8-bit to 16-bit
//! lanes with a single `_mm_unpacklo_epi8` against zero, run through
//! the same udiv3-multiply-high / sign-mask derivation as
//! [`crate::primitives::paeth_opt`], and packed back down with
//! `_mm_packus_epi16`.
//!
//! This is deliberately the same branchless derivation as the scalar
//! kernel, rather than a nearest-of-three `cmpeq`+`blendv` selector, so
//! `defilter_opt` and `defilter_simd` run provably matching arithmetic.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{load_n, store_n};

#[target_feature(enable = "sse4.1")]
unsafe fn paeth_row_n(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize, n: usize) {
    let width = p_end - p_start;
    let zero = _mm_setzero_si128();
    let all_ones = _mm_set1_epi16(-1);
    let mul_const = _mm_set1_epi16(0xAB);

    // `left` (a) and `prev_up` (c) carry the previous group's
    // reconstructed bytes and the previous group's up-row bytes
    // respectively; both start at zero, matching the scalar kernel's
    // `paeth_opt(0, up, 0)` treatment of the row's first pixel group.
    let mut left = zero;
    let mut prev_up = zero;
    let mut offset = 0usize;

    while offset < width {
        let p_idx = p_start + offset;
        let u_idx = u_start + offset;

        let raw = load_n(&buf[p_idx..p_idx + n], n);
        let up = load_n(&buf[u_idx..u_idx + n], n);

        let a16 = _mm_unpacklo_epi8(left, zero);
        let b16 = _mm_unpacklo_epi8(up, zero);
        let c16 = _mm_unpacklo_epi8(prev_up, zero);

        let lo = _mm_min_epi16(a16, b16);
        let hi = _mm_max_epi16(a16, b16);
        let diff = _mm_sub_epi16(hi, lo);
        let d = _mm_srli_epi16::<9>(_mm_mullo_epi16(diff, mul_const));

        let lo_c = _mm_sub_epi16(lo, c16);
        let hi_c = _mm_sub_epi16(hi, c16);

        let mask_hi = _mm_xor_si128(_mm_srai_epi16::<15>(_mm_add_epi16(d, lo_c)), all_ones);
        let mask_lo = _mm_xor_si128(_mm_srai_epi16::<15>(_mm_sub_epi16(d, hi_c)), all_ones);

        let mut predicted = _mm_add_epi16(c16, _mm_and_si128(hi_c, mask_hi));
        predicted = _mm_add_epi16(predicted, _mm_and_si128(lo_c, mask_lo));

        let predicted8 = _mm_packus_epi16(predicted, predicted);
        let sum = _mm_add_epi8(raw, predicted8);
        store_n(&mut buf[p_idx..p_idx + n], n, sum);

        left = sum;
        prev_up = up;
        offset += n;
    }
}

pub(crate) unsafe fn paeth_row_3(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    paeth_row_n(buf, p_start, p_end, u_start, 3)
}

pub(crate) unsafe fn paeth_row_4(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    paeth_row_n(buf, p_start, p_end, u_start, 4)
}

pub(crate) unsafe fn paeth_row_6(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    paeth_row_n(buf, p_start, p_end, u_start, 6)
}

pub(crate) unsafe fn paeth_row_8(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    paeth_row_n(buf, p_start, p_end, u_start, 8)
}
