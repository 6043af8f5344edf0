//! Sub filter — prefix-sum vectorization.
//!
//! `current[i] = raw[i] + current[i - bpp]` is a per-channel running
//! sum. Within one 16-byte window this is a textbook Hillis-Steele
//! parallel prefix sum at stride `bpp`: double the stride each step
//! (`bpp, 2*bpp, 4*bpp, ...`) until it would reach past the register,
//! using whole-register byte shifts to look back by each stride. The
//! carry into the next window is the finished window's last `bpp`
//! bytes, tiled across all 16 lanes so a single vector add folds it in
//! regardless of how the window boundary falls relative to pixel
//! boundaries (it need not coincide).

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{load_n, store_n};
use crate::constants::{sub_shift_schedule, SIMD_LANE_BYTES};

#[target_feature(enable = "sse2")]
#[inline(always)]
unsafe fn shl_bytes(v: __m128i, n: u32) -> __m128i {
    match n {
        1 => _mm_slli_si128::<1>(v),
        2 => _mm_slli_si128::<2>(v),
        3 => _mm_slli_si128::<3>(v),
        4 => _mm_slli_si128::<4>(v),
        6 => _mm_slli_si128::<6>(v),
        8 => _mm_slli_si128::<8>(v),
        12 => _mm_slli_si128::<12>(v),
        other => unreachable!("unsupported sub shift amount {other}"),
    }
}

#[target_feature(enable = "sse2")]
unsafe fn sub_row_inner(buf: &mut [u8], p_start: usize, p_end: usize, bpp: usize) {
    let schedule = sub_shift_schedule(bpp);
    let width = p_end - p_start;

    // Running carry, already tiled across all 16 lanes; zero for the
    // first window of the row (there is nothing to its left).
    let mut carry = _mm_setzero_si128();
    let mut offset = 0usize;

    while offset + SIMD_LANE_BYTES <= width {
        let idx = p_start + offset;
        let mut v = load_n(&buf[idx..idx + SIMD_LANE_BYTES], SIMD_LANE_BYTES);

        for &shift in schedule {
            v = _mm_add_epi8(v, shl_bytes(v, shift));
        }
        v = _mm_add_epi8(v, carry);

        store_n(&mut buf[idx..idx + SIMD_LANE_BYTES], SIMD_LANE_BYTES, v);

        // Tile the last `bpp` bytes of this window across all 16 lanes
        // to seed the next window's carry.
        let mut tail = [0u8; 16];
        _mm_storeu_si128(tail.as_mut_ptr().cast(), v);
        let mut tiled = [0u8; 16];
        for i in 0..16 {
            tiled[i] = tail[16 - bpp + (i % bpp)];
        }
        carry = _mm_loadu_si128(tiled.as_ptr().cast());

        offset += SIMD_LANE_BYTES;
    }

    // Scalar tail: whatever is left is shorter than one lane. The
    // formula below also covers the "no vector iterations ran at all"
    // case (offset == 0, e.g. w == 1), where it degenerates to the
    // ordinary scalar Sub recurrence starting right after the
    // no-op `0..bpp` prologue.
    for i in (p_start + offset).max(p_start + bpp)..p_end {
        buf[i] = buf[i].wrapping_add(buf[i - bpp]);
    }
}

pub(crate) unsafe fn sub_row(buf: &mut [u8], p_start: usize, p_end: usize, bpp: usize) {
    sub_row_inner(buf, p_start, p_end, bpp)
}
