//! Up filter — no cross-lane dependency at all, so vectorizing it is
//! just a plain 16-byte-at-a-time add with a scalar tail.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{load_n, store_n};
use crate::constants::SIMD_LANE_BYTES;

#[target_feature(enable = "sse2")]
unsafe fn up_row_inner(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    let width = p_end - p_start;
    let mut offset = 0usize;

    while offset + SIMD_LANE_BYTES <= width {
        let p_idx = p_start + offset;
        let u_idx = u_start + offset;
        let p = load_n(&buf[p_idx..p_idx + SIMD_LANE_BYTES], SIMD_LANE_BYTES);
        let u = load_n(&buf[u_idx..u_idx + SIMD_LANE_BYTES], SIMD_LANE_BYTES);
        let sum = _mm_add_epi8(p, u);
        store_n(&mut buf[p_idx..p_idx + SIMD_LANE_BYTES], SIMD_LANE_BYTES, sum);
        offset += SIMD_LANE_BYTES;
    }

    for i in offset..width {
        buf[p_start + i] = buf[p_start + i].wrapping_add(buf[u_start + i]);
    }
}

pub(crate) unsafe fn up_row(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    up_row_inner(buf, p_start, p_end, u_start)
}
