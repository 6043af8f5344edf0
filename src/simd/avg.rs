//! Average filter — unlike Up, this has the same kind of serial,
//! per-channel dependency as Sub (`current[i]` depends on
//! `current[i - bpp]`), so there is no way to fold 16 unrelated bytes
//! into one register the way `up.rs` does. What *is* parallel is the
//! `bpp` lanes within a single pixel: one `_mm_avg_epu8` computes the
//! floor-average for every channel of one pixel group at once, and the
//! row is walked one pixel group at a time, carrying the previous
//! group's reconstructed bytes forward as `left`.
//!
//! `_mm_avg_epu8` computes `(a + b + 1) >> 1`, i.e. *rounds*; the PNG
//! filter wants `(a + b) >> 1`, i.e. *floors*. The two disagree exactly
//! when `a ^ b` has its low bit set, so subtracting `(a ^ b) & 1` from
//! the rounded result recovers the floor average. Covers bpp in
//! `{4, 6, 8}`; bpp 1/2/3 fall back to scalar (see `src/simd/mod.rs`).

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{load_n, store_n};

#[target_feature(enable = "sse2")]
unsafe fn avg_row_n(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize, n: usize) {
    let width = p_end - p_start;
    let mut left = _mm_setzero_si128();
    let mut offset = 0usize;

    while offset < width {
        let p_idx = p_start + offset;
        let u_idx = u_start + offset;

        let raw = load_n(&buf[p_idx..p_idx + n], n);
        let up = load_n(&buf[u_idx..u_idx + n], n);

        let rounded = _mm_avg_epu8(left, up);
        let bias = _mm_and_si128(_mm_xor_si128(left, up), _mm_set1_epi8(1));
        let floor_avg = _mm_sub_epi8(rounded, bias);

        let result = _mm_add_epi8(raw, floor_avg);
        store_n(&mut buf[p_idx..p_idx + n], n, result);

        left = result;
        offset += n;
    }
}

pub(crate) unsafe fn avg_row_4(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    avg_row_n(buf, p_start, p_end, u_start, 4)
}

pub(crate) unsafe fn avg_row_6(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    avg_row_n(buf, p_start, p_end, u_start, 6)
}

pub(crate) unsafe fn avg_row_8(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    avg_row_n(buf, p_start, p_end, u_start, 8)
}
