//! The hand-vectorized 128-bit byte kernel: one inner loop per filter,
//! specialized over `bpp`, with a scalar tail for whatever doesn't fill a
//! whole 16-byte lane. Checks the required CPU feature flag once per call
//! and falls back to the specialized scalar kernel (with a `warn!`)
//! rather than producing wrong output if it's missing. Covers the full
//! `{1, 2, 3, 4, 6, 8}` bpp set, with Sub and Paeth vectorized via
//! prefix-sum and udiv3-mask arithmetic respectively (see the doc
//! comments on `simd::sub` and `simd::paeth`).
//!
//! This module, and everything under it, only exists on x86/x86_64 with
//! the `sse` feature enabled; [`crate::defilter_simd`] falls back to
//! [`crate::specialized::defilter_opt`] everywhere else.

#![cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

mod avg;
mod paeth;
mod sub;
mod up;

use log::{trace, warn};

use crate::filter_method::FilterMethod;
use crate::specialized::{
    defilter_opt, handle_avg, handle_avg_first, handle_paeth, handle_paeth_first,
};

/// Load up to 16 bytes into a 128-bit register, zero-padding the rest.
/// Handles any width from 1 to 16 via a zeroed stack buffer — the extra
/// bytes are never read back by `store_n`.
#[target_feature(enable = "sse2")]
#[inline(always)]
unsafe fn load_n(bytes: &[u8], n: usize) -> __m128i {
    let mut tmp = [0u8; 16];
    tmp[..n].copy_from_slice(&bytes[..n]);
    _mm_loadu_si128(tmp.as_ptr().cast())
}

/// Store the low `n` bytes of a 128-bit register back to memory.
#[target_feature(enable = "sse2")]
#[inline(always)]
unsafe fn store_n(out: &mut [u8], n: usize, v: __m128i) {
    let mut tmp = [0u8; 16];
    _mm_storeu_si128(tmp.as_mut_ptr().cast(), v);
    out[..n].copy_from_slice(&tmp[..n]);
}

/// Reverse the per-scanline PNG filter using the hand-vectorized SSE
/// kernel. Same preconditions and byte-for-byte output as
/// [`crate::reference::defilter_ref`]. If the running CPU does not
/// actually support the SSE4.1 feature this module requires, this logs a
/// `warn!` and falls back to [`crate::specialized::defilter_opt`] rather
/// than crashing a caller that invoked this kernel directly; callers that
/// want the fallback decided ahead of time should go through
/// [`crate::options::defilter_auto`] instead.
pub fn defilter_simd(buf: &mut [u8], h: u32, bpp: u32, bpl: u32) {
    if !is_x86_feature_detected!("sse4.1") {
        warn!("SSE4.1 not available on this CPU, falling back to the specialized scalar kernel");
        return defilter_opt(buf, h, bpp, bpl);
    }

    let bpl = bpl as usize;
    let bpp_usize = bpp as usize;
    let mut prev_row_start: Option<usize> = None;

    for y in 0..h as usize {
        let row_start = y * bpl;
        let filter_byte = buf[row_start];
        let mut filter = FilterMethod::from_int(filter_byte)
            .unwrap_or_else(|| panic!("invalid filter byte {filter_byte} on row {y}"));
        if prev_row_start.is_none() {
            filter = filter.for_first_row();
        }
        trace!("row {y}: filter = {filter:?} (simd, bpp = {bpp})");

        let p_start = row_start + 1;
        let p_end = row_start + bpl;
        let u_start = prev_row_start.map(|s| s + 1).unwrap_or(0);

        match filter {
            FilterMethod::None => {}
            FilterMethod::Sub => unsafe { sub::sub_row(buf, p_start, p_end, bpp_usize) },
            FilterMethod::Up => unsafe { up::up_row(buf, p_start, p_end, u_start) },
            FilterMethod::Average => match bpp_usize {
                // No SIMD strategy for Avg at bpp in {1, 2, 3}: fall
                // back to scalar rather than fabricate a vector path.
                4 => unsafe { avg::avg_row_4(buf, p_start, p_end, u_start) },
                6 => unsafe { avg::avg_row_6(buf, p_start, p_end, u_start) },
                8 => unsafe { avg::avg_row_8(buf, p_start, p_end, u_start) },
                1 => {
                    warn!("row {y}: avg bpp=1 has no SIMD path, falling back to scalar");
                    handle_avg::<1>(buf, p_start, p_end, u_start)
                }
                2 => {
                    warn!("row {y}: avg bpp=2 has no SIMD path, falling back to scalar");
                    handle_avg::<2>(buf, p_start, p_end, u_start)
                }
                3 => {
                    warn!("row {y}: avg bpp=3 has no SIMD path, falling back to scalar");
                    handle_avg::<3>(buf, p_start, p_end, u_start)
                }
                other => panic!("unsupported bpp: {other}"),
            },
            FilterMethod::AvgFirst => match bpp_usize {
                1 => handle_avg_first::<1>(buf, p_start, p_end),
                2 => handle_avg_first::<2>(buf, p_start, p_end),
                3 => handle_avg_first::<3>(buf, p_start, p_end),
                4 => handle_avg_first::<4>(buf, p_start, p_end),
                6 => handle_avg_first::<6>(buf, p_start, p_end),
                8 => handle_avg_first::<8>(buf, p_start, p_end),
                other => panic!("unsupported bpp: {other}"),
            },
            FilterMethod::Paeth => match bpp_usize {
                // No SIMD strategy for Paeth at bpp in {1, 2}.
                3 => unsafe { paeth::paeth_row_3(buf, p_start, p_end, u_start) },
                4 => unsafe { paeth::paeth_row_4(buf, p_start, p_end, u_start) },
                6 => unsafe { paeth::paeth_row_6(buf, p_start, p_end, u_start) },
                8 => unsafe { paeth::paeth_row_8(buf, p_start, p_end, u_start) },
                1 => {
                    warn!("row {y}: paeth bpp=1 has no SIMD path, falling back to scalar");
                    handle_paeth::<1>(buf, p_start, p_end, u_start)
                }
                2 => {
                    warn!("row {y}: paeth bpp=2 has no SIMD path, falling back to scalar");
                    handle_paeth::<2>(buf, p_start, p_end, u_start)
                }
                other => panic!("unsupported bpp: {other}"),
            },
            FilterMethod::PaethFirst => match bpp_usize {
                1 => handle_paeth_first::<1>(buf, p_start, p_end),
                2 => handle_paeth_first::<2>(buf, p_start, p_end),
                3 => handle_paeth_first::<3>(buf, p_start, p_end),
                4 => handle_paeth_first::<4>(buf, p_start, p_end),
                6 => handle_paeth_first::<6>(buf, p_start, p_end),
                8 => handle_paeth_first::<8>(buf, p_start, p_end),
                other => panic!("unsupported bpp: {other}"),
            },
        }

        prev_row_start = Some(row_start);
    }
}
