//! A vectorized PNG reverse-scanline-filter core.
//!
//! PNG encoders prefix each scanline with a filter-type byte and transform
//! pixel bytes relative to their left and upper neighbours; decoders must
//! undo that transform before handing pixels to a consumer. This crate is
//! that undo step — the hot path between a DEFLATE decompressor and
//! whatever draws or re-encodes the pixels — and nothing else: no chunk
//! parsing, no CRC checking, no DEFLATE, no interlacing, no color
//! conversion, no file I/O.
//!
//! Three kernels share one signature, `(buf: &mut [u8], h: u32, bpp: u32,
//! bpl: u32)`, and are required to produce byte-for-byte identical output:
//!
//! - [`defilter_ref`] — the straight, unoptimized translation of the PNG
//!   spec; the oracle the other two are checked against.
//! - [`defilter_opt`] — the same algorithm with `bpp` monomorphized to a
//!   compile-time parameter.
//! - [`defilter_simd`] — a hand-vectorized 128-bit SSE implementation, with
//!   a scalar fallback everywhere the platform or the filter/bpp pair has
//!   no vector strategy.
//!
//! Callers that don't want to make the kernel choice and CPU-feature
//! detection themselves can go through [`defilter_auto`], and callers
//! handed untrusted scanline data (as opposed to data already screened by a
//! PNG chunk parser) should go through [`defilter_checked`], which turns an
//! invalid filter byte or an inconsistent `(h, bpp, bpl, buf.len())` tuple
//! into a [`DefilterError`] instead of undefined behaviour.
//!
//! # Usage
//!
//! ```
//! use png_defilter_core::defilter_ref;
//!
//! // filter byte 1 (Sub), one row, bpp = 1
//! let mut buf = vec![1u8, 10, 20, 30, 40];
//! defilter_ref(&mut buf, 1, 1, 5);
//! assert_eq!(&buf[1..], &[10, 30, 60, 100]);
//! ```

mod constants;
mod error;
mod filter_method;
mod options;
mod primitives;
mod reference;
mod specialized;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod simd;

pub mod harness;

pub use error::DefilterError;
pub use filter_method::FilterMethod;
pub use options::{defilter_auto, defilter_auto_hinted, DefilterOptions};
pub use reference::defilter_ref;
pub use specialized::defilter_opt;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
pub use simd::defilter_simd;

/// When the `sse` feature is off, or the target isn't x86/x86_64, there is
/// no vector kernel to call into — `defilter_simd` becomes a plain alias
/// for [`defilter_opt`], per the `sse` feature's documented contract in
/// `Cargo.toml`.
#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse")))]
pub fn defilter_simd(buf: &mut [u8], h: u32, bpp: u32, bpl: u32) {
    defilter_opt(buf, h, bpp, bpl)
}

/// Validate `(h, bpp, bpl, buf.len())` and every scanline's leading filter
/// byte, then reverse the filter using the best kernel this build has
/// compiled in — SIMD when available, the specialized scalar kernel
/// otherwise. Unlike the three raw kernels, this never invokes undefined
/// behaviour on malformed input; it returns a typed error instead.
pub fn defilter_checked(buf: &mut [u8], h: u32, bpp: u32, bpl: u32) -> Result<(), DefilterError> {
    if !constants::is_supported_bpp(bpp) {
        return Err(DefilterError::UnsupportedBpp(bpp));
    }

    let bpl_usize = bpl as usize;
    let bpp_usize = bpp as usize;
    if bpl_usize == 0 || (bpl_usize - 1) % bpp_usize != 0 || (bpl_usize - 1) / bpp_usize < 1 {
        return Err(DefilterError::UnsupportedBpp(bpp));
    }

    let expected = h as usize * bpl_usize;
    if buf.len() < expected {
        return Err(DefilterError::BufferTooSmall {
            expected,
            actual: buf.len(),
        });
    }

    for y in 0..h {
        let filter_byte = buf[y as usize * bpl_usize];
        if FilterMethod::from_int(filter_byte).is_none() {
            return Err(DefilterError::InvalidFilterByte {
                row: y,
                value: filter_byte,
            });
        }
    }

    defilter_auto(buf, h, bpp, bpl, DefilterOptions::default());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_rejects_unsupported_bpp() {
        let mut buf = vec![0u8; 10];
        assert!(matches!(
            defilter_checked(&mut buf, 1, 5, 10),
            Err(DefilterError::UnsupportedBpp(5))
        ));
    }

    #[test]
    fn checked_rejects_invalid_filter_byte() {
        let mut buf = vec![9u8, 1, 2, 3, 4];
        assert!(matches!(
            defilter_checked(&mut buf, 1, 1, 5),
            Err(DefilterError::InvalidFilterByte { row: 0, value: 9 })
        ));
    }

    #[test]
    fn checked_rejects_buffer_too_small() {
        let mut buf = vec![0u8; 4];
        assert!(matches!(
            defilter_checked(&mut buf, 1, 1, 5),
            Err(DefilterError::BufferTooSmall { expected: 5, actual: 4 })
        ));
    }

    #[test]
    fn checked_accepts_and_defilters_valid_input() {
        let mut buf = vec![1u8, 10, 20, 30, 40];
        assert!(defilter_checked(&mut buf, 1, 1, 5).is_ok());
        assert_eq!(&buf[1..], &[10, 30, 60, 100]);
    }
}
