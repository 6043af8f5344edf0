//! The per-bpp specialized scalar kernel: identical arithmetic to
//! [`crate::reference`], but with `bpp` made a compile-time
//! (const-generic) parameter so the compiler can unroll the `0..bpp`
//! prologue, propagate constant strides, and autovectorize the inner
//! loops on its own. A small runtime dispatch table picks the right
//! monomorphized instantiation for a given `bpp`.
//!
//! Like [`crate::reference`], reconstruction happens in place: rather
//! than carrying two raw pointers (`p`/`u`) that would alias once a row
//! is reconstructed over its own raw bytes, each filter body indexes a
//! single buffer through two row offsets.

use log::trace;

use crate::filter_method::FilterMethod;
use crate::primitives::paeth_opt;

#[allow(clippy::manual_memcpy)]
pub(crate) fn handle_sub<const N: usize>(buf: &mut [u8], p_start: usize, p_end: usize) {
    for i in (p_start + N)..p_end {
        buf[i] = buf[i].wrapping_add(buf[i - N]);
    }
}

pub(crate) fn handle_up(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    for i in 0..(p_end - p_start) {
        buf[p_start + i] = buf[p_start + i].wrapping_add(buf[u_start + i]);
    }
}

#[allow(clippy::manual_memcpy)]
pub(crate) fn handle_avg<const N: usize>(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    for i in 0..N {
        buf[p_start + i] = buf[p_start + i].wrapping_add(buf[u_start + i] >> 1);
    }
    for i in (p_start + N)..p_end {
        let a = u32::from(buf[i - N]);
        let b = u32::from(buf[u_start + (i - p_start)]);
        // Floor average via the "average with overflow handling" bit
        // trick: (a & b) + ((a ^ b) >> 1) == floor((a + b) / 2), and it
        // never needs more than 8 bits of intermediate precision.
        let c = (a & b) + ((a ^ b) >> 1);
        buf[i] = buf[i].wrapping_add(c as u8);
    }
}

pub(crate) fn handle_avg_first<const N: usize>(buf: &mut [u8], p_start: usize, p_end: usize) {
    for i in (p_start + N)..p_end {
        let avg = buf[i - N] >> 1;
        buf[i] = buf[i].wrapping_add(avg);
    }
}

#[allow(clippy::manual_memcpy)]
pub(crate) fn handle_paeth<const N: usize>(buf: &mut [u8], p_start: usize, p_end: usize, u_start: usize) {
    for i in 0..N {
        let up = buf[u_start + i];
        buf[p_start + i] = buf[p_start + i].wrapping_add(paeth_opt(0, up, 0));
    }
    for i in (p_start + N)..p_end {
        let left = buf[i - N];
        let up = buf[u_start + (i - p_start)];
        let up_left = buf[u_start + (i - p_start) - N];
        buf[i] = buf[i].wrapping_add(paeth_opt(left, up, up_left));
    }
}

pub(crate) fn handle_paeth_first<const N: usize>(buf: &mut [u8], p_start: usize, p_end: usize) {
    for i in (p_start + N)..p_end {
        let left = buf[i - N];
        buf[i] = buf[i].wrapping_add(paeth_opt(left, 0, 0));
    }
}

/// Reverse the per-scanline PNG filter using the `bpp`-monomorphized
/// scalar kernel. Same preconditions and byte-for-byte output as
/// [`crate::reference::defilter_ref`].
pub fn defilter_opt(buf: &mut [u8], h: u32, bpp: u32, bpl: u32) {
    let bpl = bpl as usize;
    let mut prev_row_start: Option<usize> = None;

    for y in 0..h as usize {
        let row_start = y * bpl;
        let filter_byte = buf[row_start];
        let mut filter = FilterMethod::from_int(filter_byte)
            .unwrap_or_else(|| panic!("invalid filter byte {filter_byte} on row {y}"));
        if prev_row_start.is_none() {
            filter = filter.for_first_row();
        }
        trace!("row {y}: filter = {filter:?} (specialized, bpp = {bpp})");

        let p_start = row_start + 1;
        let p_end = row_start + bpl;
        // For row 0 there is no real previous row; Up is remapped to
        // None and Average/Paeth to their *First variants, none of
        // which ever read through `u_start`, so any offset is safe to
        // pass here.
        let u_start = prev_row_start.map(|s| s + 1).unwrap_or(0);

        match (filter, bpp) {
            (FilterMethod::None, _) => {}
            (FilterMethod::Sub, 1) => handle_sub::<1>(buf, p_start, p_end),
            (FilterMethod::Sub, 2) => handle_sub::<2>(buf, p_start, p_end),
            (FilterMethod::Sub, 3) => handle_sub::<3>(buf, p_start, p_end),
            (FilterMethod::Sub, 4) => handle_sub::<4>(buf, p_start, p_end),
            (FilterMethod::Sub, 6) => handle_sub::<6>(buf, p_start, p_end),
            (FilterMethod::Sub, 8) => handle_sub::<8>(buf, p_start, p_end),
            (FilterMethod::Up, _) => handle_up(buf, p_start, p_end, u_start),
            (FilterMethod::Average, 1) => handle_avg::<1>(buf, p_start, p_end, u_start),
            (FilterMethod::Average, 2) => handle_avg::<2>(buf, p_start, p_end, u_start),
            (FilterMethod::Average, 3) => handle_avg::<3>(buf, p_start, p_end, u_start),
            (FilterMethod::Average, 4) => handle_avg::<4>(buf, p_start, p_end, u_start),
            (FilterMethod::Average, 6) => handle_avg::<6>(buf, p_start, p_end, u_start),
            (FilterMethod::Average, 8) => handle_avg::<8>(buf, p_start, p_end, u_start),
            (FilterMethod::AvgFirst, 1) => handle_avg_first::<1>(buf, p_start, p_end),
            (FilterMethod::AvgFirst, 2) => handle_avg_first::<2>(buf, p_start, p_end),
            (FilterMethod::AvgFirst, 3) => handle_avg_first::<3>(buf, p_start, p_end),
            (FilterMethod::AvgFirst, 4) => handle_avg_first::<4>(buf, p_start, p_end),
            (FilterMethod::AvgFirst, 6) => handle_avg_first::<6>(buf, p_start, p_end),
            (FilterMethod::AvgFirst, 8) => handle_avg_first::<8>(buf, p_start, p_end),
            (FilterMethod::Paeth, 1) => handle_paeth::<1>(buf, p_start, p_end, u_start),
            (FilterMethod::Paeth, 2) => handle_paeth::<2>(buf, p_start, p_end, u_start),
            (FilterMethod::Paeth, 3) => handle_paeth::<3>(buf, p_start, p_end, u_start),
            (FilterMethod::Paeth, 4) => handle_paeth::<4>(buf, p_start, p_end, u_start),
            (FilterMethod::Paeth, 6) => handle_paeth::<6>(buf, p_start, p_end, u_start),
            (FilterMethod::Paeth, 8) => handle_paeth::<8>(buf, p_start, p_end, u_start),
            (FilterMethod::PaethFirst, 1) => handle_paeth_first::<1>(buf, p_start, p_end),
            (FilterMethod::PaethFirst, 2) => handle_paeth_first::<2>(buf, p_start, p_end),
            (FilterMethod::PaethFirst, 3) => handle_paeth_first::<3>(buf, p_start, p_end),
            (FilterMethod::PaethFirst, 4) => handle_paeth_first::<4>(buf, p_start, p_end),
            (FilterMethod::PaethFirst, 6) => handle_paeth_first::<6>(buf, p_start, p_end),
            (FilterMethod::PaethFirst, 8) => handle_paeth_first::<8>(buf, p_start, p_end),
            (_, other) => panic!("unsupported bpp: {other}"),
        }

        prev_row_start = Some(row_start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_on_scenario_s1() {
        let mut buf = vec![1u8, 10, 20, 30, 40];
        defilter_opt(&mut buf, 1, 1, 5);
        assert_eq!(&buf[1..], &[10, 30, 60, 100]);
    }
}
