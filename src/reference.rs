//! The straight, unoptimized translation of the PNG spec's reverse filter
//! step. This is the oracle every other kernel in this crate is checked
//! against — it exists to be obviously correct, not fast.

use log::trace;

use crate::filter_method::FilterMethod;
use crate::primitives::{avg, paeth_ref};

/// Reverse the per-scanline PNG filter over an entire decompressed image
/// block, in place.
///
/// # Preconditions (undefined behaviour if violated, not checked here)
/// - `bpl == w * bpp + 1` for some `w >= 1`
/// - `h >= 1`
/// - `bpp` in `{1, 2, 3, 4, 6, 8}`
/// - `buf.len() >= h as usize * bpl as usize`
/// - every row's leading byte is one of `{0, 1, 2, 3, 4}`
pub fn defilter_ref(buf: &mut [u8], h: u32, bpp: u32, bpl: u32) {
    let bpp = bpp as usize;
    let bpl = bpl as usize;

    // A pre-zeroed scratch row stands in for the implicit all-zero
    // scanline above row 0, so every row's "up" reads hit real memory
    // instead of special-casing `y == 0` at every read of `u`.
    let zero_row = vec![0u8; bpl];
    let mut prev_row_start: Option<usize> = None;

    for y in 0..h as usize {
        let row_start = y * bpl;
        let filter_byte = buf[row_start];
        let mut filter = FilterMethod::from_int(filter_byte)
            .unwrap_or_else(|| panic!("invalid filter byte {filter_byte} on row {y}"));

        if prev_row_start.is_none() {
            filter = filter.for_first_row();
        }

        trace!("row {y}: filter = {filter:?}");

        let p_start = row_start + 1;
        let p_end = row_start + bpl;

        match filter {
            FilterMethod::None => {
                // No-op: pixel bytes already equal the raw bytes.
            }
            FilterMethod::Sub => {
                for i in (p_start + bpp)..p_end {
                    buf[i] = buf[i].wrapping_add(buf[i - bpp]);
                }
            }
            FilterMethod::Up => {
                let u_start = prev_row_start.map(|s| s + 1).unwrap_or(0);
                for i in 0..(p_end - p_start) {
                    let up = if prev_row_start.is_some() {
                        buf[u_start + i]
                    } else {
                        zero_row[i]
                    };
                    buf[p_start + i] = buf[p_start + i].wrapping_add(up);
                }
            }
            FilterMethod::Average => {
                let u_start = prev_row_start.map(|s| s + 1).unwrap_or(0);
                for i in 0..bpp.min(p_end - p_start) {
                    let up = if prev_row_start.is_some() {
                        buf[u_start + i]
                    } else {
                        zero_row[i]
                    };
                    buf[p_start + i] = buf[p_start + i].wrapping_add((up as u32 >> 1) as u8);
                }
                for i in (p_start + bpp)..p_end {
                    let left = u32::from(buf[i - bpp]);
                    let up = if prev_row_start.is_some() {
                        u32::from(buf[u_start + (i - p_start)])
                    } else {
                        u32::from(zero_row[i - p_start])
                    };
                    buf[i] = buf[i].wrapping_add(avg(left, up) as u8);
                }
            }
            FilterMethod::AvgFirst => {
                for i in (p_start + bpp)..p_end {
                    let left = u32::from(buf[i - bpp]);
                    buf[i] = buf[i].wrapping_add((left >> 1) as u8);
                }
            }
            FilterMethod::Paeth => {
                let u_start = prev_row_start.map(|s| s + 1).unwrap_or(0);
                for i in 0..bpp.min(p_end - p_start) {
                    let up = if prev_row_start.is_some() {
                        buf[u_start + i]
                    } else {
                        zero_row[i]
                    };
                    buf[p_start + i] = buf[p_start + i].wrapping_add(up);
                }
                for i in (p_start + bpp)..p_end {
                    let left = buf[i - bpp];
                    let (up, up_left) = if prev_row_start.is_some() {
                        (buf[u_start + (i - p_start)], buf[u_start + (i - p_start) - bpp])
                    } else {
                        (zero_row[i - p_start], zero_row[i - p_start - bpp])
                    };
                    buf[i] = buf[i].wrapping_add(paeth_ref(up, left, up_left));
                }
            }
            FilterMethod::PaethFirst => {
                for i in (p_start + bpp)..p_end {
                    let left = buf[i - bpp];
                    buf[i] = buf[i].wrapping_add(paeth_ref(0, left, 0));
                }
            }
        }

        prev_row_start = Some(row_start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_filter_is_a_no_op() {
        let mut buf = vec![0u8, 10, 20, 30, 40];
        let original = buf.clone();
        defilter_ref(&mut buf, 1, 1, 5);
        assert_eq!(buf[1..], original[1..]);
    }

    #[test]
    fn sub_scenario_s1() {
        let mut buf = vec![1u8, 10, 20, 30, 40];
        defilter_ref(&mut buf, 1, 1, 5);
        assert_eq!(&buf[1..], &[10, 30, 60, 100]);
    }
}
