//! The verification harness: a deterministic random-image generator plus
//! an exhaustive cross-kernel equivalence check. This module is test/dev
//! tooling, not a stable contract — the generator's exact byte output may
//! change between releases; only its determinism (same call, same
//! `(w, h, bpp, filter, seed)`, same bytes) is a promise anything else in
//! this crate relies on.

use nanorand::{Rng, WyRand};

use crate::constants::SUPPORTED_BPP;

const TABLE_LEN: usize = 299;

const fn build_table() -> [u8; TABLE_LEN] {
    let mut table = [0u8; TABLE_LEN];
    let mut i = 0;
    while i < TABLE_LEN {
        // An arbitrary fixed byte stream; no relationship to PNG pixel
        // data is implied or required, only that it repeats in a way
        // that looks nothing like a trivial counter.
        table[i] = ((i * 167 + 59) % 256) as u8;
        i += 1;
    }
    table
}

const TABLE: [u8; TABLE_LEN] = build_table();

/// Generate a deterministic pseudo-random filtered scanline block. Two
/// calls with the same `(seed, h, w, bpp, filter)` MUST produce identical
/// buffers — [`check`] relies on exactly this.
///
/// `filter` selects the filter-type byte every non-first row uses; `5`
/// means "cycle through `{0, 1, 2, 3, 4}` one row at a time" instead of a
/// fixed value. Row 0's filter byte is always `0` (`None`), since PNG
/// forbids anything else on the first scanline of a block.
pub fn random_image(seed: u64, h: u32, w: u32, bpp: u32, filter: u32) -> Vec<u8> {
    let bpl = (w * bpp + 1) as usize;
    let mut buf = vec![0u8; h as usize * bpl];

    let mut i1 = (seed % TABLE_LEN as u64) as usize;
    let mut i2 = ((seed / 7 + 13) % TABLE_LEN as u64) as usize;

    for y in 0..h as usize {
        let row_start = y * bpl;
        buf[row_start] = if y == 0 {
            0
        } else if filter == 5 {
            (y - 1) as u8 % 5
        } else {
            filter as u8
        };

        for b in buf.iter_mut().take(row_start + bpl).skip(row_start + 1) {
            *b = TABLE[i1] ^ TABLE[i2];
            i1 = (i1 + 1) % TABLE_LEN;
            i2 = (i2 + 2) % TABLE_LEN;
        }
    }

    buf
}

/// Signature shared by all three kernels (and anything else meant to be
/// checked against the reference kernel).
pub type KernelFn = fn(&mut [u8], u32, u32, u32);

/// Run `candidate` and `reference` over identical random images across a
/// full `(filter, h, w, bpp)` sweep (`filter in 0..=5`, `h in 1..20`,
/// `w in 1..100`, `bpp in {1,2,3,4,6,8}`) and report whether every case's
/// pixel bytes matched byte-for-byte. `name` is used only to label
/// failure output.
///
/// Per-tuple seeds are drawn from one [`WyRand`] instance seeded with a
/// fixed constant, so repeated runs sweep the exact same tuples without
/// hand-enumerating a seed for each one, and the sweep itself never
/// becomes a source of flakiness.
pub fn check(name: &str, reference: KernelFn, candidate: KernelFn) -> bool {
    const HARNESS_SEED: u64 = 0x5EED_1E55_u64;
    let mut rng = WyRand::new_seed(HARNESS_SEED);
    let mut all_ok = true;

    for filter in 0u32..=5 {
        for h in 1u32..20 {
            for w in 1u32..100 {
                for &bpp in &SUPPORTED_BPP {
                    let seed = rng.generate::<u64>();
                    let bpl = w * bpp + 1;

                    let mut expected = random_image(seed, h, w, bpp, filter);
                    let mut actual = expected.clone();

                    reference(&mut expected, h, bpp, bpl);
                    candidate(&mut actual, h, bpp, bpl);

                    if let Some((y, x, exp, act)) =
                        first_pixel_mismatch(&expected, &actual, h, bpl)
                    {
                        eprintln!(
                            "{name}: mismatch at (w={w}, h={h}, bpp={bpp}, bpl={bpl}, \
                             y={y}, x={x}, filter={filter}): expected {exp}, got {act}"
                        );
                        all_ok = false;
                    }
                }
            }
        }
    }

    all_ok
}

fn first_pixel_mismatch(
    expected: &[u8],
    actual: &[u8],
    h: u32,
    bpl: u32,
) -> Option<(u32, u32, u8, u8)> {
    for y in 0..h {
        let row_start = (y * bpl) as usize;
        for x in 0..(bpl - 1) {
            let idx = row_start + 1 + x as usize;
            if expected[idx] != actual[idx] {
                return Some((y, x, expected[idx], actual[idx]));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_image_is_deterministic() {
        let a = random_image(42, 3, 5, 4, 5);
        let b = random_image(42, 3, 5, 4, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn row_zero_filter_byte_is_always_none() {
        let img = random_image(7, 4, 3, 1, 5);
        assert_eq!(img[0], 0);
    }
}
