//! Concrete hand-derived scenarios (S1-S6) and boundary behaviors,
//! checked against all three kernels so a regression in any one of them
//! fails here.

use png_defilter_core::harness::random_image;
use png_defilter_core::{defilter_opt, defilter_ref, defilter_simd, FilterMethod};

type KernelFn = fn(&mut [u8], u32, u32, u32);
const KERNELS: [(&str, KernelFn); 3] = [
    ("ref", defilter_ref),
    ("opt", defilter_opt),
    ("simd", defilter_simd),
];

#[test]
fn s1_sub_bpp1() {
    for (name, kernel) in KERNELS {
        let mut buf = vec![1u8, 10, 20, 30, 40];
        kernel(&mut buf, 1, 1, 5);
        assert_eq!(&buf[1..], &[10, 30, 60, 100], "kernel {name}");
    }
}

#[test]
fn s2_up_bpp2() {
    for (name, kernel) in KERNELS {
        let mut buf = vec![0u8, 1, 2, 3, 4, 5, 6, 2, 10, 20, 30, 40, 50, 60];
        kernel(&mut buf, 2, 2, 7);
        assert_eq!(&buf[1..7], &[1, 2, 3, 4, 5, 6], "kernel {name} row0");
        assert_eq!(&buf[8..14], &[11, 22, 33, 44, 55, 66], "kernel {name} row1");
    }
}

#[test]
fn s3_avg_bpp1() {
    for (name, kernel) in KERNELS {
        let mut buf = vec![0u8, 10, 20, 30, 40, 3, 2, 4, 6, 8];
        kernel(&mut buf, 2, 1, 5);
        assert_eq!(&buf[1..5], &[10, 20, 30, 40], "kernel {name} row0");
        assert_eq!(&buf[6..10], &[7, 17, 29, 42], "kernel {name} row1");
    }
}

#[test]
fn s4_paeth_bpp3() {
    for (name, kernel) in KERNELS {
        let mut buf = vec![0u8, 10, 20, 30, 40, 50, 60, 4, 1, 1, 1, 1, 1, 1];
        kernel(&mut buf, 2, 3, 7);
        assert_eq!(&buf[1..7], &[10, 20, 30, 40, 50, 60], "kernel {name} row0");
        assert_eq!(&buf[8..14], &[11, 21, 31, 41, 51, 61], "kernel {name} row1");
    }
}

#[test]
fn s5_none_is_identity() {
    let (h, w, bpp) = (3u32, 17u32, 4u32);
    let bpl = w * bpp + 1;
    let original = random_image(99, h, w, bpp, 0);

    for (name, kernel) in KERNELS {
        let mut buf = original.clone();
        kernel(&mut buf, h, bpp, bpl);
        for y in 0..h {
            let row_start = (y * bpl) as usize;
            assert_eq!(
                &buf[row_start + 1..row_start + bpl as usize],
                &original[row_start + 1..row_start + bpl as usize],
                "kernel {name} row {y}"
            );
        }
    }
}

#[test]
fn s6_cycled_filter_bpp8_w64() {
    let (h, w, bpp) = (5u32, 64u32, 8u32);
    let bpl = w * bpp + 1;
    let seed = 0xC0FF_EE_u64;

    let mut reference = random_image(seed, h, w, bpp, 5);
    defilter_ref(&mut reference, h, bpp, bpl);

    for (name, kernel) in [("opt", defilter_opt as KernelFn), ("simd", defilter_simd)] {
        let mut candidate = random_image(seed, h, w, bpp, 5);
        kernel(&mut candidate, h, bpp, bpl);
        assert_eq!(candidate, reference, "kernel {name}");
    }
}

#[test]
fn boundary_width_one_never_enters_vector_body() {
    for &bpp in &[1u32, 2, 3, 4, 6, 8] {
        let bpl = bpp + 1;
        let seed = u64::from(bpp) * 31 + 7;

        let mut reference = random_image(seed, 4, 1, bpp, 5);
        defilter_ref(&mut reference, 4, bpp, bpl);

        let mut simd = random_image(seed, 4, 1, bpp, 5);
        defilter_simd(&mut simd, 4, bpp, bpl);

        assert_eq!(simd, reference, "bpp {bpp}");
    }
}

#[test]
fn filter_method_round_trips_through_from_int() {
    assert_eq!(FilterMethod::from_int(0), Some(FilterMethod::None));
    assert_eq!(FilterMethod::from_int(4), Some(FilterMethod::Paeth));
    assert_eq!(FilterMethod::from_int(5), None);
}
