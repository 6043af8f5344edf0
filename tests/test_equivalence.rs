//! Cross-kernel equivalence over a full random sweep: `defilter_opt` and
//! `defilter_simd` must byte-for-byte match `defilter_ref` for every
//! `(w, h, bpp, filter)` combination. Diffs the three kernels against
//! each other rather than against a reference decoder, since there is no
//! compressed container in scope here.

use png_defilter_core::harness::check;
use png_defilter_core::{defilter_opt, defilter_ref, defilter_simd};

#[test]
fn specialized_matches_reference() {
    assert!(check("specialized", defilter_ref, defilter_opt));
}

#[test]
fn simd_matches_reference() {
    assert!(check("simd", defilter_ref, defilter_simd));
}
