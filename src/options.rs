//! Runtime CPU-feature selection: compute which kernel a call is eligible
//! for once, then thread that decision through rather than re-detecting
//! on every call.

use crate::filter_method::FilterMethod;
use crate::{defilter_opt, defilter_simd};

/// Knobs controlling which kernel [`defilter_auto`] picks. `Copy` because
/// it is cheap enough to pass by value at every call site rather than
/// threaded through by reference.
#[derive(Copy, Clone, Debug)]
pub struct DefilterOptions {
    use_simd: bool,
}

impl Default for DefilterOptions {
    fn default() -> Self {
        Self {
            use_simd: cfg!(any(target_arch = "x86", target_arch = "x86_64")),
        }
    }
}

impl DefilterOptions {
    pub fn use_simd(&self) -> bool {
        self.use_simd
    }

    pub fn with_use_simd(mut self, use_simd: bool) -> Self {
        self.use_simd = use_simd;
        self
    }
}

fn bpp_has_simd_strategy(filter_hint: Option<FilterMethod>, bpp: u32) -> bool {
    match filter_hint {
        Some(FilterMethod::Average) => matches!(bpp, 4 | 6 | 8),
        Some(FilterMethod::Paeth) => matches!(bpp, 3 | 4 | 6 | 8),
        _ => true,
    }
}

/// Picks `defilter_simd` when the running CPU actually has the feature the
/// vector kernel requires and falls back to `defilter_opt` otherwise, so a
/// caller gets the fastest available kernel without having to duplicate
/// the `is_x86_feature_detected!` dance itself.
///
/// `bpp_has_simd_strategy` is conservative on purpose: since a single call
/// may mix several filter types across rows (the verification harness's
/// "cycle filters" mode), this only looks at whether *any* row could need
/// a scalar-only combination, via the `filter_hint` the caller supplies
/// when known. When `filter_hint` is `None` (the common case — caller
/// doesn't know ahead of time which filters appear in this image) the
/// SIMD kernel is used and it internally falls back per-row for the
/// bpp/filter pairs with no vector strategy, so correctness never depends
/// on this hint being accurate.
pub fn defilter_auto(buf: &mut [u8], h: u32, bpp: u32, bpl: u32, options: DefilterOptions) {
    defilter_auto_hinted(buf, h, bpp, bpl, options, None)
}

/// As [`defilter_auto`], but lets the caller assert which filter methods
/// will occur so `bpp_has_simd_strategy` can be used for more than
/// documentation. Most callers want [`defilter_auto`].
pub fn defilter_auto_hinted(
    buf: &mut [u8],
    h: u32,
    bpp: u32,
    bpl: u32,
    options: DefilterOptions,
    filter_hint: Option<FilterMethod>,
) {
    let simd_eligible = options.use_simd()
        && cfg!(feature = "sse")
        && cfg!(any(target_arch = "x86", target_arch = "x86_64"))
        && is_x86_feature_detected_sse41()
        && bpp_has_simd_strategy(filter_hint, bpp);

    if simd_eligible {
        defilter_simd(buf, h, bpp, bpl);
    } else {
        defilter_opt(buf, h, bpp, bpl);
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn is_x86_feature_detected_sse41() -> bool {
    is_x86_feature_detected!("sse4.1")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn is_x86_feature_detected_sse41() -> bool {
    false
}
