use std::fmt::{Debug, Formatter};

/// Errors surfaced by the validating entry points and the verification
/// harness. The three raw kernels (`defilter_ref`, `defilter_opt`,
/// `defilter_simd`) never return this — their preconditions are
/// documented, not checked; see the crate-level docs.
pub enum DefilterError {
    /// A scanline's leading byte was not one of the five defined filter
    /// types.
    InvalidFilterByte { row: u32, value: u8 },
    /// `bpp` was outside the supported set `{1, 2, 3, 4, 6, 8}`.
    UnsupportedBpp(u32),
    /// The buffer is shorter than `h * bpl` bytes.
    BufferTooSmall { expected: usize, actual: usize },
}

impl Debug for DefilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilterByte { row, value } => {
                writeln!(f, "invalid filter byte {value} on row {row}")
            }
            Self::UnsupportedBpp(bpp) => writeln!(f, "unsupported bpp: {bpp}"),
            Self::BufferTooSmall { expected, actual } => {
                writeln!(f, "buffer too small: expected {expected} bytes, got {actual}")
            }
        }
    }
}
