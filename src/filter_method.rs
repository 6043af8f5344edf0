//! The PNG scanline filter-type enumeration and the internal,
//! dispatch-only "first row" variants used to special-case row 0 without
//! branching in the per-byte hot loop.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // Row-0 special cases: the above row is treated as all-zero.
    PaethFirst,
    AvgFirst,
}

impl FilterMethod {
    /// Decode a scanline's leading filter-type byte.
    ///
    /// Returns `None` for any value outside `0..=4`; callers that need a
    /// typed error for an invalid byte should go through
    /// [`crate::defilter_checked`] rather than matching on this directly.
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None,
        }
    }

    /// Remap a filter for row 0, where the "previous row" is implicitly
    /// all-zero. Sub needs no remapping: its left-neighbour-is-zero
    /// behaviour at the start of a row is identical on every row.
    pub(crate) fn for_first_row(self) -> FilterMethod {
        match self {
            FilterMethod::Up => FilterMethod::None,
            FilterMethod::Average => FilterMethod::AvgFirst,
            FilterMethod::Paeth => FilterMethod::PaethFirst,
            other => other,
        }
    }
}
