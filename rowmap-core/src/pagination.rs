pub const PAGINATION_DEFAULT_OFFSET: i64 = 0;
pub const PAGINATION_DEFAULT_LENGTH: i64 = 16;
pub const PAGINATION_MIN_LENGTH: i64 = 1;
pub const PAGINATION_MAX_LENGTH: i64 = 256;

/// Limits applied when a [`Pagination`] is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationBounds {
    pub default_length: i64,
    pub min_length: i64,
    pub max_length: i64,
}

impl PaginationBounds {
    pub fn clamp_length(&self, length: i64) -> i64 {
        if length == 0 {
            self.default_length
        } else if length < self.min_length {
            self.min_length
        } else if length > self.max_length {
            self.max_length
        } else {
            length
        }
    }
    pub fn clamp_offset(&self, offset: i64) -> i64 {
        offset.max(0)
    }
}

impl Default for PaginationBounds {
    fn default() -> Self {
        Self {
            default_length: PAGINATION_DEFAULT_LENGTH,
            min_length: PAGINATION_MIN_LENGTH,
            max_length: PAGINATION_MAX_LENGTH,
        }
    }
}

/// Window of rows to read. Always holds clamped values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    offset: i64,
    length: i64,
}

impl Pagination {
    pub fn new(offset: i64, length: i64) -> Self {
        Self::with_bounds(offset, length, &PaginationBounds::default())
    }
    pub fn with_bounds(offset: i64, length: i64, bounds: &PaginationBounds) -> Self {
        Self {
            offset: bounds.clamp_offset(offset),
            length: bounds.clamp_length(length),
        }
    }
    pub fn offset(&self) -> i64 {
        self.offset
    }
    pub fn length(&self) -> i64 {
        self.length
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGINATION_DEFAULT_OFFSET, PAGINATION_DEFAULT_LENGTH)
    }
}
