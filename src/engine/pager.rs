//! Pagination over the filtered and sorted row sequence

/// Requested window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub offset: usize,
    pub limit: usize,
}

impl PageSpec {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Clamps the window to a sequence of `total` rows.
    ///
    /// An offset past the end yields an empty page, never an error.
    pub fn window(&self, total: usize) -> Page {
        let start = self.offset.min(total);
        let end = self.offset.saturating_add(self.limit).min(total);
        Page { start, end, total }
    }
}

/// Served slice `[start, end)` of a sequence of `total` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl Page {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when rows remain after this page
    pub fn has_more(&self) -> bool {
        self.end < self.total
    }

    /// Selects this page out of a row sequence
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.start..self.end]
    }
}
