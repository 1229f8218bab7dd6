//! Pagination bookkeeping for the review feed.

/// Cursor tracking the position within the paginated review set.
///
/// Invariants: once the total is known, `offset <= total_known` and
/// `has_more == (offset < total_known)`. Before the first successful page
/// the total is unknown and `has_more` is optimistically true so the first
/// load proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Index of the next review to request.
    offset: usize,
    /// Slice size for the next request.
    limit: usize,
    /// Total review count reported by the source, zero until known.
    total_known: usize,
    /// Whether another page can be requested.
    has_more: bool,
}

impl PageCursor {
    /// Creates a cursor at the start of the set with the given page size.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit,
            total_known: 0,
            has_more: true,
        }
    }

    /// Returns the index of the next review to request.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the slice size for the next request.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the total review count reported by the source.
    #[must_use]
    pub const fn total_known(&self) -> usize {
        self.total_known
    }

    /// Returns true while another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Advances past a successfully merged page.
    ///
    /// The offset moves by the number of items actually appended rather
    /// than by the requested limit, so partial batches never open gaps.
    /// The limit shrinks to the remaining count once that falls below it.
    pub(crate) fn advance(&mut self, added: usize, total: usize) {
        self.offset = self.offset.saturating_add(added);
        self.total_known = total;
        self.has_more = self.offset < total;

        let remaining = total.saturating_sub(self.offset);
        if remaining > 0 {
            self.limit = self.limit.min(remaining);
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(20)
    }
}
