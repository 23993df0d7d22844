/// Number of results shown per page
pub const PAGE_SIZE: usize = 5;

/// Slice of `results` starting at `offset`, at most `page_size` long
pub fn page<T>(results: &[T], offset: usize, page_size: usize) -> &[T] {
    let start = offset.min(results.len());
    let end = offset.saturating_add(page_size).min(results.len());
    &results[start..end]
}

/// Next offset, or `offset` unchanged when no further page exists
pub fn advance(offset: usize, page_size: usize, total: usize) -> usize {
    if offset + page_size < total {
        offset + page_size
    } else {
        offset
    }
}

/// Previous offset, or `offset` unchanged when already on the first page
pub fn retreat(offset: usize, page_size: usize) -> usize {
    if offset >= page_size {
        offset - page_size
    } else {
        offset
    }
}

/// Pagination window over one ranked result list
///
/// Owned by a single session. A new cursor starts at offset 0, which is how a
/// change of title resets pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    start: usize,
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn advance(&mut self, total: usize) {
        self.start = advance(self.start, PAGE_SIZE, total);
    }

    pub fn retreat(&mut self) {
        self.start = retreat(self.start, PAGE_SIZE);
    }

    pub fn window<'a, T>(&self, results: &'a [T]) -> &'a [T] {
        page(results, self.start, PAGE_SIZE)
    }

    pub fn has_previous(&self) -> bool {
        self.start >= PAGE_SIZE
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.start + PAGE_SIZE < total
    }
}
