//! Offset pagination.

/// Default number of rows per page when nothing is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Build a page request, clamping page number and size to at least 1.
    #[must_use]
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.number.saturating_sub(1)) * i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: Page,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page.size))
    }

    /// 1-based index of the first row on this page, 0 when the page is empty.
    #[must_use]
    pub fn from(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }

        u64::from(self.page.number.saturating_sub(1)) * u64::from(self.page.size) + 1
    }

    /// 1-based index of the last row on this page, 0 when the page is empty.
    #[must_use]
    pub fn to(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }

        let len = u64::try_from(self.items.len()).unwrap_or(u64::MAX);

        self.from() + len - 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_to_one() {
        let page = Page::new(0, 0);

        assert_eq!(page.number, 1);
        assert_eq!(page.size, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = Page::new(3, 20);

        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn bounds_describe_rows_on_page() {
        let paginated = Paginated {
            items: vec![1, 2, 3],
            total: 23,
            page: Page::new(3, 10),
        };

        assert_eq!(paginated.total_pages(), 3);
        assert_eq!(paginated.from(), 21);
        assert_eq!(paginated.to(), 23);
    }

    #[test]
    fn empty_page_has_zero_bounds() {
        let paginated = Paginated::<u8> {
            items: Vec::new(),
            total: 0,
            page: Page::default(),
        };

        assert_eq!(paginated.total_pages(), 0);
        assert_eq!(paginated.from(), 0);
        assert_eq!(paginated.to(), 0);
    }
}
