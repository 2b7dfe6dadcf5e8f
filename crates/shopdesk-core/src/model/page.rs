// ── Page of records ──
//
// One loaded page of a server-paginated collection. The page number is
// clamped on construction, so a `Page` never points past its own total.

use std::num::NonZeroU32;
use std::ops::RangeInclusive;

use serde::Serialize;

/// `ceil(total_count / page_size)`, saturating at `u32::MAX`.
pub fn total_pages(total_count: u64, page_size: NonZeroU32) -> u32 {
    u32::try_from(total_count.div_ceil(u64::from(page_size.get()))).unwrap_or(u32::MAX)
}

/// Clamp a requested page number into `[1, max(total_pages, 1)]`.
pub fn clamp_page(requested: u32, total_pages: u32) -> u32 {
    requested.clamp(1, total_pages.max(1))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total_count: u64,
    page_size: NonZeroU32,
    page_number: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_size: NonZeroU32, page_number: u32) -> Self {
        let page_number = clamp_page(page_number, total_pages(total_count, page_size));
        Self {
            items,
            total_count,
            page_size,
            page_number,
        }
    }

    pub fn empty(page_size: NonZeroU32) -> Self {
        Self::new(Vec::new(), 0, page_size, 1)
    }

    /// Records in server order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    /// Clamp a page request against this page's total.
    pub fn clamp(&self, requested: u32) -> u32 {
        clamp_page(requested, self.total_pages())
    }

    /// Pagination controls are shown only when there is more than one page.
    pub fn shows_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    /// Every page number, unwindowed.
    pub fn page_numbers(&self) -> RangeInclusive<u32> {
        1..=self.total_pages()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn size(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, size(10)), 3);
        assert_eq!(total_pages(30, size(10)), 3);
        assert_eq!(total_pages(0, size(10)), 0);
        assert_eq!(total_pages(1, size(10)), 1);
    }

    #[test]
    fn page_number_clamped_on_construction() {
        let page = Page::new(vec![1, 2, 3, 4, 5], 25, size(10), 5);
        assert_eq!(page.page_number(), 3);

        let page = Page::<u8>::new(vec![], 25, size(10), 0);
        assert_eq!(page.page_number(), 1);
    }

    #[test]
    fn empty_page() {
        let page = Page::<u8>::empty(size(10));
        assert!(page.is_empty());
        assert_eq!(page.total_count(), 0);
        assert_eq!(page.page_number(), 1);
        assert!(!page.shows_pagination());
        assert_eq!(page.page_numbers().count(), 0);
        assert_eq!(page.clamp(7), 1);
    }

    #[test]
    fn pagination_shown_only_past_one_page() {
        let single = Page::new(vec![0; 10], 10, size(10), 1);
        assert!(!single.shows_pagination());

        let many = Page::new(vec![0; 10], 11, size(10), 1);
        assert!(many.shows_pagination());
        assert_eq!(many.page_numbers().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn clamp_against_loaded_total() {
        let page = Page::new(vec![0; 10], 25, size(10), 1);
        assert_eq!(page.clamp(5), 3);
        assert_eq!(page.clamp(0), 1);
        assert_eq!(page.clamp(2), 2);
    }
}
