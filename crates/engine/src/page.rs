//! Pagination metadata.
//!
//! The backend paginates server-side but not every endpoint reports it, so
//! the metadata is resolved in a fixed order: server-reported values win,
//! the client derives the rest from what it holds.

use api_types::envelope::Pagination;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub total: u64,
    pub per_page: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            total: 0,
            per_page: 1,
            page: 1,
            total_pages: 1,
        }
    }
}

impl PageMeta {
    /// `max(1, ceil(total / per_page))`; an empty set still has one page.
    #[must_use]
    pub fn total_pages(total: u64, per_page: u64) -> u64 {
        total.div_ceil(per_page.max(1)).max(1)
    }

    /// Resolves metadata for the current view.
    ///
    /// Server-reported fields take precedence; missing ones are derived
    /// from the visible row count and the requested page/limit.
    #[must_use]
    pub fn resolve(
        server: Option<&Pagination>,
        visible_len: usize,
        requested_page: u64,
        requested_per_page: u64,
    ) -> Self {
        let per_page = server
            .and_then(|p| p.per_page)
            .unwrap_or(requested_per_page)
            .max(1);
        let total = server
            .and_then(|p| p.total)
            .unwrap_or(visible_len as u64);
        let page = server
            .and_then(|p| p.page)
            .unwrap_or(requested_page)
            .max(1);
        let total_pages = server
            .and_then(|p| p.total_pages)
            .unwrap_or_else(|| Self::total_pages(total, per_page))
            .max(1);

        Self {
            total,
            per_page,
            page,
            total_pages,
        }
    }

    /// Slices the rows belonging to the current page.
    ///
    /// When the reported total exceeds the rows we hold, the backend has
    /// already sliced this page; slicing again would drop rows, so the set
    /// is returned whole. Only a full client-side set is windowed here.
    #[must_use]
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        if self.total > rows.len() as u64 {
            return rows;
        }
        let first = self.page.saturating_sub(1).saturating_mul(self.per_page);
        let start = usize::try_from(first).unwrap_or(usize::MAX).min(rows.len());
        let end = usize::try_from(first.saturating_add(self.per_page))
            .unwrap_or(usize::MAX)
            .min(rows.len());
        &rows[start..end]
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_never_below_one() {
        assert_eq!(PageMeta::total_pages(0, 10), 1);
        assert_eq!(PageMeta::total_pages(1, 10), 1);
        assert_eq!(PageMeta::total_pages(10, 10), 1);
        assert_eq!(PageMeta::total_pages(11, 10), 2);
        assert_eq!(PageMeta::total_pages(37, 10), 4);
        // Nonsense per_page is clamped rather than dividing by zero.
        assert_eq!(PageMeta::total_pages(5, 0), 5);
    }

    #[test]
    fn server_fields_win_over_derived() {
        let server = Pagination {
            total: Some(37),
            per_page: Some(10),
            page: Some(2),
            total_pages: None,
        };
        let meta = PageMeta::resolve(Some(&server), 10, 1, 20);
        assert_eq!(meta.total, 37);
        assert_eq!(meta.per_page, 10);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_pages, 4);
    }

    #[test]
    fn derives_from_visible_set_without_server_block() {
        let meta = PageMeta::resolve(None, 45, 3, 20);
        assert_eq!(meta.total, 45);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page, 3);
    }

    #[test]
    fn server_page_is_not_resliced() {
        let rows: Vec<u32> = (0..20).collect();
        let server = Pagination {
            total: Some(50),
            per_page: Some(20),
            page: Some(2),
            total_pages: Some(3),
        };
        let meta = PageMeta::resolve(Some(&server), rows.len(), 2, 20);
        assert_eq!(meta.slice(&rows).len(), 20);
    }

    #[test]
    fn full_client_set_is_windowed() {
        let rows: Vec<u32> = (0..45).collect();
        let meta = PageMeta::resolve(None, rows.len(), 3, 20);
        let window = meta.slice(&rows);
        assert_eq!(window.len(), 5);
        assert_eq!(window[0], 40);

        let past_end = PageMeta::resolve(None, rows.len(), 9, 20);
        assert!(past_end.slice(&rows).is_empty());
    }
}
