//! Pagination over query-string page numbers.

use serde::{Deserialize, Serialize};

/// Limit/offset pagination driven by a `page` query parameter.
///
/// Plugins use this to page through row-store results and to build
/// navigation links; the core never paginates anything itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pager {
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// Offset of the first item on the current page.
    pub offset: u64,
}

impl Pager {
    /// Build a pager from the raw `page` query value.
    ///
    /// Anything that does not parse as a positive integer is treated as
    /// page 1.
    pub fn from_query(raw_page: &str, limit: u64) -> Self {
        let page = raw_page.parse::<u64>().unwrap_or(1).max(1);
        Self {
            page,
            limit,
            offset: (page - 1) * limit,
        }
    }

    /// Link to a specific page, preserving the base path.
    pub fn link(&self, base: &str, page: u64) -> String {
        let sep = if base.contains('?') { '&' } else { '?' };
        format!("{base}{sep}page={page}")
    }

    /// Link to the first page.
    pub fn first_link(&self, base: &str) -> String {
        self.link(base, 1)
    }

    /// Link to the next page.
    pub fn next_link(&self, base: &str) -> String {
        self.link(base, self.page + 1)
    }

    /// Link to the previous page, clamped at page 1.
    pub fn prev_link(&self, base: &str) -> String {
        self.link(base, self.page.saturating_sub(1).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_parses_page() {
        let pager = Pager::from_query("3", 10);
        assert_eq!(pager.page, 3);
        assert_eq!(pager.offset, 20);
        assert_eq!(pager.limit, 10);
    }

    #[test]
    fn test_from_query_rejects_garbage() {
        for raw in ["", "abc", "0", "-2"] {
            let pager = Pager::from_query(raw, 10);
            assert_eq!(pager.page, 1, "raw {raw:?}");
            assert_eq!(pager.offset, 0);
        }
    }

    #[test]
    fn test_links() {
        let pager = Pager::from_query("2", 10);
        assert_eq!(pager.next_link("/products"), "/products?page=3");
        assert_eq!(pager.prev_link("/products"), "/products?page=1");
        assert_eq!(pager.first_link("/products?q=x"), "/products?q=x&page=1");
    }

    #[test]
    fn test_prev_link_clamps_at_one() {
        let pager = Pager::from_query("1", 10);
        assert_eq!(pager.prev_link("/p"), "/p?page=1");
    }
}
