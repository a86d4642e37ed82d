use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// 1-based page request. Both fields are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Zero values fall back to the defaults.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn page(&self) -> u32 { self.page }
    pub fn limit(&self) -> u32 { self.limit }

    pub fn offset(&self) -> u64 { u64::from(self.page - 1) * u64::from(self.limit) }

    pub fn total_pages(&self, total_items: u64) -> u64 { total_items.div_ceil(u64::from(self.limit)) }
}

impl Default for PageRequest {
    fn default() -> Self { Self::new(DEFAULT_PAGE, DEFAULT_LIMIT) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "todos")]
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self { items, current_page: request.page(), total_pages: request.total_pages(total_items), total_items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_use_defaults() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn offset_and_total_pages() {
        let req = PageRequest::new(3, 10);
        assert_eq!(req.offset(), 20);
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(10), 1);
        assert_eq!(req.total_pages(15), 2);
        assert_eq!(req.total_pages(21), 3);
    }

    #[test]
    fn large_page_offset_does_not_overflow() {
        let req = PageRequest::new(u32::MAX, u32::MAX);
        assert_eq!(req.offset(), u64::from(u32::MAX - 1) * u64::from(u32::MAX));
    }

    #[test]
    fn page_serializes_items_as_todos() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2), 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["todos"], serde_json::json!([1, 2]));
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["totalItems"], 5);
    }
}
