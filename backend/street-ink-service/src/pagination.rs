//! Length-aware page requests and metadata.
//!
//! A `page` query parameter that is missing, non-numeric, zero or negative is
//! coerced to page 1. Requests past the last page are valid and simply yield
//! no items.

use actix_web::HttpRequest;
use serde::Serialize;
use url::form_urlencoded;
use utoipa::ToSchema;

const PAGE_PARAM: &str = "page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: i64, per_page: u32) -> Self {
        let page = page.clamp(1, i64::from(u32::MAX)) as u32;
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    /// Resolve the raw `page` query value.
    pub fn from_param(raw: Option<&str>, per_page: u32) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Number of leading items that must be known to produce this page.
    pub fn window(&self) -> u64 {
        self.offset() + u64::from(self.per_page)
    }

    pub fn last_page(&self, total: u64) -> u32 {
        let per_page = u64::from(self.per_page);
        let pages = (total + per_page - 1) / per_page;
        pages.clamp(1, u64::from(u32::MAX)) as u32
    }
}

/// Base path and the query parameters to carry across page links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    path: String,
    query: Vec<(String, String)>,
}

impl PageUrl {
    pub fn new(path: impl Into<String>, query_string: &str) -> Self {
        let query = form_urlencoded::parse(query_string.as_bytes())
            .filter(|(key, _)| *key != PAGE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self {
            path: path.into(),
            query,
        }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        Self::new(req.path(), req.query_string())
    }

    /// Link to `page`, keeping every other query parameter in order.
    pub fn for_page(&self, page: u32) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            serializer.append_pair(key, value);
        }
        serializer.append_pair(PAGE_PARAM, &page.to_string());
        format!("{}?{}", self.path, serializer.finish())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Items across every page
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
    /// 1-based position of the first item on this page
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub first_page_url: String,
    pub last_page_url: String,
    pub prev_page_url: Option<String>,
    pub next_page_url: Option<String>,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: u64, items_on_page: usize, url: &PageUrl) -> Self {
        let current_page = request.page();
        let last_page = request.last_page(total);
        let (from, to) = if items_on_page == 0 {
            (None, None)
        } else {
            let first = request.offset() + 1;
            (Some(first), Some(first + items_on_page as u64 - 1))
        };

        Self {
            total,
            per_page: request.per_page(),
            current_page,
            last_page,
            from,
            to,
            first_page_url: url.for_page(1),
            last_page_url: url.for_page(last_page),
            prev_page_url: (current_page > 1).then(|| url.for_page(current_page - 1)),
            next_page_url: (current_page < last_page).then(|| url.for_page(current_page + 1)),
        }
    }
}

/// One page of items plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64, url: &PageUrl) -> Self {
        let meta = PageMeta::new(request, total, data.len(), url);
        Self { data, meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pages_are_coerced_to_first() {
        assert_eq!(PageRequest::from_param(None, 10).page(), 1);
        assert_eq!(PageRequest::from_param(Some("0"), 10).page(), 1);
        assert_eq!(PageRequest::from_param(Some("-4"), 10).page(), 1);
        assert_eq!(PageRequest::from_param(Some("abc"), 10).page(), 1);
        assert_eq!(PageRequest::from_param(Some(" 3 "), 10).page(), 3);
    }

    #[test]
    fn offset_and_window_follow_page_size() {
        let req = PageRequest::new(3, 10);
        assert_eq!(req.offset(), 20);
        assert_eq!(req.window(), 30);
    }

    #[test]
    fn last_page_is_ceiling_with_floor_of_one() {
        let req = PageRequest::new(1, 10);
        assert_eq!(req.last_page(0), 1);
        assert_eq!(req.last_page(10), 1);
        assert_eq!(req.last_page(11), 2);
        assert_eq!(req.last_page(15), 2);
    }

    #[test]
    fn links_preserve_other_query_parameters() {
        let url = PageUrl::new("/api/v1/feed", "tag=murals&page=2&sort=new");
        assert_eq!(url.for_page(3), "/api/v1/feed?tag=murals&sort=new&page=3");
    }

    #[test]
    fn meta_for_middle_page() {
        let url = PageUrl::new("/api/v1/feed", "");
        let meta = PageMeta::new(PageRequest::new(2, 10), 25, 10, &url);

        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.from, Some(11));
        assert_eq!(meta.to, Some(20));
        assert_eq!(meta.prev_page_url.as_deref(), Some("/api/v1/feed?page=1"));
        assert_eq!(meta.next_page_url.as_deref(), Some("/api/v1/feed?page=3"));
    }

    #[test]
    fn meta_past_last_page_has_no_items_and_no_next() {
        let url = PageUrl::new("/api/v1/feed", "");
        let meta = PageMeta::new(PageRequest::new(9, 10), 15, 0, &url);

        assert_eq!(meta.total, 15);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.current_page, 9);
        assert_eq!(meta.from, None);
        assert_eq!(meta.next_page_url, None);
        assert_eq!(meta.prev_page_url.as_deref(), Some("/api/v1/feed?page=8"));
    }
}
