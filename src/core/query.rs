//! Query parameters and pagination utilities

use axum::Json;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Name of the response header carrying [`PaginationHeader`]
pub const PAGINATION_HEADER: &str = "pagination";

/// Pagination parameters for list endpoints
///
/// Extracted from URL query strings. Values are clamped per listing kind
/// with [`PageRequest::clamp`] before they reach a store.
///
/// # Example
/// ```rust,ignore
/// GET /api/posts/{id}/comments?page_number=2&page_size=10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PageRequest {
    /// Page number (starts at 1, anything lower is treated as 1)
    pub page_number: i64,

    /// Number of items per page (zero or negative means "use the listing default")
    pub page_size: i64,
}

/// Size limits for one listing kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageLimits {
    /// Size used when the client sends none
    pub default_size: u32,

    /// Server-side ceiling
    pub max_size: u32,
}

impl PageLimits {
    pub const fn new(default_size: u32, max_size: u32) -> Self {
        Self {
            default_size,
            max_size,
        }
    }
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Normalize against the limits of a listing
    pub fn clamp(self, limits: PageLimits) -> Self {
        let page_size = if self.page_size <= 0 {
            i64::from(limits.default_size)
        } else {
            self.page_size.min(i64::from(limits.max_size))
        };

        Self {
            page_number: self.page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    /// A single page holding every row, for internal fan-out queries
    pub fn all() -> Self {
        Self::new(1, i64::MAX)
    }

    /// Number of items to skip
    pub fn offset(&self) -> usize {
        (self.page_number.max(1) as usize - 1).saturating_mul(self.limit())
    }

    /// Number of items to take
    pub fn limit(&self) -> usize {
        self.page_size.max(1) as usize
    }

    /// Slice an already ordered collection into a page
    pub fn slice<T>(&self, ordered: Vec<T>) -> Page<T> {
        let total_count = ordered.len();
        let items = ordered
            .into_iter()
            .skip(self.offset())
            .take(self.limit())
            .collect();

        Page::new(items, *self, total_count)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub page_size: i64,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: usize) -> Self {
        Self {
            items,
            current_page: request.page_number.max(1),
            page_size: request.page_size.max(1),
            total_count,
            total_pages: total_count.div_ceil(request.limit()),
        }
    }

    /// An empty page that still echoes the request
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    /// Transform the items, dropping those `f` maps to `None`
    ///
    /// Metadata still describes the underlying query.
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Page<U> {
        Page {
            items: self.items.into_iter().filter_map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    /// Metadata as sent in the `Pagination` response header
    pub fn header_value(&self) -> PaginationHeader {
        PaginationHeader {
            current_page: self.current_page,
            items_per_page: self.page_size,
            total_items: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// Body of the `Pagination` response header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationHeader {
    pub current_page: i64,
    pub items_per_page: i64,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Listing responses: the items as JSON body, metadata in the `Pagination` header
impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let header = serde_json::to_string(&self.header_value())
            .ok()
            .and_then(|value| HeaderValue::from_str(&value).ok());

        let mut response = Json(self.items).into_response();
        if let Some(value) = header {
            response.headers_mut().insert(PAGINATION_HEADER, value);
        }
        response
    }
}
