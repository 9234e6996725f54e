//! Page-number pagination primitives shared by listing endpoints.
//!
//! A [`PageRequest`] captures the validated `page`/`limit` pair supplied by a
//! client and derives the SQL offset. A [`Page`] is the response envelope:
//! the total `count`, absolute `next`/`previous` links and the `results` for
//! the requested page.
//!
//! Links are built from the URL of the current request so that any other
//! query parameters (filters, `recipes_limit`, ...) survive navigation.

use serde::Serialize;
use url::Url;

/// Page size used when the client does not supply `limit`.
pub const DEFAULT_LIMIT: u32 = 6;

/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Errors raised while validating pagination input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `page` was zero.
    #[error("page must be a positive integer")]
    InvalidPage,
    /// `limit` was zero or larger than [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}")]
    InvalidLimit {
        /// Upper bound for the page size.
        max: u32,
    },
    /// The requested page lies beyond the last page.
    #[error("page {page} is out of range")]
    PageOutOfRange {
        /// Requested page number.
        page: u64,
    },
}

/// Validated page-number request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(Some(3), Some(10)).expect("valid request");
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from optional client input, applying defaults.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPage`] for page zero and
    /// [`PaginationError::InvalidLimit`] for a limit outside `1..=MAX_LIMIT`.
    pub fn new(page: Option<u64>, limit: Option<u32>) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PaginationError::InvalidLimit { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit as u64)
    }

    /// Reject pages past the end of a collection holding `count` items.
    ///
    /// The first page is always valid, even for an empty collection.
    ///
    /// # Errors
    /// Returns [`PaginationError::PageOutOfRange`] when the offset is not
    /// below `count` for any page after the first.
    pub const fn ensure_in_range(&self, count: u64) -> Result<(), PaginationError> {
        if self.page > 1 && self.offset() >= count {
            return Err(PaginationError::PageOutOfRange { page: self.page });
        }
        Ok(())
    }

    const fn has_next(&self, count: u64) -> bool {
        self.offset().saturating_add(self.limit as u64) < count
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute link to the next page, if any.
    pub next: Option<String>,
    /// Absolute link to the previous page, if any.
    pub previous: Option<String>,
    /// Items on the current page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page envelope.
    ///
    /// `current` is the absolute URL of the request being answered; its query
    /// string is reused for the navigation links.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    /// use url::Url;
    ///
    /// let url = Url::parse("http://localhost/api/recipes/?tags=lunch&page=2&limit=2")
    ///     .expect("valid url");
    /// let request = PageRequest::new(Some(2), Some(2)).expect("valid request");
    /// let page = Page::new(vec!["c", "d"], 5, request, &url);
    ///
    /// assert_eq!(
    ///     page.next.as_deref(),
    ///     Some("http://localhost/api/recipes/?tags=lunch&page=3&limit=2")
    /// );
    /// assert_eq!(
    ///     page.previous.as_deref(),
    ///     Some("http://localhost/api/recipes/?tags=lunch&limit=2")
    /// );
    /// ```
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, request: PageRequest, current: &Url) -> Self {
        let next = request
            .has_next(count)
            .then(|| page_link(current, Some(request.page + 1), request.limit));
        let previous = (request.page > 1).then(|| {
            let target = request.page - 1;
            page_link(current, (target > 1).then_some(target), request.limit)
        });
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Rebuild `current` with `page`/`limit` replaced; `None` drops `page`.
fn page_link(current: &Url, page: Option<u64>, limit: u32) -> String {
    let preserved: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM && key != LIMIT_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = current.clone();
    link.set_query(None);
    {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &preserved {
            pairs.append_pair(key, value);
        }
        if let Some(page) = page {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
        pairs.append_pair(LIMIT_PARAM, &limit.to_string());
    }
    link.into()
}
