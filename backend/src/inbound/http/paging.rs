//! Query-string parsing and page envelopes for list endpoints.
//!
//! List endpoints read their parameters through [`QueryParams`] so repeated
//! keys (`tags=a&tags=b`) survive, then turn a domain [`Listing`] into the
//! `{count, next, previous, results}` envelope.

use actix_web::HttpRequest;
use pagination::{Page, PageRequest, PaginationError};
use url::form_urlencoded;

use crate::domain::Error;
use crate::domain::ports::Listing;

/// Decoded query string that keeps every occurrence of a key.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self::parse(req.query_string())
    }

    pub fn parse(query: &str) -> Self {
        Self(form_urlencoded::parse(query.as_bytes()).into_owned().collect())
    }

    /// Last value supplied for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value supplied for `key`, in request order.
    pub fn all(&self, key: &str) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Parse `page` and `limit`.
    ///
    /// A malformed page number is answered like a page past the end (404); a
    /// malformed limit is a validation error.
    pub fn page_request(&self) -> Result<PageRequest, Error> {
        let page = self
            .get("page")
            .map(|raw| raw.trim().parse::<u64>().map_err(|_| invalid_page()))
            .transpose()?;
        let limit = self
            .get("limit")
            .map(|raw| raw.trim().parse::<u32>().map_err(|_| invalid_limit()))
            .transpose()?;
        PageRequest::new(page, limit).map_err(map_pagination_error)
    }
}

fn invalid_page() -> Error {
    Error::not_found("invalid page")
}

fn invalid_limit() -> Error {
    Error::invalid_field(
        "limit",
        "invalid",
        format!("limit must be an integer between 1 and {}", pagination::MAX_LIMIT),
    )
}

fn map_pagination_error(error: PaginationError) -> Error {
    match error {
        PaginationError::InvalidPage | PaginationError::PageOutOfRange { .. } => invalid_page(),
        PaginationError::InvalidLimit { .. } => invalid_limit(),
    }
}

/// Wrap a listing in the page envelope, rejecting pages past the end.
pub fn into_page<T, U>(
    req: &HttpRequest,
    request: PageRequest,
    listing: Listing<T>,
    convert: impl FnMut(T) -> U,
) -> Result<Page<U>, Error> {
    request
        .ensure_in_range(listing.total)
        .map_err(map_pagination_error)?;
    let current = req.full_url();
    Ok(Page::new(listing.items, listing.total, request, &current).map(convert))
}
