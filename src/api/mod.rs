//! JSON shapes exchanged over HTTP.
//!
//! Keys mirror the ones the front-end already consumes, which is why
//! casing differs between resources.

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod booking;
pub mod branch;
pub mod dashboard;
pub mod event;
pub mod membership;
pub mod mood;
pub mod movie;
pub mod product;
pub mod receipt;
pub mod voucher;

pub use self::{auth::Role, movie::Movie};

/// Body of every error response.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Detail {
    pub detail: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of a paginated listing.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// `page`/`limit` query parameters; both start at 1.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Paging {
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn first_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Paging {
    /// Rows to skip, or `None` if either parameter is below 1.
    pub fn offset(&self) -> Option<i64> {
        if self.page < 1 || self.limit < 1 {
            return None;
        }
        (self.page - 1).checked_mul(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_starts_at_first_page() {
        let paging = Paging { page: 1, limit: 10 };
        assert_eq!(paging.offset(), Some(0));
        let paging = Paging { page: 3, limit: 25 };
        assert_eq!(paging.offset(), Some(50));
    }

    #[test]
    fn non_positive_paging_has_no_offset() {
        assert_eq!(Paging { page: 0, limit: 10 }.offset(), None);
        assert_eq!(Paging { page: 1, limit: 0 }.offset(), None);
        assert_eq!(Paging { page: -2, limit: -1 }.offset(), None);
    }
}
