//! Keyword search over stored pages
//!
//! Scoring and pagination are pure functions over [`Page`](crate::Page)
//! values and depend on no particular storage backend.

mod paginate;
mod score;

pub use paginate::{paginate, total_pages};
pub use score::{rank_pages, score};
