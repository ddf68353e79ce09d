//! URL handling module for Kumo
//!
//! URLs are opaque absolute strings once they enter the frontier. This module
//! provides the three operations the crawler needs on them: resolving a
//! discovered `href` against its page, deriving the origin whose robots.txt
//! governs a URL, and hashing a URL for the visited set.

mod domain;
mod hash;
mod resolve;

pub use domain::robots_origin;
pub use hash::url_hash;
pub use resolve::resolve_href;
