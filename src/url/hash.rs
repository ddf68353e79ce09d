use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// 64-bit hash of a URL string, used as the visited-set key
///
/// The verbatim string is hashed; two spellings of the same resource hash
/// differently. Collisions are possible and are treated as "already visited".
pub fn url_hash(url: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    hasher.finish()
}
