/// Slices one page out of an ordered result list
///
/// Pages are 1-based; a page below 1 is treated as the first page. The slice
/// `(page - 1) * limit .. page * limit` is clamped to the list, so a page past
/// the end is empty.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Vec<T> {
    let start = page.max(1).saturating_sub(1).saturating_mul(limit);
    items.into_iter().skip(start).take(limit).collect()
}

/// Number of pages needed to show `total` results at `limit` per page
pub fn total_pages(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}
