//! Pagination widget model shared by the lead table templates.

use serde::Serialize;

/// Produces the page-number strip with `None` marking ellipsis gaps.
fn page_strip(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(total_pages + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(total_pages + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));

    pages
}

#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = page_strip(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_no_pages() {
        let paginated: Paginated<i32> = Paginated::new(vec![], 1, 0);
        assert!(paginated.pages.is_empty());
        assert_eq!(paginated.page, 1);
    }

    #[test]
    fn page_zero_is_clamped_to_one() {
        let paginated: Paginated<i32> = Paginated::new(vec![], 0, 5);
        assert_eq!(paginated.page, 1);
        assert_eq!(
            paginated.pages,
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn long_strip_has_ellipsis_gaps() {
        let paginated: Paginated<i32> = Paginated::new(vec![], 10, 30);
        let pages = paginated.pages;
        assert_eq!(pages.first(), Some(&Some(1)));
        assert_eq!(pages.last(), Some(&Some(30)));
        assert!(pages.iter().filter(|p| p.is_none()).count() >= 1);
        assert!(pages.contains(&Some(10)));
    }
}
