use std::ops::Range;

use phrasebook_types::PageItem;

use crate::error::{JumpError, PaginationError};

/// Above this many pages the display list is compressed with ellipses
const MAX_UNCOMPRESSED_PAGES: usize = 7;
/// Pages shown at the compressed edge (first or last block)
const EDGE_BLOCK: usize = 5;

/// One resolved page of a filtered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Index range into the filtered list
    pub range: Range<usize>,
    pub total_pages: usize,
    /// Page actually shown, after clamping
    pub current_page: usize,
    /// Set when the requested page was outside `1..=total_pages`
    pub adjusted: bool,
}

impl Page {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range.clone()]
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> Result<usize, PaginationError> {
    if page_size == 0 {
        return Err(PaginationError::ZeroPageSize);
    }
    Ok(total_items.div_ceil(page_size).max(1))
}

pub fn paginate(
    total_items: usize,
    page_size: usize,
    current_page: usize,
) -> Result<Page, PaginationError> {
    let total_pages = total_pages(total_items, page_size)?;
    let clamped = current_page.clamp(1, total_pages);
    if clamped != current_page {
        tracing::debug!(
            "Requested page {} clamped to {} of {}",
            current_page,
            clamped,
            total_pages
        );
    }

    let start = ((clamped - 1) * page_size).min(total_items);
    let end = (clamped * page_size).min(total_items);

    Ok(Page {
        range: start..end,
        total_pages,
        current_page: clamped,
        adjusted: clamped != current_page,
    })
}

/// Compressed list of page numbers for the navigation controls.
///
/// Up to seven pages are listed in full. Past that, the first and last page are
/// always present and the current page keeps one sibling on each side.
pub fn page_items(current_page: usize, total_pages: usize) -> Vec<PageItem> {
    if total_pages <= MAX_UNCOMPRESSED_PAGES {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let left = current.saturating_sub(1).max(1);
    let right = (current + 1).min(total_pages);

    let left_dots = left > 2;
    let right_dots = right < total_pages - 2;

    match (left_dots, right_dots) {
        (false, true) => {
            let mut items: Vec<PageItem> = (1..=EDGE_BLOCK).map(PageItem::Page).collect();
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page(total_pages));
            items
        }
        (true, false) => {
            let mut items = vec![PageItem::Page(1), PageItem::Ellipsis];
            items.extend((total_pages - EDGE_BLOCK + 1..=total_pages).map(PageItem::Page));
            items
        }
        (true, true) => vec![
            PageItem::Page(1),
            PageItem::Ellipsis,
            PageItem::Page(current - 1),
            PageItem::Page(current),
            PageItem::Page(current + 1),
            PageItem::Ellipsis,
            PageItem::Page(total_pages),
        ],
        // left <= 2 forces current <= 3 while right >= total - 2 forces
        // current >= total - 3 >= 5, so this arm needs total <= 7.
        (false, false) => {
            debug_assert!(false, "no ellipsis on either side with {total_pages} pages");
            (1..=total_pages).map(PageItem::Page).collect()
        }
    }
}

/// Parse the "go to page" input
pub fn parse_page_jump(input: &str, total_pages: usize) -> Result<usize, JumpError> {
    let page: usize = input.trim().parse().map_err(|_| JumpError::NotANumber {
        input: input.to_string(),
        total: total_pages,
    })?;

    if page < 1 || page > total_pages {
        return Err(JumpError::OutOfRange {
            page,
            total: total_pages,
        });
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phrasebook_types::PageItem::{Ellipsis, Page as P};

    #[test]
    fn total_pages_rounds_up_with_minimum_one() {
        assert_eq!(total_pages(0, 20), Ok(1));
        assert_eq!(total_pages(1, 20), Ok(1));
        assert_eq!(total_pages(20, 20), Ok(1));
        assert_eq!(total_pages(21, 20), Ok(2));
        assert_eq!(total_pages(45, 20), Ok(3));
        assert_eq!(total_pages(5, 0), Err(PaginationError::ZeroPageSize));
    }

    #[test]
    fn first_page_of_forty_five() {
        let page = paginate(45, 20, 1).unwrap();
        assert_eq!(page.range, 0..20);
        assert_eq!(page.total_pages, 3);
        assert!(!page.adjusted);
    }

    #[test]
    fn slice_lengths_are_full_except_last() {
        for total in [0usize, 1, 19, 20, 21, 45, 100, 101] {
            for size in [1usize, 3, 20] {
                let pages = total_pages(total, size).unwrap();
                for current in 1..=pages {
                    let page = paginate(total, size, current).unwrap();
                    let expected = if current < pages {
                        size
                    } else {
                        total - (pages - 1) * size
                    };
                    assert_eq!(page.range.len(), expected, "{total}/{size}/{current}");
                }
            }
        }
    }

    #[test]
    fn out_of_range_pages_are_clamped_and_reported() {
        let page = paginate(45, 20, 9).unwrap();
        assert_eq!(page.current_page, 3);
        assert_eq!(page.range, 40..45);
        assert!(page.adjusted);

        let page = paginate(45, 20, 0).unwrap();
        assert_eq!(page.current_page, 1);
        assert!(page.adjusted);
    }

    #[test]
    fn slice_uses_range() {
        let items: Vec<u32> = (0..45).collect();
        let page = paginate(items.len(), 20, 3).unwrap();
        assert_eq!(page.slice(&items), &[40, 41, 42, 43, 44]);
    }

    #[test]
    fn small_page_counts_are_listed_in_full() {
        assert_eq!(page_items(1, 1), vec![P(1)]);
        assert_eq!(page_items(4, 7), (1..=7).map(P).collect::<Vec<_>>());
    }

    #[test]
    fn middle_window() {
        assert_eq!(
            page_items(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
    }

    #[test]
    fn leading_block() {
        assert_eq!(
            page_items(1, 10),
            vec![P(1), P(2), P(3), P(4), P(5), Ellipsis, P(10)]
        );
        assert_eq!(page_items(3, 10), page_items(1, 10));
    }

    #[test]
    fn trailing_block() {
        assert_eq!(
            page_items(10, 10),
            vec![P(1), Ellipsis, P(6), P(7), P(8), P(9), P(10)]
        );
        assert_eq!(page_items(7, 10), page_items(10, 10));
    }

    #[test]
    fn compressed_lists_keep_edges_and_never_double_ellipsis() {
        for total in 8..=40 {
            for current in 1..=total {
                let items = page_items(current, total);
                assert_eq!(items.first(), Some(&P(1)), "{current}/{total}");
                assert_eq!(items.last(), Some(&P(total)), "{current}/{total}");
                assert!(items.contains(&P(current)), "{current}/{total}");
                assert!(
                    !items.windows(2).any(|w| w == [Ellipsis, Ellipsis]),
                    "{current}/{total}"
                );
            }
        }
    }

    #[test]
    fn jump_accepts_pages_in_range() {
        assert_eq!(parse_page_jump("2", 3), Ok(2));
        assert_eq!(parse_page_jump(" 3 ", 3), Ok(3));
    }

    #[test]
    fn jump_rejects_bad_input() {
        let err = parse_page_jump("abc", 3).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a page number between 1 and 3.");
        assert!(matches!(parse_page_jump("0", 3), Err(JumpError::OutOfRange { .. })));
        assert!(matches!(parse_page_jump("4", 3), Err(JumpError::OutOfRange { .. })));
        assert!(matches!(parse_page_jump("-1", 3), Err(JumpError::NotANumber { .. })));
    }
}
