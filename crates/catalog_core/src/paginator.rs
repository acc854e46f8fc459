use shared::protocol::Product;

/// Rows per page.
pub const PAGE_SIZE: usize = 5;

/// Page numbers shown at most in the page window.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [Product],
    pub total_pages: usize,
    pub current_page: usize,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices one page out of the working set. Out-of-range pages are clamped.
pub fn apply(products: &[Product], page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(products.len(), page_size);
    let current_page = clamp_page(page, total_pages);
    let start = ((current_page - 1) * page_size).min(products.len());
    let end = (start + page_size).min(products.len());

    Page {
        items: &products[start..end],
        total_pages,
        current_page,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub page: usize,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber {
    pub page: usize,
    pub active: bool,
}

/// Previous / numbered / Next controls for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub visible: bool,
    pub previous: PageLink,
    pub pages: Vec<PageNumber>,
    pub next: PageLink,
}

impl PageControls {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        let total_pages = total_pages.max(1);
        let current_page = clamp_page(current_page, total_pages);
        let (start, end) = window(current_page, total_pages);

        Self {
            visible: total_pages > 1,
            previous: PageLink {
                page: current_page.saturating_sub(1).max(1),
                disabled: current_page == 1,
            },
            pages: (start..=end)
                .map(|page| PageNumber {
                    page,
                    active: page == current_page,
                })
                .collect(),
            next: PageLink {
                page: (current_page + 1).min(total_pages),
                disabled: current_page == total_pages,
            },
        }
    }
}

fn window(current_page: usize, total_pages: usize) -> (usize, usize) {
    let span = PAGE_WINDOW - 1;
    let mut start = current_page.saturating_sub(2).max(1);
    let end = (start + span).min(total_pages);
    if end - start < span {
        start = end.saturating_sub(span).max(1);
    }
    (start, end)
}
