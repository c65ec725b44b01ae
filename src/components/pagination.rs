use crate::utils::escape_attr;

/// Number of page links shown before the list collapses with ellipses
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One entry of the page navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Number(usize),
    Ellipsis,
}

/// A window over a list of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current: usize,
    pub total_pages: usize,
}

/// Slice out page `page` (1-based, clamped into range) of `items`
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let current = page.clamp(1, total_pages);
    let start = ((current - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    Page {
        items: &items[start..end],
        current,
        total_pages,
    }
}

/// Page numbers around `current`, with the first and last page always reachable
pub fn page_numbers(current: usize, total_pages: usize) -> Vec<PageItem> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageItem::Number).collect();
    }

    let start = current.saturating_sub(2).max(1);
    let end = (current + 2).min(total_pages);
    let mut pages = Vec::new();

    if start > 1 {
        pages.push(PageItem::Number(1));
        if start > 2 {
            pages.push(PageItem::Ellipsis);
        }
    }
    pages.extend((start..=end).map(PageItem::Number));
    if end < total_pages {
        if end < total_pages - 1 {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Number(total_pages));
    }
    pages
}

/// Page navigation HTML linking to `{base_url}?page=N`; empty for a single page
pub fn render_pagination(current: usize, total_pages: usize, base_url: &str) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    let href = |page: usize| escape_attr(&format!("{}?page={}", base_url, page));

    let mut html = String::from("<nav class=\"pagination\">");
    if current > 1 {
        html.push_str(&format!("<a class=\"page-prev\" href=\"{}\">&larr; Prev</a>", href(current - 1)));
    }
    for item in page_numbers(current, total_pages) {
        match item {
            PageItem::Number(n) if n == current => {
                html.push_str(&format!("<span class=\"page-current\">{}</span>", n));
            }
            PageItem::Number(n) => {
                html.push_str(&format!("<a class=\"page-link\" href=\"{}\">{}</a>", href(n), n));
            }
            PageItem::Ellipsis => html.push_str("<span class=\"page-gap\">&hellip;</span>"),
        }
    }
    if current < total_pages {
        html.push_str(&format!("<a class=\"page-next\" href=\"{}\">Next &rarr;</a>", href(current + 1)));
    }
    html.push_str("</nav>");
    html
}
