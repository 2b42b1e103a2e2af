//! Turns the full dataset plus the current query into the rows of one table page.

use std::cmp::Ordering;

use shared::{domain::Product, error::CatalogError};
use tracing::debug;

mod query;

pub use query::{
    parse_page_size, QueryState, SortDirection, SortField, SortState, DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Product>,
    /// 1-based position of the first visible row.
    pub range_start: usize,
    pub range_end: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub page_index: usize,
}

impl PageView<'_> {
    /// `"X-Y of Z"`, or `"0-0 of 0"` when nothing matched.
    pub fn summary(&self) -> String {
        if self.total_count == 0 {
            return "0-0 of 0".to_string();
        }
        format!(
            "{}-{} of {}",
            self.range_start, self.range_end, self.total_count
        )
    }

    /// Page numbers for pagination controls, flagged when current.
    pub fn pages(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        (1..=self.total_pages).map(move |page| (page, page == self.page_index))
    }

    pub fn is_last_page(&self) -> bool {
        self.page_index == self.total_pages
    }
}

pub fn derive_view<'a>(
    dataset: &'a [Product],
    query: &QueryState,
) -> Result<PageView<'a>, CatalogError> {
    query.validate()?;

    let needle = query.search_text().trim().to_lowercase();
    let mut rows: Vec<&Product> = dataset
        .iter()
        .filter(|product| needle.is_empty() || product.title.to_lowercase().contains(&needle))
        .collect();

    if let Some(sort) = query.sort() {
        // sort_by is stable, so equal keys keep dataset order in both directions.
        rows.sort_by(|a, b| {
            let ordering = compare_field(a, b, sort.field);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    let page_size = query.page_size();
    let total_count = rows.len();
    let total_pages = total_count.div_ceil(page_size).max(1);
    let page_index = query.page_index().min(total_pages);
    if page_index != query.page_index() {
        debug!(
            requested = query.page_index(),
            clamped = page_index,
            "page index past the last page"
        );
    }

    let start = (page_index - 1) * page_size;
    let end = total_count.min(start + page_size);
    let rows: Vec<&Product> = rows.drain(start..end).collect();

    Ok(PageView {
        rows,
        range_start: start + 1,
        range_end: end,
        total_count,
        total_pages,
        page_index,
    })
}

impl QueryState {
    /// Writes the page index a derivation settled on back into the query.
    pub fn clamp_to(&mut self, view: &PageView<'_>) {
        self.clamp_page(view.page_index);
    }
}

fn compare_field(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        SortField::Category => a.category_label().cmp(&b.category_label()),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
