use std::{fmt, str::FromStr};

use shared::error::CatalogError;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Price,
    Category,
}

impl FromStr for SortField {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "price" => Ok(SortField::Price),
            "category" => Ok(SortField::Category),
            other => Err(CatalogError::InvalidConfig(format!(
                "unknown sort field '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Price => "price",
            SortField::Category => "category",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Search, sort and pagination parameters for the table.
///
/// Fields are private so every change goes through a transition that keeps
/// `page_size` and `page_index` positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    sort: Option<SortState>,
    page_size: usize,
    page_index: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 1,
        }
    }
}

impl QueryState {
    pub fn with_page_size(page_size: usize) -> Result<Self, CatalogError> {
        let mut query = Self::default();
        query.set_page_size(page_size)?;
        Ok(query)
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page_index = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::InvalidConfig(
                "page size must be a positive integer".into(),
            ));
        }
        self.page_size = page_size;
        self.page_index = 1;
        Ok(())
    }

    /// Same field flips direction, a new field starts ascending. The page index
    /// is kept.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(current) if current.field == field => SortState {
                field,
                direction: current.direction.flipped(),
            },
            _ => SortState {
                field,
                direction: SortDirection::Ascending,
            },
        });
    }

    /// Stored as given; the next derivation clamps it to the last page.
    pub fn set_page(&mut self, page_index: usize) -> Result<(), CatalogError> {
        if page_index == 0 {
            return Err(CatalogError::InvalidConfig(
                "page index is 1-based".into(),
            ));
        }
        self.page_index = page_index;
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.page_index = self.page_index.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1).max(1);
    }

    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if self.page_size == 0 {
            return Err(CatalogError::InvalidConfig(
                "page size must be a positive integer".into(),
            ));
        }
        if self.page_index == 0 {
            return Err(CatalogError::InvalidConfig(
                "page index is 1-based".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn clamp_page(&mut self, page_index: usize) {
        self.page_index = page_index;
    }
}

pub fn parse_page_size(raw: &str) -> Result<usize, CatalogError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(CatalogError::InvalidConfig(format!(
            "page size must be a positive integer, got '{raw}'"
        ))),
        Ok(size) => Ok(size),
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
