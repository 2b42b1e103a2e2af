use shared::{
    domain::{Product, ProductId},
    error::CatalogError,
    protocol::ProductDraft,
};
use tracing::{debug, info};
use view::{derive_view, PageView, QueryState, SortField};

use crate::CatalogApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Replaced(ProductId),
    /// The server echoed a product this session does not hold.
    NotInDataset(ProductId),
    /// The server returned nothing usable; the dataset is unchanged.
    NoBody,
}

/// The dataset and query of one table session.
///
/// The dataset only changes after the server confirmed a mutation.
pub struct CatalogSession<A> {
    api: A,
    dataset: Vec<Product>,
    query: QueryState,
}

impl<A: CatalogApi> CatalogSession<A> {
    pub fn new(api: A, query: QueryState) -> Self {
        Self {
            api,
            dataset: Vec::new(),
            query,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dataset(&self) -> &[Product] {
        &self.dataset
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub async fn load(&mut self) -> Result<usize, CatalogError> {
        self.dataset = self.api.fetch_all().await?;
        info!(count = self.dataset.len(), "dataset loaded");
        Ok(self.dataset.len())
    }

    /// Derives the current page and stores the clamped page index.
    pub fn view(&mut self) -> Result<PageView<'_>, CatalogError> {
        let view = derive_view(&self.dataset, &self.query)?;
        self.query.clamp_to(&view);
        Ok(view)
    }

    pub fn search(&mut self, text: impl Into<String>) {
        self.query.set_search(text);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), CatalogError> {
        self.query.set_page_size(page_size)
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.query.toggle_sort(field);
    }

    pub fn goto_page(&mut self, page_index: usize) -> Result<(), CatalogError> {
        self.query.set_page(page_index)
    }

    pub fn next_page(&mut self) {
        self.query.next_page();
    }

    pub fn previous_page(&mut self) {
        self.query.previous_page();
    }

    pub async fn create(&mut self, draft: &ProductDraft) -> Result<&Product, CatalogError> {
        let created = self.api.create(draft).await?;
        self.dataset.insert(0, created);
        Ok(&self.dataset[0])
    }

    /// Replaces the held product with the server's full copy, never a merge.
    pub async fn update(
        &mut self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<UpdateOutcome, CatalogError> {
        let Some(updated) = self.api.update(id, draft).await? else {
            return Ok(UpdateOutcome::NoBody);
        };

        let updated_id = updated.id;
        match self
            .dataset
            .iter_mut()
            .find(|product| product.id == updated_id)
        {
            Some(slot) => {
                *slot = updated;
                Ok(UpdateOutcome::Replaced(updated_id))
            }
            None => {
                debug!(id = %updated_id, "updated product not held locally");
                Ok(UpdateOutcome::NotInDataset(updated_id))
            }
        }
    }

    /// Returns how many local entries were dropped.
    pub async fn delete(&mut self, id: ProductId) -> Result<usize, CatalogError> {
        self.api.delete(id).await?;
        let before = self.dataset.len();
        self.dataset.retain(|product| product.id != id);
        Ok(before - self.dataset.len())
    }

    /// Delete by an id typed as text, matching numeric ids loosely.
    pub async fn delete_raw(&mut self, raw_id: &str) -> Result<usize, CatalogError> {
        let id: ProductId = raw_id.parse().map_err(|_| {
            CatalogError::InvalidConfig(format!("invalid product id '{raw_id}'"))
        })?;
        self.api.delete(id).await?;
        let before = self.dataset.len();
        self.dataset.retain(|product| !product.id.matches_raw(raw_id));
        Ok(before - self.dataset.len())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
