use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use shared::{
    domain::{Product, ProductId},
    error::{CatalogError, Operation},
    protocol::ProductDraft,
};
use tracing::{debug, info, warn};
use url::Url;

pub mod debounce;
pub mod export;
mod session;

pub use debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use session::{CatalogSession, UpdateOutcome};

pub const DEFAULT_API_URL: &str = "https://api.escuelajs.co/api/v1/products";

/// One remote call per catalog operation.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError>;
    async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError>;
    /// `Ok(None)` when the server acknowledged the update without echoing a
    /// product; callers keep their current copy.
    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, CatalogError>;
    async fn delete(&self, id: ProductId) -> Result<(), CatalogError>;
}

pub struct HttpCatalogClient {
    http: Client,
    collection_url: String,
}

impl HttpCatalogClient {
    pub fn new(collection_url: &str) -> Result<Self, CatalogError> {
        let parsed = Url::parse(collection_url.trim()).map_err(|err| {
            CatalogError::InvalidConfig(format!("invalid api url '{collection_url}': {err}"))
        })?;
        Ok(Self {
            http: Client::new(),
            collection_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: ProductId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    /// Sends the request and returns the body of a 2xx response. Everything else
    /// becomes a `CatalogError` carrying status and body.
    async fn execute(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<String, CatalogError> {
        let response = request.send().await.map_err(|err| CatalogError::Network {
            operation,
            message: err.to_string(),
        })?;
        let status = response.status();
        let url = response.url().to_string();
        // An unreadable body is reported as an empty one.
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(%operation, %url, status = status.as_u16(), "catalog request rejected");
            return Err(CatalogError::from_status(
                operation,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                render_error_body(&body),
            ));
        }

        debug!(%operation, %url, status = status.as_u16(), bytes = body.len(), "catalog request ok");
        Ok(body)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        let body = self
            .execute(Operation::Fetch, self.http.get(&self.collection_url))
            .await?;
        let products: Vec<Product> = decode(Operation::Fetch, &body)?;
        info!(count = products.len(), "fetched catalog");
        Ok(products)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError> {
        debug!(?draft, "POST payload");
        let body = self
            .execute(
                Operation::Create,
                self.http.post(&self.collection_url).json(draft),
            )
            .await?;
        let created: Product = decode(Operation::Create, &body)?;
        info!(id = %created.id, "created product");
        Ok(created)
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, CatalogError> {
        debug!(%id, ?draft, "PUT payload");
        let body = self
            .execute(Operation::Update, self.http.put(self.item_url(id)).json(draft))
            .await?;
        if body.trim().is_empty() {
            warn!(%id, "update acknowledged without a body");
            return Ok(None);
        }

        let value: Value = decode(Operation::Update, &body)?;
        if value.get("id").is_none() {
            warn!(%id, "update response carries no product id");
            return Ok(None);
        }
        let updated: Product =
            serde_json::from_value(value).map_err(|err| CatalogError::Decode {
                operation: Operation::Update,
                message: err.to_string(),
            })?;
        info!(id = %updated.id, "updated product");
        Ok(Some(updated))
    }

    async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        debug!(%id, "DELETE");
        self.execute(Operation::Delete, self.http.delete(self.item_url(id)))
            .await?;
        info!(%id, "deleted product");
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    operation: Operation,
    body: &str,
) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|err| CatalogError::Decode {
        operation,
        message: err.to_string(),
    })
}

/// JSON error bodies are compacted, anything else is passed through as text.
fn render_error_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
