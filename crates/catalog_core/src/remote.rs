use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::ProductId,
    protocol::{Product, ProductDraft, ProductPatch, ProductUpdate},
};
use tracing::info;
use url::Url;

use crate::error::{CatalogError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.escuelajs.co/api/v1";

/// The product API. Every call is issued once; failures are returned to the caller as-is.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>>;
    async fn create(&self, draft: &ProductDraft) -> Result<Product>;
    async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<ProductUpdate>;
}

#[derive(Debug, Clone)]
pub struct HttpProductClient {
    http: Client,
    base_url: Url,
}

impl HttpProductClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn products_url(&self) -> Result<Url> {
        Ok(self.base_url.join("products")?)
    }

    fn product_url(&self, id: ProductId) -> Result<Url> {
        Ok(self.base_url.join(&format!("products/{id}"))?)
    }
}

/// Parses `raw` and makes sure its path ends with `/` so relative joins append to it.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let path = response.url().path().to_string();
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status { status, path });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| CatalogError::Decode { path, source })
}

#[async_trait]
impl RemoteClient for HttpProductClient {
    async fn list(&self) -> Result<Vec<Product>> {
        let response = self.http.get(self.products_url()?).send().await?;
        let products: Vec<Product> = read_json(response).await?;
        info!(count = products.len(), "fetched products");
        Ok(products)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        let response = self
            .http
            .post(self.products_url()?)
            .json(draft)
            .send()
            .await?;
        let product: Product = read_json(response).await?;
        info!(id = %product.id, title = %product.title, "created product");
        Ok(product)
    }

    async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<ProductUpdate> {
        let response = self
            .http
            .put(self.product_url(id)?)
            .json(patch)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        let updated: ProductUpdate = read_json(response).await?;
        info!(%id, "updated product");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
