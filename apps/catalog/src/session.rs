use std::path::{Path, PathBuf};

use anyhow::Context;
use catalog_core::{
    CatalogError, CreateForm, DetailView, MergeOutcome, ProductStore, RemoteClient,
    ViewController,
};
use shared::{domain::ProductId, protocol::Product};
use tracing::info;

use crate::render::TerminalRenderer;

/// Field edits typed into the detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailEdits {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

/// Binds the product API to one catalog view. All state changes happen here, one action at
/// a time, after the corresponding request has resolved.
pub struct Session<C> {
    client: C,
    view: ViewController<TerminalRenderer>,
    export_path: PathBuf,
}

impl<C: RemoteClient> Session<C> {
    pub fn new(client: C, export_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            view: ViewController::new(ProductStore::new(), TerminalRenderer::new()),
            export_path: export_path.into(),
        }
    }

    pub fn view(&self) -> &ViewController<TerminalRenderer> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController<TerminalRenderer> {
        &mut self.view
    }

    /// Text rendered since the last call.
    pub fn take_output(&mut self) -> String {
        self.view.renderer_mut().take_output()
    }

    pub async fn load(&mut self) -> Result<(), CatalogError> {
        let products = self.client.list().await?;
        self.view.load(products);
        Ok(())
    }

    pub fn detail(&self, id: ProductId) -> Result<DetailView, CatalogError> {
        self.view
            .find(id)
            .cloned()
            .map(DetailView::open)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Validates the form before anything is sent, then prepends the created record.
    pub async fn create(&mut self, form: &CreateForm) -> Result<Product, CatalogError> {
        let draft = form.validate()?;
        let created = self.client.create(&draft).await?;
        self.view.apply_created(created.clone());
        Ok(created)
    }

    /// Runs the detail view edit/save cycle for `id` and merges the response locally.
    pub async fn update(
        &mut self,
        id: ProductId,
        edits: &DetailEdits,
    ) -> Result<(DetailView, MergeOutcome), CatalogError> {
        let mut detail = self.detail(id)?;
        detail.edit();
        if let Some(title) = &edits.title {
            detail.set_title(title.as_str());
        }
        if let Some(price) = &edits.price {
            detail.set_price(price.as_str());
        }
        if let Some(description) = &edits.description {
            detail.set_description(description.as_str());
        }

        let patch = detail.save()?.unwrap_or_default();
        let updated = self.client.update(id, &patch).await?;
        let outcome = self.view.apply_updated(updated.clone());
        detail.saved(updated);
        Ok((detail, outcome))
    }

    /// Writes the working set as CSV to `path`, or to the configured export path.
    pub async fn export(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let csv = self.view.export_csv()?;
        let path = path.unwrap_or(&self.export_path).to_path_buf();
        tokio::fs::write(&path, csv)
            .await
            .with_context(|| format!("failed to write export to '{}'", path.display()))?;
        info!(
            path = %path.display(),
            rows = self.view.working_set().len(),
            "exported products"
        );
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
