use shared::protocol::{Product, ProductPatch, ProductUpdate};

use crate::{
    error::{CatalogError, Result},
    form::parse_price,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    ReadOnly,
    Editing,
}

/// State of the per-row detail dialog: read-only until `edit`, then title, price and
/// description accept input until a save round-trip completes.
#[derive(Debug, Clone)]
pub struct DetailView {
    product: Product,
    mode: DetailMode,
    title: String,
    price: String,
    description: String,
}

impl DetailView {
    pub fn open(product: Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            product,
            mode: DetailMode::ReadOnly,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn mode(&self) -> DetailMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == DetailMode::Editing
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &str {
        self.product.display_image()
    }

    pub fn edit(&mut self) {
        self.mode = DetailMode::Editing;
    }

    /// Inputs are read-only outside edit mode; returns whether the value was taken.
    pub fn set_title(&mut self, value: impl Into<String>) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.title = value.into();
        true
    }

    pub fn set_price(&mut self, value: impl Into<String>) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.price = value.into();
        true
    }

    pub fn set_description(&mut self, value: impl Into<String>) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.description = value.into();
        true
    }

    /// Builds the update body. `None` when the view is not in edit mode.
    pub fn save(&self) -> Result<Option<ProductPatch>> {
        if !self.is_editing() {
            return Ok(None);
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err(CatalogError::Validation { field: "title" });
        }

        Ok(Some(ProductPatch {
            title: Some(title.to_string()),
            price: Some(parse_price(&self.price)?),
            description: Some(self.description.clone()),
            category_id: self.product.category.as_ref().map(|category| category.id),
            images: Some(self.product.images.clone()),
        }))
    }

    /// Folds the server's answer back in and leaves edit mode.
    pub fn saved(&mut self, updated: impl Into<ProductUpdate>) {
        self.product.merge(updated.into());
        *self = Self::open(self.product.clone());
    }
}
