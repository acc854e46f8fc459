use shared::{domain::CategoryId, protocol::ProductDraft};

use crate::error::{CatalogError, Result};

/// Raw text of the "add product" inputs, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: String,
    pub image: String,
}

impl CreateForm {
    /// Checks every field is filled in and parses the numeric ones. The first missing or
    /// malformed field is reported.
    pub fn validate(&self) -> Result<ProductDraft> {
        let title = required("title", &self.title)?;
        let price = required("price", &self.price)?;
        let description = required("description", &self.description)?;
        let category_id = required("categoryId", &self.category_id)?;
        let image = required("image", &self.image)?;

        Ok(ProductDraft {
            title: title.to_string(),
            price: parse_price(price)?,
            description: description.to_string(),
            category_id: category_id
                .parse::<i64>()
                .map(CategoryId)
                .map_err(|_| CatalogError::Validation {
                    field: "categoryId",
                })?,
            images: vec![image.to_string()],
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation { field });
    }
    Ok(trimmed)
}

pub(crate) fn parse_price(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(CatalogError::Validation { field: "price" }),
    }
}
