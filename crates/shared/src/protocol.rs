use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{CategoryId, ProductId, MISSING_CATEGORY_LABEL, PLACEHOLDER_IMAGE_URL};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product record as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "deserialize_images")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn display_image(&self) -> &str {
        self.primary_image().unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.name.as_str())
    }

    pub fn category_label(&self) -> &str {
        self.category_name().unwrap_or(MISSING_CATEGORY_LABEL)
    }

    /// Applies an update response on top of this record. Only the keys the response
    /// carries are overwritten.
    pub fn merge(&mut self, update: ProductUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(slug) = update.slug {
            self.slug = Some(slug);
        }
        if let Some(creation_at) = update.creation_at {
            self.creation_at = Some(creation_at);
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = Some(updated_at);
        }
    }
}

/// Response of `PUT /products/{id}`. Every field except `id` may be missing; a missing
/// key leaves the local value alone, while `"category": null` or `"images": []` clear it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub category: Option<Option<Category>>,
    #[serde(default, deserialize_with = "deserialize_present_images")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub creation_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductUpdate {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: Some(product.title),
            price: Some(product.price),
            description: Some(product.description),
            category: Some(product.category),
            images: Some(product.images),
            slug: product.slug,
            creation_at: product.creation_at,
            updated_at: product.updated_at,
        }
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub images: Vec<String>,
}

/// Body of `PUT /products/{id}`. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.images.is_none()
    }
}

// The public API is known to hand back nested arrays and JSON-stringified arrays
// in `images`, e.g. `["[\"https://a.jpg\"", "\"https://b.jpg\"]"]`.
fn deserialize_images<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut images = Vec::with_capacity(raw.len());
    for value in &raw {
        collect_image_urls(value, &mut images);
    }
    Ok(images)
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn deserialize_present_images<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_images(deserializer).map(Some)
}

fn collect_image_urls(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') {
                if let Ok(inner) = serde_json::from_str::<Vec<Value>>(trimmed) {
                    for item in &inner {
                        collect_image_urls(item, out);
                    }
                    return;
                }
            }
            let cleaned = clean_image_url(trimmed);
            if !cleaned.is_empty() {
                out.push(cleaned.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_image_urls(item, out);
            }
        }
        _ => {}
    }
}

fn clean_image_url(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == '[' || c == ']' || c == '"' || c.is_whitespace())
}
