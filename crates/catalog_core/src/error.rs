use reqwest::StatusCode;
use shared::{
    domain::ProductId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{path} returned {status}")]
    Status { status: StatusCode, path: String },
    #[error("unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("please fill in `{field}`")]
    Validation { field: &'static str },
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("no rows to export")]
    EmptyExport,
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) | Self::Status { .. } | Self::Decode { .. } | Self::InvalidUrl(_) => {
                ErrorCode::Network
            }
            Self::Validation { .. } => ErrorCode::Validation,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::EmptyExport => ErrorCode::EmptyExport,
        }
    }

    pub fn into_api_error(self) -> ApiError {
        ApiError::new(self.code(), self.to_string())
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_onto_error_codes() {
        let status = CatalogError::Status {
            status: StatusCode::BAD_GATEWAY,
            path: "/products".into(),
        };
        assert_eq!(status.code(), ErrorCode::Network);
        assert_eq!(
            CatalogError::Validation { field: "title" }.code(),
            ErrorCode::Validation
        );
        assert_eq!(
            CatalogError::NotFound(ProductId(9)).code(),
            ErrorCode::NotFound
        );
        assert_eq!(CatalogError::EmptyExport.code(), ErrorCode::EmptyExport);
    }

    #[test]
    fn api_error_carries_display_message() {
        let api = CatalogError::NotFound(ProductId(42)).into_api_error();
        assert_eq!(api.code, ErrorCode::NotFound);
        assert_eq!(api.message, "product 42 not found");
    }
}
