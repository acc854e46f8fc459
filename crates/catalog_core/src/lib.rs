//! Product catalog view core: the filter → sort → paginate pipeline, the view controller
//! that drives it, and the HTTP client for the product API.

pub mod controller;
pub mod detail;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod paginator;
pub mod remote;
pub mod sorter;
pub mod store;

pub use controller::{CatalogRenderer, ViewController, ViewState};
pub use detail::{DetailMode, DetailView};
pub use error::CatalogError;
pub use form::CreateForm;
pub use paginator::{Page, PageControls, PAGE_SIZE};
pub use remote::{HttpProductClient, RemoteClient};
pub use sorter::{SortColumn, SortDirection, SortState};
pub use store::{MergeOutcome, ProductStore};
