use shared::{
    domain::ProductId,
    protocol::{Product, ProductUpdate},
};
use tracing::{debug, warn};

use crate::{
    error::Result,
    export, filter,
    paginator::{self, Page, PageControls, PAGE_SIZE},
    sorter::{self, SortColumn, SortState},
    store::{MergeOutcome, ProductStore},
};

/// Render targets driven by [`ViewController`]. Implemented by whatever adapter owns the
/// screen; the controller never formats anything itself.
pub trait CatalogRenderer {
    /// Called first on every render with the active sort, for header indicators.
    fn render_sort(&mut self, _active: Option<SortState>) {}

    /// Rows of the current page. An empty slice means "no results".
    fn render_rows(&mut self, rows: &[Product]);

    fn render_pagination(&mut self, controls: &PageControls);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort: Option<SortState>,
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort: None,
            current_page: 1,
        }
    }
}

pub struct ViewController<R> {
    store: ProductStore,
    state: ViewState,
    page_size: usize,
    renderer: R,
}

impl<R: CatalogRenderer> ViewController<R> {
    pub fn new(store: ProductStore, renderer: R) -> Self {
        Self {
            store,
            state: ViewState::default(),
            page_size: PAGE_SIZE,
            renderer,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// The filtered and sorted rows before pagination.
    pub fn working_set(&self) -> &[Product] {
        self.store.working()
    }

    pub fn page(&self) -> Page<'_> {
        paginator::apply(self.store.working(), self.state.current_page, self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        paginator::total_pages(self.store.working().len(), self.page_size)
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.store.get(id)
    }

    /// Replaces the record set after a successful list fetch and shows it from the top.
    pub fn load(&mut self, products: Vec<Product>) {
        self.store.load(products);
        self.state = ViewState::default();
        self.refresh();
    }

    /// Re-derives the working set from the full set and the current view state, then renders.
    pub fn refresh(&mut self) {
        let mut working = filter::apply(self.store.all(), &self.state.search_term);
        if let Some(sort) = self.state.sort {
            sorter::sort_in_place(&mut working, sort.column, sort.direction);
        }
        self.store.set_working(working);
        self.render();
    }

    /// Paginates the current working set and pushes it to the renderer.
    pub fn render(&mut self) {
        let total_pages = self.total_pages();
        self.state.current_page = paginator::clamp_page(self.state.current_page, total_pages);
        let page = paginator::apply(self.store.working(), self.state.current_page, self.page_size);
        let controls = PageControls::new(page.current_page, page.total_pages);

        debug!(
            page = page.current_page,
            total_pages = page.total_pages,
            rows = page.items.len(),
            working = self.store.working().len(),
            "render catalog view"
        );

        self.renderer.render_sort(self.state.sort);
        self.renderer.render_rows(page.items);
        self.renderer.render_pagination(&controls);
    }

    /// Live search input. Goes back to page 1 and drops any sort.
    pub fn search(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.state.current_page = 1;
        self.state.sort = None;
        self.refresh();
    }

    /// Sort header click. Sorts the working set in place and keeps the current page.
    pub fn click_sort(&mut self, column: SortColumn) {
        let sort = SortState::after_click(self.state.sort, column);
        self.state.sort = Some(sort);
        sorter::sort_in_place(self.store.working_mut(), sort.column, sort.direction);
        self.render();
    }

    /// Returns false when `page` is outside the valid range; the view is left untouched.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.state.current_page = page;
        self.render();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.state.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.state.current_page.checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Clears search, sort and page and shows the full set again.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
        self.refresh();
    }

    pub fn apply_created(&mut self, product: Product) {
        debug!(id = %product.id, "prepend created product");
        self.store.insert_front(product);
        self.state = ViewState::default();
        self.refresh();
    }

    /// Merges an update response in place, keeping search, sort and page as they are.
    pub fn apply_updated(&mut self, update: impl Into<ProductUpdate>) -> MergeOutcome {
        let update: ProductUpdate = update.into();
        let id = update.id;
        let outcome = self.store.merge(update);
        match outcome {
            MergeOutcome::Merged { in_working_set } => {
                debug!(%id, in_working_set, "merged updated product");
                self.render();
            }
            MergeOutcome::Missing => {
                warn!(%id, "updated product is not loaded locally; skipping merge");
            }
        }
        outcome
    }

    /// CSV of the working set (all pages).
    pub fn export_csv(&self) -> Result<String> {
        export::to_csv(self.store.working())
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
