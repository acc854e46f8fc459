use std::fmt::Write as _;

use catalog_core::{
    sorter::{indicator, SortColumn},
    CatalogRenderer, DetailView, PageControls, SortState,
};
use shared::protocol::Product;

const TITLE_WIDTH: usize = 32;
const CATEGORY_WIDTH: usize = 16;

/// Renders the catalog as plain text into an internal buffer; the caller decides where the
/// text goes.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    sort: Option<SortState>,
    buffer: String,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    fn header(&self) -> String {
        let label = |column: SortColumn, name: &str| {
            format!("{name} {}", indicator(self.sort, column))
        };
        format!(
            "{:>6}  {:<title$}  {:>10}  {:<category$}  {}",
            label(SortColumn::Id, "ID"),
            label(SortColumn::Title, "Title"),
            label(SortColumn::Price, "Price"),
            label(SortColumn::Category, "Category"),
            label(SortColumn::Image, "Image"),
            title = TITLE_WIDTH,
            category = CATEGORY_WIDTH,
        )
    }
}

impl CatalogRenderer for TerminalRenderer {
    fn render_sort(&mut self, active: Option<SortState>) {
        self.sort = active;
    }

    fn render_rows(&mut self, rows: &[Product]) {
        let header = self.header();
        let _ = writeln!(self.buffer, "{header}");
        if rows.is_empty() {
            let _ = writeln!(self.buffer, "  No products found");
            return;
        }
        for product in rows {
            let _ = writeln!(
                self.buffer,
                "{:>6}  {:<title$}  {:>10}  {:<category$}  {}",
                product.id.0,
                truncate(&product.title, TITLE_WIDTH),
                format!("${}", product.price),
                truncate(product.category_label(), CATEGORY_WIDTH),
                product.display_image(),
                title = TITLE_WIDTH,
                category = CATEGORY_WIDTH,
            );
        }
    }

    fn render_pagination(&mut self, controls: &PageControls) {
        if !controls.visible {
            return;
        }

        let mut parts = Vec::with_capacity(controls.pages.len() + 2);
        parts.push(link("Previous", controls.previous.disabled));
        for page in &controls.pages {
            parts.push(if page.active {
                format!("[{}]", page.page)
            } else {
                page.page.to_string()
            });
        }
        parts.push(link("Next", controls.next.disabled));
        let _ = writeln!(self.buffer, "  {}", parts.join(" "));
    }
}

fn link(label: &str, disabled: bool) -> String {
    if disabled {
        format!("({label})")
    } else {
        label.to_string()
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn render_detail(view: &DetailView) -> String {
    let product = view.product();
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", product.id, view.title());
    let _ = writeln!(out, "  price:       ${}", view.price());
    let _ = writeln!(out, "  category:    {}", product.category_label());
    let _ = writeln!(out, "  image:       {}", view.image());
    let _ = writeln!(out, "  description: {}", view.description());
    let _ = writeln!(
        out,
        "  mode:        {}",
        if view.is_editing() { "editing" } else { "read-only" }
    );
    out
}
