use super::*;
use crate::{
    error::CatalogError,
    sorter::SortDirection,
    test_support::{ids, numbered, product, with_category},
};

#[derive(Default)]
struct RecordingRenderer {
    rows: Vec<i64>,
    controls: Option<PageControls>,
    sort: Option<SortState>,
    renders: usize,
}

impl CatalogRenderer for RecordingRenderer {
    fn render_rows(&mut self, rows: &[Product]) {
        self.rows = ids(rows);
        self.renders += 1;
    }

    fn render_pagination(&mut self, controls: &PageControls) {
        self.controls = Some(controls.clone());
    }

    fn render_sort(&mut self, active: Option<SortState>) {
        self.sort = active;
    }
}

fn controller(products: Vec<Product>) -> ViewController<RecordingRenderer> {
    let mut controller = ViewController::new(ProductStore::new(), RecordingRenderer::default());
    controller.load(products);
    controller
}

fn catalog_with_phones() -> Vec<Product> {
    vec![
        product(1, "Smartphone Pro", 999.0),
        product(2, "Desk", 150.0),
        product(3, "Chair", 80.0),
        product(4, "Lamp", 25.0),
        product(5, "Mug", 8.0),
        product(6, "Rugged phone case", 19.0),
        product(7, "Poster", 12.0),
    ]
}

#[test]
fn initial_load_shows_first_page() {
    let controller = controller(numbered(12));
    let renderer = controller.renderer();

    assert_eq!(renderer.rows, vec![1, 2, 3, 4, 5]);
    let controls = renderer.controls.as_ref().expect("controls rendered");
    assert!(controls.visible);
    assert_eq!(controller.total_pages(), 3);
}

#[test]
fn page_three_of_twelve_shows_last_two() {
    let mut controller = controller(numbered(12));

    assert!(controller.go_to_page(3));

    assert_eq!(controller.renderer().rows, vec![11, 12]);
    assert_eq!(controller.state().current_page, 3);
    let controls = controller.renderer().controls.as_ref().expect("controls");
    assert!(controls.next.disabled);
    assert!(!controls.previous.disabled);
}

#[test]
fn out_of_range_navigation_is_ignored() {
    let mut controller = controller(numbered(12));
    let renders = controller.renderer().renders;

    assert!(!controller.go_to_page(0));
    assert!(!controller.go_to_page(4));
    assert!(!controller.previous_page());
    assert_eq!(controller.renderer().renders, renders);

    assert!(controller.next_page());
    assert!(controller.next_page());
    assert!(!controller.next_page());
    assert_eq!(controller.state().current_page, 3);
}

#[test]
fn search_filters_resets_page_and_clears_sort() {
    let mut controller = controller(catalog_with_phones());
    controller.click_sort(SortColumn::Price);
    controller.go_to_page(2);

    controller.search("phone");

    assert_eq!(controller.state().current_page, 1);
    assert_eq!(controller.state().sort, None);
    assert_eq!(ids(controller.working_set()), vec![1, 6]);
    assert_eq!(controller.total_pages(), 1);
    let controls = controller.renderer().controls.as_ref().expect("controls");
    assert!(!controls.visible);
    assert_eq!(controller.renderer().sort, None);
}

#[test]
fn unmatched_search_renders_empty_rows() {
    let mut controller = controller(catalog_with_phones());

    controller.search("zzz");

    assert!(controller.renderer().rows.is_empty());
    assert_eq!(controller.total_pages(), 1);
    assert!(matches!(
        controller.export_csv(),
        Err(CatalogError::EmptyExport)
    ));
}

#[test]
fn sort_click_keeps_page_and_toggles_direction() {
    let mut controller = controller(numbered(12));
    controller.go_to_page(2);

    controller.click_sort(SortColumn::Id);
    assert_eq!(controller.state().current_page, 2);
    assert_eq!(controller.renderer().rows, vec![6, 7, 8, 9, 10]);

    controller.click_sort(SortColumn::Id);
    assert_eq!(
        controller.state().sort.map(|s| s.direction),
        Some(SortDirection::Descending)
    );
    assert_eq!(controller.state().current_page, 2);
    assert_eq!(controller.renderer().rows, vec![7, 6, 5, 4, 3]);

    controller.click_sort(SortColumn::Id);
    assert_eq!(
        controller.state().sort,
        Some(SortState::ascending(SortColumn::Id))
    );
    assert_eq!(controller.renderer().rows, vec![6, 7, 8, 9, 10]);
}

#[test]
fn sort_applies_to_filtered_rows_only() {
    let mut controller = controller(catalog_with_phones());
    controller.search("phone");

    controller.click_sort(SortColumn::Price);

    assert_eq!(ids(controller.working_set()), vec![6, 1]);
}

#[test]
fn reset_restores_defaults_and_full_set() {
    let mut controller = controller(catalog_with_phones());
    controller.search("a");
    controller.click_sort(SortColumn::Title);
    controller.go_to_page(2);

    controller.reset();

    assert_eq!(controller.state(), &ViewState::default());
    assert_eq!(ids(controller.working_set()), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(controller.renderer().rows, vec![1, 2, 3, 4, 5]);
}

#[test]
fn created_product_is_prepended_and_view_reset() {
    let mut controller = controller(catalog_with_phones());
    controller.search("phone");
    controller.click_sort(SortColumn::Price);

    controller.apply_created(product(100, "Brand new", 5.0));

    assert_eq!(controller.store().all()[0].id.0, 100);
    assert_eq!(controller.working_set()[0].id.0, 100);
    assert_eq!(controller.working_set().len(), 8);
    assert_eq!(controller.state(), &ViewState::default());
    assert_eq!(controller.renderer().rows, vec![100, 1, 2, 3, 4]);
}

#[test]
fn update_merges_in_place_without_touching_view_state() {
    let mut controller = controller(numbered(12));
    controller.click_sort(SortColumn::Price);
    controller.click_sort(SortColumn::Price);
    controller.go_to_page(2);
    let state_before = controller.state().clone();

    let renamed = with_category(product(5, "Renamed", 500.0), 1, "Misc");

    let outcome = controller.apply_updated(renamed);

    assert_eq!(
        outcome,
        MergeOutcome::Merged {
            in_working_set: true
        }
    );
    assert_eq!(controller.state(), &state_before);
    // Rows keep their position even though the sort key changed.
    assert_eq!(controller.renderer().rows, vec![7, 6, 5, 4, 3]);
    let merged = controller.find(ProductId(5)).expect("product 5");
    assert_eq!(merged.title, "Renamed");
    assert_eq!(merged.category_name(), Some("Misc"));
}

#[test]
fn partial_update_response_keeps_title_and_description() {
    let mut products = numbered(3);
    products[1].description = "Hand stitched".into();
    let mut controller = controller(products);

    let outcome = controller.apply_updated(ProductUpdate {
        id: ProductId(2),
        title: None,
        price: Some(75.0),
        description: None,
        category: None,
        images: None,
        slug: None,
        creation_at: None,
        updated_at: None,
    });

    assert_eq!(
        outcome,
        MergeOutcome::Merged {
            in_working_set: true
        }
    );
    for merged in [
        controller.find(ProductId(2)).expect("full set"),
        &controller.working_set()[1],
    ] {
        assert_eq!(merged.title, "Product 2");
        assert_eq!(merged.description, "Hand stitched");
        assert_eq!(merged.price, 75.0);
    }
}

#[test]
fn update_of_filtered_out_product_leaves_display_unchanged() {
    let mut controller = controller(catalog_with_phones());
    controller.search("phone");
    let rows_before = controller.renderer().rows.clone();
    let working_before = controller.working_set().to_vec();

    let outcome = controller.apply_updated(product(3, "Office chair", 95.0));

    assert_eq!(
        outcome,
        MergeOutcome::Merged {
            in_working_set: false
        }
    );
    assert_eq!(controller.find(ProductId(3)).map(|p| p.price), Some(95.0));
    assert_eq!(controller.working_set(), working_before.as_slice());
    assert_eq!(controller.renderer().rows, rows_before);
}

#[test]
fn update_for_unknown_product_is_ignored() {
    let mut controller = controller(numbered(3));
    let renders = controller.renderer().renders;

    assert_eq!(
        controller.apply_updated(product(42, "Ghost", 1.0)),
        MergeOutcome::Missing
    );
    assert_eq!(controller.renderer().renders, renders);
    assert_eq!(controller.store().len(), 3);
}

#[test]
fn export_covers_every_page_of_working_set() {
    let mut controller = controller(numbered(7));
    controller.click_sort(SortColumn::Id);
    controller.click_sort(SortColumn::Id);

    let csv = controller.export_csv().expect("csv");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 8);
    assert!(lines[1].starts_with("7,\"Product 7\",7,"));
    assert!(lines[7].starts_with("1,\"Product 1\",1,"));
}
