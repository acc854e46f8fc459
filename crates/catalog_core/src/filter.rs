use shared::protocol::Product;

/// Keeps the products whose title contains `term`, ignoring case. An empty term keeps
/// everything in its original order.
pub fn apply(products: &[Product], term: &str) -> Vec<Product> {
    if term.is_empty() {
        return products.to_vec();
    }

    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|product| matches(product, &needle))
        .cloned()
        .collect()
}

fn matches(product: &Product, lowered_term: &str) -> bool {
    product.title.to_lowercase().contains(lowered_term)
}
