use shared::{
    domain::ProductId,
    protocol::{Product, ProductUpdate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The record was found in the full set; `in_working_set` tells whether the
    /// currently visible working set held it too.
    Merged { in_working_set: bool },
    /// No record with that id is loaded. Nothing changed.
    Missing,
}

/// Owns the fetched records: the full set in fetch/insertion order and the current
/// working set (filtered, then sorted) derived from it.
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    all: Vec<Product>,
    working: Vec<Product>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let mut store = Self::new();
        store.load(products);
        store
    }

    /// Replaces everything with a freshly fetched list.
    pub fn load(&mut self, products: Vec<Product>) {
        self.working = products.clone();
        self.all = products;
    }

    pub fn all(&self) -> &[Product] {
        &self.all
    }

    pub fn working(&self) -> &[Product] {
        &self.working
    }

    pub(crate) fn working_mut(&mut self) -> &mut [Product] {
        &mut self.working
    }

    pub(crate) fn set_working(&mut self, working: Vec<Product>) {
        self.working = working;
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.all.iter().find(|product| product.id == id)
    }

    /// Puts a newly created record at the front of both sets.
    pub fn insert_front(&mut self, product: Product) {
        self.working.insert(0, product.clone());
        self.all.insert(0, product);
    }

    /// Merges an update response into the matching record of both sets, matched by id.
    pub fn merge(&mut self, updated: impl Into<ProductUpdate>) -> MergeOutcome {
        let updated: ProductUpdate = updated.into();
        let Some(index) = self.all.iter().position(|p| p.id == updated.id) else {
            return MergeOutcome::Missing;
        };

        let working_index = self.working.iter().position(|p| p.id == updated.id);
        if let Some(working_index) = working_index {
            self.working[working_index].merge(updated.clone());
        }
        self.all[index].merge(updated);

        MergeOutcome::Merged {
            in_working_set: working_index.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ids, numbered, product};

    #[test]
    fn load_copies_full_set_into_working_set() {
        let store = ProductStore::with_products(numbered(3));
        assert_eq!(ids(store.all()), vec![1, 2, 3]);
        assert_eq!(ids(store.working()), vec![1, 2, 3]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn insert_front_prepends_to_both_sets() {
        let mut store = ProductStore::with_products(numbered(2));
        store.insert_front(product(50, "new", 1.0));

        assert_eq!(ids(store.all()), vec![50, 1, 2]);
        assert_eq!(ids(store.working()), vec![50, 1, 2]);
    }

    #[test]
    fn merge_updates_both_sets_by_id() {
        let mut store = ProductStore::with_products(numbered(3));

        let outcome = store.merge(product(2, "renamed", 42.0));

        assert_eq!(
            outcome,
            MergeOutcome::Merged {
                in_working_set: true
            }
        );
        assert_eq!(store.get(ProductId(2)).map(|p| p.title.as_str()), Some("renamed"));
        assert_eq!(store.working()[1].price, 42.0);
    }

    #[test]
    fn merge_of_unknown_id_changes_nothing() {
        let mut store = ProductStore::with_products(numbered(3));
        let before = store.all().to_vec();

        assert_eq!(store.merge(product(99, "ghost", 1.0)), MergeOutcome::Missing);
        assert_eq!(store.all(), before.as_slice());
    }
}
