//! Local catalog view state: the fetched item list plus filter/sort
//! settings, recomputed in full on every read.

use curio_catalog::Item;

/// Sort order for the visible list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Category,
}

/// Client-side catalog state.
///
/// The item list is replaced wholesale on each fetch; filtering and
/// sorting are pure functions over the full list, with no incremental
/// indexing.
#[derive(Debug, Default)]
pub struct CatalogView {
    items: Vec<Item>,
    pub search: String,
    /// `None` = "All" (no category filter).
    pub category: Option<String>,
    pub sort: SortKey,
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list after a fetch.
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Prepend a freshly created item, keeping newest-first order.
    pub fn push_front(&mut self, item: Item) {
        self.items.insert(0, item);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// "All" plus the distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out = vec!["All".to_string()];
        for item in &self.items {
            if !out[1..].contains(&item.category) {
                out.push(item.category.clone());
            }
        }
        out
    }

    /// The filtered, sorted view of the list.
    pub fn visible(&self) -> Vec<&Item> {
        let needle = self.search.to_lowercase();

        let mut out: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| {
                let matches_search = needle.is_empty()
                    || item.name.to_lowercase().contains(&needle)
                    || item
                        .features
                        .iter()
                        .any(|f| f.to_lowercase().contains(&needle));
                let matches_category = self
                    .category
                    .as_deref()
                    .is_none_or(|c| item.category == c);
                matches_search && matches_category
            })
            .collect();

        match self.sort {
            SortKey::Name => out.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortKey::Price => out.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortKey::Category => {
                out.sort_by(|a, b| a.category.to_lowercase().cmp(&b.category.to_lowercase()))
            }
        }
        out
    }
}
