use crate::models::{Document, InventoryApartment};

/// Documents whose content or category contains `query`, ignoring case.
/// An empty query keeps everything.
pub fn filter_documents<'a>(documents: &'a [Document], query: &str) -> Vec<&'a Document> {
    let query = query.trim().to_lowercase();
    documents
        .iter()
        .filter(|doc| {
            query.is_empty()
                || doc.content.to_lowercase().contains(&query)
                || doc.kind.to_lowercase().contains(&query)
        })
        .collect()
}

/// Inventory filters of the admin list; unset criteria match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApartmentFilter {
    pub city: Option<String>,
    pub rooms: Option<u32>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
}

impl ApartmentFilter {
    pub fn matches(&self, apartment: &InventoryApartment) -> bool {
        let meta = &apartment.metadata;

        if let Some(city) = self.city.as_deref().filter(|c| !c.trim().is_empty()) {
            if !meta.city.to_lowercase().contains(&city.trim().to_lowercase()) {
                return false;
            }
        }
        if self.rooms.is_some_and(|rooms| meta.rooms != rooms) {
            return false;
        }
        if self.min_rent.is_some_and(|min| meta.rent_cc_eur < min) {
            return false;
        }
        if self.max_rent.is_some_and(|max| meta.rent_cc_eur > max) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, apartments: &'a [InventoryApartment]) -> Vec<&'a InventoryApartment> {
        apartments.iter().filter(|apt| self.matches(apt)).collect()
    }
}
