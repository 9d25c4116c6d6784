use serde::{Deserialize, Serialize};

/// Indexing state reported by `GET /admin/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexStatus {
    pub in_progress: bool,
    pub last_update: Option<String>,
    pub documents_count: u64,
    pub apartments_count: u64,
    pub last_action: Option<String>,
}

/// Knowledge-base document as stored by the indexing service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub url: String,
    /// Category ("service", "faq", "partnership", ...)
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDocument {
    pub content: String,
    pub url: String,
    pub category: String,
}

impl Default for NewDocument {
    fn default() -> Self {
        Self {
            content: String::new(),
            url: String::new(),
            category: "service".to_string(),
        }
    }
}

/// Partial document edit, absent fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Inventory metadata of an indexed apartment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApartmentMetadata {
    pub city: String,
    pub rooms: u32,
    pub rent_cc_eur: f64,
    pub surface_m2: f64,
    pub furnished: bool,
    #[serde(default)]
    pub availability_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Apartment record as listed by `GET /admin/apartments`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryApartment {
    pub id: String,
    pub metadata: ApartmentMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewApartment {
    pub city: String,
    pub rooms: u32,
    pub rent_cc_eur: f64,
    pub surface_m2: f64,
    pub furnished: bool,
    pub availability_date: String,
    pub energy_label: String,
    pub postal_code: String,
}

impl Default for NewApartment {
    fn default() -> Self {
        Self {
            city: "Massy Palaiseau".to_string(),
            rooms: 1,
            rent_cc_eur: 450.0,
            surface_m2: 20.0,
            furnished: true,
            availability_date: String::new(),
            energy_label: "C".to_string(),
            postal_code: String::new(),
        }
    }
}

/// Body of `PUT /admin/apartments`: the id followed by the flattened metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApartmentUpdate {
    pub id: String,
    #[serde(flatten)]
    pub metadata: ApartmentMetadata,
}

impl From<InventoryApartment> for ApartmentUpdate {
    fn from(apartment: InventoryApartment) -> Self {
        Self {
            id: apartment.id,
            metadata: apartment.metadata,
        }
    }
}

/// Acknowledgement returned by every mutating admin endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_count: Option<u64>,
}
