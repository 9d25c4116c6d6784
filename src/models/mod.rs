pub mod admin;
pub mod message;

use serde::{Deserialize, Serialize};

pub use admin::{
    AdminAck, ApartmentMetadata, ApartmentUpdate, Document, DocumentUpdate, IndexStatus,
    InventoryApartment, NewApartment, NewDocument,
};
pub use message::{Attachment, ChatMessage, QuickReply, Sender};

/// Surface of a unit, either a single value or a range for typologies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Exact(f64),
    Range { min: f64, max: f64 },
}

/// Apartment card returned by the search endpoint.
///
/// The same shape is used for concrete units and for typology templates
/// (`is_typologie`). Values are never mutated client-side, only re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Apartment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typologie_id: Option<String>,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    /// 0 means shared housing
    pub rooms: u32,
    #[serde(default)]
    pub surface_m2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_max: Option<f64>,
    #[serde(default)]
    pub furnished: bool,
    /// Monthly rent, charges included
    pub rent_cc_eur: f64,
    #[serde(default)]
    pub availability_date: String,
    #[serde(default)]
    pub energy_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_ac: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_months: Option<f64>,
    #[serde(default)]
    pub is_typologie: bool,
    #[serde(default)]
    pub content: String,
}

impl Apartment {
    /// Surface as a value or a range. The API sends 0 for missing bounds.
    pub fn surface(&self) -> Surface {
        match (self.surface_min, self.surface_max) {
            (Some(min), Some(max)) if min > 0.0 && max > 0.0 && min < max => {
                Surface::Range { min, max }
            }
            _ => Surface::Exact(self.surface_m2),
        }
    }

    /// Commercial name of the unit type: "Colocation", "Studio" or "T{rooms}"
    pub fn display_name(&self) -> String {
        match self.rooms {
            0 => "Colocation".to_string(),
            1 if self.surface_m2 < 23.0 => "Studio".to_string(),
            n => format!("T{}", n),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_search_card_with_missing_optionals() {
        let apt: Apartment = serde_json::from_value(json!({
            "id": "apt_1",
            "city": "Villejuif",
            "rooms": 0,
            "rent_cc_eur": 520.0,
            "surface_m2": 14.5
        }))
        .unwrap();

        assert_eq!(apt.display_name(), "Colocation");
        assert_eq!(apt.floor, None);
        assert_eq!(apt.application_fee, None);
        assert!(!apt.is_typologie);
        assert_eq!(apt.surface(), Surface::Exact(14.5));
    }

    #[test]
    fn zero_bounds_mean_exact_surface() {
        let mut apt = fixtures::typology();
        apt.surface_min = Some(0.0);
        apt.surface_max = Some(0.0);
        assert_eq!(apt.surface(), Surface::Exact(42.0));

        apt.surface_min = Some(38.0);
        apt.surface_max = Some(45.0);
        assert_eq!(apt.surface(), Surface::Range { min: 38.0, max: 45.0 });
    }

    #[test]
    fn small_single_room_is_a_studio() {
        let mut apt = fixtures::typology();
        apt.rooms = 1;
        apt.surface_m2 = 19.0;
        assert_eq!(apt.display_name(), "Studio");

        apt.surface_m2 = 27.0;
        assert_eq!(apt.display_name(), "T1");
    }
}
