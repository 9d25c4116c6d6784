use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Preferred floor band. A placement preference only, the floor price comes
/// from the unit's actual floor number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FloorTier {
    #[default]
    Any,
    Low,
    Medium,
    High,
}

impl FloorTier {
    pub fn label(&self) -> &'static str {
        match self {
            FloorTier::Any => "Peu importe",
            FloorTier::Low => "Étage bas (0-2)",
            FloorTier::Medium => "Étage moyen (3-4)",
            FloorTier::High => "Étage haut (5+)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Any,
    North,
    South,
    East,
    West,
}

impl Orientation {
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Any => "Peu importe",
            Orientation::North => "Nord",
            Orientation::South => "Sud",
            Orientation::East => "Est",
            Orientation::West => "Ouest",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum BedChoice {
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "140")]
    #[value(name = "140")]
    Cm140,
    #[serde(rename = "160")]
    #[value(name = "160")]
    Cm160,
    #[serde(rename = "180")]
    #[value(name = "180")]
    Cm180,
}

impl BedChoice {
    pub fn width_cm(&self) -> Option<u32> {
        match self {
            BedChoice::Any => None,
            BedChoice::Cm140 => Some(140),
            BedChoice::Cm160 => Some(160),
            BedChoice::Cm180 => Some(180),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AcChoice {
    #[default]
    Any,
    With,
    Without,
}

/// First wizard step: choices about the unit itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentOptions {
    pub floor: FloorTier,
    pub orientation: Orientation,
    pub bed: BedChoice,
    pub ac: AcChoice,
}

/// Parking is a single choice so indoor and outdoor can never both be booked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Parking {
    #[default]
    None,
    Indoor,
    Outdoor,
}

impl Parking {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Parking::None => None,
            Parking::Indoor => Some("Parking sous-sol"),
            Parking::Outdoor => Some("Parking extérieur"),
        }
    }
}

/// Second wizard step: paid services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOptions {
    pub tv: bool,
    pub linen_pack: bool,
    pub parking: Parking,
}

impl ServiceOptions {
    pub fn parking_indoor(&self) -> bool {
        self.parking == Parking::Indoor
    }

    pub fn parking_outdoor(&self) -> bool {
        self.parking == Parking::Outdoor
    }
}
