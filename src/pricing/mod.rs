pub mod calculator;
pub mod options;
pub mod summary;
pub mod wizard;

pub use calculator::{quote, Quote};
pub use options::{AcChoice, ApartmentOptions, BedChoice, FloorTier, Orientation, Parking, ServiceOptions};
pub use summary::BookingSummary;
pub use wizard::{Step, UpsellError, UpsellWizard};

/// Format an amount in euros without a decimal part when it is whole
pub fn euros(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}€", amount)
    } else {
        format!("{:.2}€", amount)
    }
}
