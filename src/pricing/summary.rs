use crate::models::Apartment;

use super::calculator::{self, Quote};
use super::euros;
use super::options::{AcChoice, ApartmentOptions, FloorTier, Orientation, ServiceOptions};

/// Finalized booking selection.
///
/// Holds its own copy of the typology taken at confirmation time. Editing the
/// selection builds a new summary instead of patching this one.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSummary {
    typology: Apartment,
    options: ApartmentOptions,
    services: ServiceOptions,
    quote: Quote,
    selected_options: Vec<String>,
}

impl BookingSummary {
    pub fn from_selection(
        typology: &Apartment,
        options: ApartmentOptions,
        services: ServiceOptions,
    ) -> Self {
        let quote = calculator::quote(typology, &options, &services);
        Self {
            typology: typology.clone(),
            options,
            services,
            quote,
            selected_options: selected_labels(&options, &services),
        }
    }

    pub fn typology(&self) -> &Apartment {
        &self.typology
    }

    pub fn options(&self) -> &ApartmentOptions {
        &self.options
    }

    pub fn services(&self) -> &ServiceOptions {
        &self.services
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn base_rent(&self) -> f64 {
        self.quote.base_rent
    }

    pub fn floor_supplement(&self) -> f64 {
        self.quote.floor_supplement
    }

    /// Bed, AC and services, everything chosen on top of rent and floor
    pub fn options_cost(&self) -> f64 {
        self.quote.bed_supplement + self.quote.ac_supplement + self.quote.services_cost
    }

    pub fn total_rent(&self) -> f64 {
        self.quote.total_rent
    }

    pub fn application_fee(&self) -> f64 {
        self.quote.application_fee
    }

    pub fn deposit(&self) -> f64 {
        self.quote.deposit
    }

    pub fn selected_options(&self) -> &[String] {
        &self.selected_options
    }
}

/// Human readable list of what the customer picked, priced options first
pub fn selected_labels(options: &ApartmentOptions, services: &ServiceOptions) -> Vec<String> {
    let mut labels = Vec::new();

    if let Some(width) = options.bed.width_cm() {
        let surcharge = calculator::bed_surcharge(options.bed);
        if surcharge > 0.0 {
            labels.push(format!("Lit {}cm (+{}/mois)", width, euros(surcharge)));
        } else {
            labels.push(format!("Lit {}cm", width));
        }
    }
    match options.ac {
        AcChoice::With => labels.push(format!(
            "Climatisation (+{}/mois)",
            euros(calculator::ac_surcharge(options.ac))
        )),
        AcChoice::Without => labels.push("Sans climatisation".to_string()),
        AcChoice::Any => {}
    }
    if services.tv {
        labels.push(format!("Télévision (+{}/mois)", euros(calculator::TV_COST)));
    }
    if services.linen_pack {
        labels.push(format!("Pack linge (+{}/mois)", euros(calculator::LINEN_PACK_COST)));
    }
    if let Some(label) = services.parking.label() {
        labels.push(format!(
            "{} (+{}/mois)",
            label,
            euros(calculator::parking_cost(services.parking))
        ));
    }
    // unpriced: the floor supplement follows the unit's actual floor
    if options.floor != FloorTier::Any {
        labels.push(format!("Préférence : {}", options.floor.label()));
    }
    if options.orientation != Orientation::Any {
        labels.push(format!("Préférence : orientation {}", options.orientation.label()));
    }

    labels
}
