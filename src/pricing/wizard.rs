use thiserror::Error;
use tracing::debug;

use crate::models::Apartment;

use super::calculator::{self, Quote};
use super::options::{
    AcChoice, ApartmentOptions, BedChoice, FloorTier, Orientation, Parking, ServiceOptions,
};
use super::summary::BookingSummary;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpsellError {
    #[error("{requested:?} parking is unavailable while {selected:?} parking is selected")]
    ParkingConflict { requested: Parking, selected: Parking },

    #[error("services can only be changed on the services step")]
    WrongStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Apartment,
    Services,
}

/// Two-step configurator: unit options, then services.
///
/// Every change re-prices from scratch; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct UpsellWizard {
    typology: Apartment,
    step: Step,
    options: ApartmentOptions,
    services: ServiceOptions,
}

impl UpsellWizard {
    /// Start on the first step with the services already chosen for this typology
    pub fn new(typology: Apartment, current_services: ServiceOptions) -> Self {
        debug!("Opening upsell wizard for {}", typology.id);
        Self {
            typology,
            step: Step::Apartment,
            options: ApartmentOptions::default(),
            services: current_services,
        }
    }

    pub fn typology(&self) -> &Apartment {
        &self.typology
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn options(&self) -> &ApartmentOptions {
        &self.options
    }

    pub fn services(&self) -> &ServiceOptions {
        &self.services
    }

    pub fn next(&mut self) {
        self.step = Step::Services;
    }

    pub fn previous(&mut self) {
        self.step = Step::Apartment;
    }

    pub fn set_floor(&mut self, floor: FloorTier) {
        self.options.floor = floor;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.options.orientation = orientation;
    }

    pub fn set_bed(&mut self, bed: BedChoice) {
        self.options.bed = bed;
    }

    pub fn set_ac(&mut self, ac: AcChoice) {
        self.options.ac = ac;
    }

    pub fn toggle_tv(&mut self) -> Result<(), UpsellError> {
        self.ensure_services_step()?;
        self.services.tv = !self.services.tv;
        Ok(())
    }

    pub fn toggle_linen_pack(&mut self) -> Result<(), UpsellError> {
        self.ensure_services_step()?;
        self.services.linen_pack = !self.services.linen_pack;
        Ok(())
    }

    /// Whether the control for `kind` accepts input. The other kind's control
    /// is disabled while one parking is booked.
    pub fn parking_enabled(&self, kind: Parking) -> bool {
        self.services.parking == Parking::None || self.services.parking == kind
    }

    /// Toggle a parking kind. Toggling the booked kind releases it; asking for
    /// the other kind while one is booked is rejected and changes nothing.
    pub fn toggle_parking(&mut self, kind: Parking) -> Result<(), UpsellError> {
        self.ensure_services_step()?;
        if kind == Parking::None {
            self.services.parking = Parking::None;
            return Ok(());
        }
        if !self.parking_enabled(kind) {
            return Err(UpsellError::ParkingConflict {
                requested: kind,
                selected: self.services.parking,
            });
        }
        self.services.parking = if self.services.parking == kind {
            Parking::None
        } else {
            kind
        };
        Ok(())
    }

    /// Live price for the current selection
    pub fn quote(&self) -> Quote {
        calculator::quote(&self.typology, &self.options, &self.services)
    }

    /// Freeze the selection into a summary
    pub fn validate(&self) -> BookingSummary {
        BookingSummary::from_selection(&self.typology, self.options, self.services)
    }

    fn ensure_services_step(&self) -> Result<(), UpsellError> {
        if self.step == Step::Services {
            Ok(())
        } else {
            Err(UpsellError::WrongStep)
        }
    }
}
