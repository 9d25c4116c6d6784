use crate::models::Apartment;

use super::options::{AcChoice, ApartmentOptions, BedChoice, Parking, ServiceOptions};

pub const DEFAULT_APPLICATION_FEE: f64 = 100.0;
pub const DEFAULT_DEPOSIT_MONTHS: f64 = 1.0;

pub const TV_COST: f64 = 40.0;
pub const LINEN_PACK_COST: f64 = 30.0;
pub const INDOOR_PARKING_COST: f64 = 50.0;
pub const OUTDOOR_PARKING_COST: f64 = 30.0;

/// Monthly surcharge for the unit's floor number
pub fn floor_surcharge(floor: u32) -> f64 {
    match floor {
        0 => 0.0,
        1..=2 => 30.0,
        3..=4 => 50.0,
        5..=6 => 80.0,
        _ => 100.0,
    }
}

pub fn bed_surcharge(bed: BedChoice) -> f64 {
    match bed {
        BedChoice::Any | BedChoice::Cm140 => 0.0,
        BedChoice::Cm160 => 20.0,
        BedChoice::Cm180 => 40.0,
    }
}

pub fn ac_surcharge(ac: AcChoice) -> f64 {
    match ac {
        AcChoice::With => 50.0,
        AcChoice::Any | AcChoice::Without => 0.0,
    }
}

pub fn parking_cost(parking: Parking) -> f64 {
    match parking {
        Parking::None => 0.0,
        Parking::Indoor => INDOOR_PARKING_COST,
        Parking::Outdoor => OUTDOOR_PARKING_COST,
    }
}

/// Sum of the selected flat monthly services
pub fn services_cost(services: &ServiceOptions) -> f64 {
    let mut cost = parking_cost(services.parking);
    if services.tv {
        cost += TV_COST;
    }
    if services.linen_pack {
        cost += LINEN_PACK_COST;
    }
    cost
}

/// One-time application fee. An unset or zero fee falls back to the default.
pub fn application_fee(typology: &Apartment) -> f64 {
    match typology.application_fee {
        Some(fee) if fee > 0.0 => fee,
        _ => DEFAULT_APPLICATION_FEE,
    }
}

pub fn deposit_months(typology: &Apartment) -> f64 {
    match typology.deposit_months {
        Some(months) if months > 0.0 => months,
        _ => DEFAULT_DEPOSIT_MONTHS,
    }
}

/// Monetary breakdown of one selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub base_rent: f64,
    pub floor_supplement: f64,
    pub bed_supplement: f64,
    pub ac_supplement: f64,
    pub services_cost: f64,
    pub total_rent: f64,
    pub application_fee: f64,
    pub deposit_months: f64,
    /// Total monthly rent times the deposit multiplier
    pub deposit: f64,
}

impl Quote {
    pub fn apartment_supplements(&self) -> f64 {
        self.floor_supplement + self.bed_supplement + self.ac_supplement
    }
}

/// Price a typology with the chosen options. Pure, never fails for finite input.
pub fn quote(
    typology: &Apartment,
    options: &ApartmentOptions,
    services: &ServiceOptions,
) -> Quote {
    let base_rent = typology.rent_cc_eur;
    let floor_supplement = typology.floor.map(floor_surcharge).unwrap_or(0.0);
    let bed_supplement = bed_surcharge(options.bed);
    let ac_supplement = ac_surcharge(options.ac);
    let services_cost = services_cost(services);

    let total_rent = base_rent + floor_supplement + bed_supplement + ac_supplement + services_cost;
    let months = deposit_months(typology);

    Quote {
        base_rent,
        floor_supplement,
        bed_supplement,
        ac_supplement,
        services_cost,
        total_rent,
        application_fee: application_fee(typology),
        deposit_months: months,
        deposit: total_rent * months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::typology;

    #[test]
    fn floor_surcharge_bands() {
        assert_eq!(floor_surcharge(0), 0.0);
        assert_eq!(floor_surcharge(1), 30.0);
        assert_eq!(floor_surcharge(2), 30.0);
        assert_eq!(floor_surcharge(3), 50.0);
        assert_eq!(floor_surcharge(4), 50.0);
        assert_eq!(floor_surcharge(5), 80.0);
        assert_eq!(floor_surcharge(6), 80.0);
        assert_eq!(floor_surcharge(7), 100.0);
        assert_eq!(floor_surcharge(23), 100.0);
    }

    #[test]
    fn services_cost_adds_tv_linen_and_indoor_parking() {
        let services = ServiceOptions {
            tv: true,
            linen_pack: true,
            parking: Parking::Indoor,
        };
        assert_eq!(services_cost(&services), 120.0);
        assert_eq!(services_cost(&ServiceOptions::default()), 0.0);
    }

    #[test]
    fn services_cost_is_sum_of_individual_services() {
        let all = [
            ServiceOptions { tv: true, ..Default::default() },
            ServiceOptions { linen_pack: true, ..Default::default() },
            ServiceOptions { parking: Parking::Outdoor, ..Default::default() },
        ];
        let separate: f64 = all.iter().map(services_cost).sum();
        let combined = services_cost(&ServiceOptions {
            tv: true,
            linen_pack: true,
            parking: Parking::Outdoor,
        });
        assert_eq!(combined, separate);
        assert_eq!(combined, 100.0);
    }

    #[test]
    fn total_is_base_plus_floor_plus_services_with_default_unit_options() {
        let mut apt = typology();
        for floor in [0, 2, 4, 6, 7] {
            apt.floor = Some(floor);
            let services = ServiceOptions {
                tv: true,
                linen_pack: false,
                parking: Parking::Outdoor,
            };
            let q = quote(&apt, &ApartmentOptions::default(), &services);
            assert_eq!(
                q.total_rent,
                apt.rent_cc_eur + floor_surcharge(floor) + services_cost(&services)
            );
        }
    }

    #[test]
    fn unit_options_add_bed_and_ac_supplements() {
        let mut apt = typology();
        apt.floor = None;
        let options = ApartmentOptions {
            bed: BedChoice::Cm180,
            ac: AcChoice::With,
            ..Default::default()
        };
        let q = quote(&apt, &options, &ServiceOptions::default());
        assert_eq!(q.floor_supplement, 0.0);
        assert_eq!(q.bed_supplement, 40.0);
        assert_eq!(q.ac_supplement, 50.0);
        assert_eq!(q.apartment_supplements(), 90.0);
        assert_eq!(q.total_rent, 840.0);

        let q = quote(
            &apt,
            &ApartmentOptions { bed: BedChoice::Cm140, ac: AcChoice::Without, ..Default::default() },
            &ServiceOptions::default(),
        );
        assert_eq!(q.total_rent, apt.rent_cc_eur);
    }

    #[test]
    fn deposit_is_total_rent_times_months() {
        let apt = typology();
        let services = ServiceOptions { tv: true, ..Default::default() };
        let q = quote(&apt, &ApartmentOptions::default(), &services);
        // 750 base + 50 (3rd floor) + 40 tv
        assert_eq!(q.total_rent, 840.0);
        assert_eq!(q.deposit_months, 2.0);
        assert_eq!(q.deposit, 1680.0);
        assert_eq!(q.application_fee, 150.0);
    }

    #[test]
    fn missing_fee_and_deposit_fall_back_to_defaults() {
        let mut apt = typology();
        apt.application_fee = None;
        apt.deposit_months = Some(0.0);
        apt.floor = Some(0);
        let q = quote(&apt, &ApartmentOptions::default(), &ServiceOptions::default());
        assert_eq!(q.application_fee, DEFAULT_APPLICATION_FEE);
        assert_eq!(q.deposit_months, 1.0);
        assert_eq!(q.deposit, apt.rent_cc_eur);
    }

    #[test]
    fn quote_is_deterministic() {
        let apt = typology();
        let options = ApartmentOptions { bed: BedChoice::Cm160, ..Default::default() };
        let services = ServiceOptions { linen_pack: true, ..Default::default() };
        assert_eq!(quote(&apt, &options, &services), quote(&apt, &options, &services));
    }
}
