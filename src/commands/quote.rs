use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use rental_assistant::models::Apartment;
use rental_assistant::pricing::{
    AcChoice, BedChoice, FloorTier, Orientation, Parking, ServiceOptions, UpsellWizard,
};
use rental_assistant::render;

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Typology as returned by the search endpoint (JSON)
    #[arg(long)]
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = FloorTier::Any)]
    floor_tier: FloorTier,

    #[arg(long, value_enum, default_value_t = Orientation::Any)]
    orientation: Orientation,

    #[arg(long, value_enum, default_value_t = BedChoice::Any)]
    bed: BedChoice,

    #[arg(long, value_enum, default_value_t = AcChoice::Any)]
    ac: AcChoice,

    /// Add a television
    #[arg(long)]
    tv: bool,

    /// Add the linen pack
    #[arg(long)]
    linen: bool,

    #[arg(long, value_enum, default_value_t = Parking::None)]
    parking: Parking,
}

pub async fn run(args: &QuoteArgs) -> Result<ExitCode> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let typology: Apartment = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid typology in {}", args.file.display()))?;

    let mut wizard = UpsellWizard::new(typology, ServiceOptions::default());
    wizard.set_floor(args.floor_tier);
    wizard.set_orientation(args.orientation);
    wizard.set_bed(args.bed);
    wizard.set_ac(args.ac);

    wizard.next();
    if args.tv {
        wizard.toggle_tv()?;
    }
    if args.linen {
        wizard.toggle_linen_pack()?;
    }
    if args.parking != Parking::None {
        wizard.toggle_parking(args.parking)?;
    }

    println!("{}", render::render_booking_summary(&wizard.validate()));
    Ok(ExitCode::SUCCESS)
}
