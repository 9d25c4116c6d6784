//! Plain-text rendering of everything the assistant shows: chat bubbles,
//! apartment cards, quick replies, the booking summary and admin listings.

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::admin::{Notice, NoticeKind};
use crate::models::{
    Apartment, ChatMessage, Document, IndexStatus, InventoryApartment, QuickReply, Sender, Surface,
};
use crate::pricing::{euros, BookingSummary, Quote};

const TYPING_CURSOR: char = '▌';
const EXCERPT_CHARS: usize = 80;

pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// `dd/mm/YYYY`, "Non spécifié" when empty, the raw text when unparseable
pub fn format_availability(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return "Non spécifié".to_string();
    }
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(date)
            .ok()
            .map(|dt| dt.date_naive())
    });
    match parsed {
        Some(day) => day.format("%d/%m/%Y").to_string(),
        None => date.to_string(),
    }
}

pub fn format_surface(apartment: &Apartment) -> String {
    match apartment.surface() {
        Surface::Exact(m2) => format!("{} m²", m2),
        Surface::Range { min, max } => format!("{} à {} m²", min, max),
    }
}

pub fn render_message(message: &ChatMessage) -> String {
    let author = match message.sender {
        Sender::User => "Vous",
        Sender::Assistant => "Sarah",
    };
    let mut out = format!("{} · {}\n{}", author, format_time(&message.timestamp), message.content);
    if message.streaming {
        out.push(TYPING_CURSOR);
    }
    out
}

pub fn render_apartment_card(index: usize, apartment: &Apartment) -> String {
    let energy_label = if apartment.energy_label.is_empty() {
        "-"
    } else {
        apartment.energy_label.as_str()
    };
    let mut lines = vec![
        format!(
            "[{}] {} - {} ({})   DPE {}   {}/mois CC",
            index,
            apartment.display_name(),
            apartment.city,
            apartment.postal_code,
            energy_label,
            euros(apartment.rent_cc_eur),
        ),
        format!(
            "    Surface: {} | Pièces: {} | {} | Dispo: {}",
            format_surface(apartment),
            apartment.rooms,
            if apartment.furnished { "Meublé" } else { "Non meublé" },
            format_availability(&apartment.availability_date),
        ),
    ];
    if !apartment.content.is_empty() {
        lines.push(format!("    {}", apartment.content));
    }
    lines.join("\n")
}

pub fn render_quick_replies(replies: &[QuickReply]) -> String {
    replies
        .iter()
        .enumerate()
        .map(|(i, reply)| match &reply.icon {
            Some(icon) => format!("({}) {} {}", i + 1, icon, reply.label),
            None => format!("({}) {}", i + 1, reply.label),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Live price footer of the configurator
pub fn render_quote(quote: &Quote) -> String {
    let mut lines = vec![format!("Loyer de base          {}/mois", euros(quote.base_rent))];
    let supplements = [
        ("Supplément étage     ", quote.floor_supplement),
        ("Lit                  ", quote.bed_supplement),
        ("Climatisation        ", quote.ac_supplement),
        ("Services             ", quote.services_cost),
    ];
    for (label, amount) in supplements {
        if amount > 0.0 {
            lines.push(format!("{} +{}/mois", label, euros(amount)));
        }
    }
    lines.push(format!("Prix total             {}/mois", euros(quote.total_rent)));
    lines.push(format!("+ Frais de dossier     {}", euros(quote.application_fee)));
    lines.push(format!("+ Dépôt de garantie    {}", euros(quote.deposit)));
    lines.join("\n")
}

pub fn render_booking_summary(summary: &BookingSummary) -> String {
    let typology = summary.typology();
    let floor = typology
        .floor
        .map(|f| f.to_string())
        .unwrap_or_else(|| "-".to_string());
    let orientation = typology.orientation.as_deref().unwrap_or("-");

    let mut lines = vec![
        "📋 RÉCAPITULATIF DE VOTRE RÉSERVATION".to_string(),
        String::new(),
        "Logement".to_string(),
        format!(
            "  {} {} - {}",
            typology.display_name(),
            format_surface(typology),
            typology.city
        ),
        format!("  Étage {} - Orientation {}", floor, orientation),
    ];
    if let Some(bed) = typology.bed_size {
        let ac = if typology.has_ac == Some(true) { " - Climatisation" } else { "" };
        lines.push(format!("  Lit {}cm{}", bed, ac));
    }

    lines.push(String::new());
    lines.push("Détail du loyer mensuel".to_string());
    lines.push(format!("  Loyer de base         {}", euros(summary.base_rent())));
    if summary.floor_supplement() > 0.0 {
        lines.push(format!("  Supplément étage     +{}", euros(summary.floor_supplement())));
    }
    if !summary.selected_options().is_empty() {
        lines.push("  Options :".to_string());
        lines.extend(summary.selected_options().iter().map(|option| format!("    • {}", option)));
        lines.push(format!("  Total options        +{}", euros(summary.options_cost())));
    }
    lines.push(format!("  TOTAL MENSUEL         {}", euros(summary.total_rent())));

    lines.push(String::new());
    lines.push("Frais initiaux".to_string());
    lines.push(format!("  Frais de dossier      {}", euros(summary.application_fee())));
    lines.push(format!(
        "  Dépôt de garantie     {} ({} mois)",
        euros(summary.deposit()),
        summary.quote().deposit_months
    ));
    lines.join("\n")
}

pub fn render_status(status: &IndexStatus) -> String {
    format!(
        "{} | documents: {} | appartements: {} | dernière mise à jour: {} | dernière action: {}",
        if status.in_progress { "⏳ Indexation en cours" } else { "✅ Index à jour" },
        status.documents_count,
        status.apartments_count,
        status.last_update.as_deref().unwrap_or("jamais"),
        status.last_action.as_deref().unwrap_or("-"),
    )
}

pub fn render_document(document: &Document) -> String {
    let excerpt: String = document.content.chars().take(EXCERPT_CHARS).collect();
    let ellipsis = if document.content.chars().count() > EXCERPT_CHARS { "…" } else { "" };
    let url = if document.url.is_empty() {
        String::new()
    } else {
        format!(" <{}>", document.url)
    };
    let source = match (&document.source_file, document.chunk_index) {
        (Some(file), Some(chunk)) => format!(" ({} #{})", file, chunk),
        (Some(file), None) => format!(" ({})", file),
        (None, _) => String::new(),
    };
    format!("{} [{}] {}{}{}{}", document.id, document.kind, excerpt, ellipsis, url, source)
}

pub fn render_inventory(apartment: &InventoryApartment) -> String {
    let meta = &apartment.metadata;
    format!(
        "{} | {} | {} pièce(s) | {} m² | {}/mois | {} | dispo {}",
        apartment.id,
        meta.city,
        meta.rooms,
        meta.surface_m2,
        euros(meta.rent_cc_eur),
        if meta.furnished { "meublé" } else { "non meublé" },
        format_availability(&meta.availability_date),
    )
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("✅ {}", notice.text),
        NoticeKind::Error => format!("❌ {}", notice.text),
    }
}
