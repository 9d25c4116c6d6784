use std::path::Path;

use super::AdminError;

pub const MIN_DOCUMENT_LENGTH: usize = 10;

/// Document content must be at least ten characters long
pub fn validate_document_content(content: &str) -> Result<(), AdminError> {
    if content.chars().count() < MIN_DOCUMENT_LENGTH {
        return Err(AdminError::Validation(format!(
            "Le contenu doit contenir au moins {} caractères",
            MIN_DOCUMENT_LENGTH
        )));
    }
    Ok(())
}

/// Rent and surface must be strictly positive
pub fn validate_apartment_values(rent: f64, surface: f64) -> Result<(), AdminError> {
    if !(rent.is_finite() && surface.is_finite()) || rent <= 0.0 || surface <= 0.0 {
        return Err(AdminError::Validation("Valeurs invalides".to_string()));
    }
    Ok(())
}

/// Inventory uploads are JSON arrays or JSON lines
pub fn validate_inventory_file(path: &Path) -> Result<(), AdminError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl") => {
            Ok(())
        }
        _ => Err(AdminError::Validation(
            "Sélectionnez un fichier JSON ou JSONL".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_rejected() {
        assert!(validate_document_content("trop court").is_ok());
        let err = validate_document_content("court").unwrap_err();
        assert_eq!(err.to_string(), "Le contenu doit contenir au moins 10 caractères");
        assert!(validate_document_content("").is_err());
    }

    #[test]
    fn content_length_counts_characters() {
        // nine characters, more than ten bytes
        assert!(validate_document_content("éééééàààà").is_err());
    }

    #[test]
    fn rent_and_surface_must_be_positive() {
        assert!(validate_apartment_values(450.0, 20.0).is_ok());
        assert!(validate_apartment_values(0.0, 20.0).is_err());
        assert!(validate_apartment_values(450.0, -1.0).is_err());
        assert!(validate_apartment_values(f64::NAN, 20.0).is_err());
    }

    #[test]
    fn inventory_file_extension() {
        assert!(validate_inventory_file(Path::new("apartments.json")).is_ok());
        assert!(validate_inventory_file(Path::new("apartments.JSONL")).is_ok());
        assert!(validate_inventory_file(Path::new("apartments.csv")).is_err());
        assert!(validate_inventory_file(Path::new("apartments")).is_err());
    }
}
