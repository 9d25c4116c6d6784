use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{
    AdminAck, ApartmentUpdate, Document, DocumentUpdate, IndexStatus, InventoryApartment,
    NewApartment, NewDocument,
};

use super::validation::{
    validate_apartment_values, validate_document_content, validate_inventory_file,
};
use super::AdminError;

/// Error body sent by the admin API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Client of the document and apartment indexing API
pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rental-assistant/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/admin/{}", self.base_url, path)
    }

    pub async fn status(&self) -> Result<IndexStatus, AdminError> {
        let response = self.client.get(self.url("status")).send().await?;
        parse(response, "Erreur lors du chargement du statut").await
    }

    // === Documents ===

    pub async fn list_documents(&self) -> Result<Vec<Document>, AdminError> {
        let response = self.client.get(self.url("documents")).send().await?;
        parse(response, "Erreur lors du chargement des documents").await
    }

    pub async fn add_document(&self, document: &NewDocument) -> Result<AdminAck, AdminError> {
        validate_document_content(&document.content)?;

        info!("Adding {} document", document.category);
        let response = self
            .client
            .post(self.url("documents"))
            .json(document)
            .send()
            .await?;
        parse(response, "Erreur lors de l'ajout").await
    }

    pub async fn update_document(&self, update: &DocumentUpdate) -> Result<AdminAck, AdminError> {
        if let Some(content) = &update.content {
            validate_document_content(content)?;
        }

        info!("Updating document {}", update.id);
        let response = self
            .client
            .put(self.url("documents"))
            .json(update)
            .send()
            .await?;
        parse(response, "Erreur lors de la modification").await
    }

    pub async fn delete_document(&self, id: &str) -> Result<AdminAck, AdminError> {
        info!("Deleting document {}", id);
        let response = self
            .client
            .delete(self.url(&format!("documents/{}", id)))
            .send()
            .await?;
        parse(response, "Erreur lors de la suppression").await
    }

    /// Upload a text/PDF file to be chunked into documents of `category`
    pub async fn upload_document(&self, path: &Path, category: &str) -> Result<AdminAck, AdminError> {
        let form = Form::new()
            .part("file", file_part(path).await?)
            .text("category", category.to_string());

        info!("Uploading {} as {}", path.display(), category);
        let response = self
            .client
            .post(self.url("documents/upload"))
            .multipart(form)
            .send()
            .await?;
        parse(response, "Erreur lors de l'upload").await
    }

    // === Apartments ===

    pub async fn list_apartments(&self) -> Result<Vec<InventoryApartment>, AdminError> {
        let response = self.client.get(self.url("apartments")).send().await?;
        parse(response, "Erreur lors du chargement des appartements").await
    }

    pub async fn add_apartment(&self, apartment: &NewApartment) -> Result<AdminAck, AdminError> {
        validate_apartment_values(apartment.rent_cc_eur, apartment.surface_m2)?;

        info!("Adding apartment in {}", apartment.city);
        let response = self
            .client
            .post(self.url("apartments"))
            .json(apartment)
            .send()
            .await?;
        parse(response, "Erreur lors de l'ajout").await
    }

    pub async fn update_apartment(&self, update: &ApartmentUpdate) -> Result<AdminAck, AdminError> {
        validate_apartment_values(update.metadata.rent_cc_eur, update.metadata.surface_m2)?;

        info!("Updating apartment {}", update.id);
        let response = self
            .client
            .put(self.url("apartments"))
            .json(update)
            .send()
            .await?;
        parse(response, "Erreur lors de la modification").await
    }

    pub async fn delete_apartment(&self, id: &str) -> Result<AdminAck, AdminError> {
        info!("Deleting apartment {}", id);
        let response = self
            .client
            .delete(self.url(&format!("apartments/{}", id)))
            .send()
            .await?;
        parse(response, "Erreur lors de la suppression").await
    }

    /// Replace the whole inventory with a JSON or JSONL file
    pub async fn upload_apartments(&self, path: &Path) -> Result<AdminAck, AdminError> {
        validate_inventory_file(path)?;
        let form = Form::new().part("file", file_part(path).await?);

        info!("Replacing apartment inventory from {}", path.display());
        let response = self
            .client
            .post(self.url("apartments/upload"))
            .multipart(form)
            .send()
            .await?;
        parse(response, "Erreur lors de l'import").await
    }

    /// Rebuild both indexes in the background
    pub async fn reindex_all(&self) -> Result<AdminAck, AdminError> {
        info!("Requesting full reindex");
        let response = self.client.post(self.url("reindex-all")).send().await?;
        parse(response, "Erreur lors de la ré-indexation").await
    }
}

async fn file_part(path: &Path) -> Result<Part, AdminError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AdminError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(Part::bytes(bytes).file_name(file_name))
}

/// Decode a success body, or turn an error status into `AdminError::Api`
/// carrying the server's `detail` (or `fallback` when there is none)
async fn parse<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, AdminError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.detail)
        .unwrap_or_else(|| fallback.to_string());

    warn!("Admin API returned {}: {}", status, detail);
    Err(AdminError::Api {
        status: status.as_u16(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;

    fn client_for(server: &mockito::ServerGuard) -> AdminClient {
        AdminClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    fn ack(message: &str) -> String {
        json!({"success": true, "message": message}).to_string()
    }

    #[tokio::test]
    async fn reads_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/status")
            .with_status(200)
            .with_body(
                json!({
                    "in_progress": true,
                    "last_update": "2025-06-01T10:00:00",
                    "documents_count": 42,
                    "apartments_count": 18,
                    "last_action": "reindex_documents"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let status = client_for(&server).status().await.unwrap();
        assert!(status.in_progress);
        assert_eq!(status.documents_count, 42);
        assert_eq!(status.apartments_count, 18);
        assert_eq!(status.last_action.as_deref(), Some("reindex_documents"));
    }

    #[tokio::test]
    async fn short_document_never_reaches_the_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/documents")
            .expect(0)
            .create_async()
            .await;

        let doc = NewDocument {
            content: "court".to_string(),
            ..Default::default()
        };
        let err = client_for(&server).add_document(&doc).await.unwrap_err();

        assert!(matches!(err, AdminError::Validation(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn adds_document_with_category() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/documents")
            .match_body(Matcher::Json(json!({
                "content": "Le dépôt de garantie est d'un mois.",
                "url": "https://ecla.com/faq",
                "category": "faq"
            })))
            .with_status(200)
            .with_body(ack("Document ajouté. Ré-indexation en cours..."))
            .create_async()
            .await;

        let doc = NewDocument {
            content: "Le dépôt de garantie est d'un mois.".to_string(),
            url: "https://ecla.com/faq".to_string(),
            category: "faq".to_string(),
        };
        let ack = client_for(&server).add_document(&doc).await.unwrap();

        mock.assert_async().await;
        assert!(ack.success);
        assert_eq!(ack.message, "Document ajouté. Ré-indexation en cours...");
    }

    #[tokio::test]
    async fn server_detail_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/admin/documents/doc-1")
            .with_status(404)
            .with_body(json!({"detail": "Document non trouvé"}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).delete_document("doc-1").await.unwrap_err();
        match err {
            AdminError::Api { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "Document non trouvé");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_detail_uses_operation_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/admin/reindex-all")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = client_for(&server).reindex_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Erreur lors de la ré-indexation");
    }

    #[tokio::test]
    async fn invalid_apartment_is_rejected_locally() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/apartments")
            .expect(0)
            .create_async()
            .await;

        let apt = NewApartment {
            rent_cc_eur: 0.0,
            ..Default::default()
        };
        let err = client_for(&server).add_apartment(&apt).await.unwrap_err();
        assert_eq!(err.to_string(), "Valeurs invalides");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn lists_inventory() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/apartments")
            .with_status(200)
            .with_body(
                json!([{
                    "id": "apt_1",
                    "metadata": {
                        "city": "Massy-Palaiseau",
                        "rooms": 1,
                        "rent_cc_eur": 610.0,
                        "surface_m2": 21.0,
                        "furnished": true,
                        "availability_date": "2025-09-01",
                        "energy_label": "B"
                    }
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let apartments = client_for(&server).list_apartments().await.unwrap();
        assert_eq!(apartments.len(), 1);
        assert_eq!(apartments[0].metadata.city, "Massy-Palaiseau");
        assert_eq!(apartments[0].metadata.postal_code, None);
    }

    #[tokio::test]
    async fn uploads_inventory_as_multipart() {
        let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        writeln!(file, r#"{{"id": "apt_1", "metadata": {{"city": "Lille"}}}}"#).unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/apartments/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
            )
            .match_body(Matcher::Regex(r#"name="file""#.to_string()))
            .with_status(200)
            .with_body(json!({"success": true, "message": "1 appartements importés.", "count": 1}).to_string())
            .create_async()
            .await;

        let ack = client_for(&server).upload_apartments(file.path()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(ack.count, Some(1));
    }

    #[tokio::test]
    async fn upload_of_missing_file_is_an_io_error() {
        let server = mockito::Server::new_async().await;
        let err = client_for(&server)
            .upload_document(Path::new("/nonexistent/guide.pdf"), "service")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Io { .. }));
    }

    #[tokio::test]
    async fn apartment_update_is_flat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/admin/apartments")
            .match_body(Matcher::PartialJson(json!({"id": "apt_3", "city": "Lille", "rooms": 2})))
            .with_status(200)
            .with_body(ack("Appartement modifié"))
            .create_async()
            .await;

        let update = ApartmentUpdate {
            id: "apt_3".to_string(),
            metadata: crate::models::ApartmentMetadata {
                city: "Lille".to_string(),
                rooms: 2,
                rent_cc_eur: 700.0,
                surface_m2: 40.0,
                furnished: true,
                availability_date: String::new(),
                energy_label: None,
                postal_code: None,
            },
        };
        client_for(&server).update_apartment(&update).await.unwrap();
        mock.assert_async().await;
    }
}
