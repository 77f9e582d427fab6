// Firestore REST repository implementation
use crate::application::submission_repository::{FetchError, SubmissionRepository, VisibilitySettings};
use crate::domain::submission::Submission;
use crate::domain::visibility::PublicSettings;
use crate::infrastructure::config::StoreSettings;
use crate::infrastructure::firestore_value::{decode_public_flag, decode_submission, Document, RunQueryItem};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct FirestoreRepository {
    client: reqwest::Client,
    documents_url: String,
    collection: String,
    settings_document: String,
    access_token: Option<String>,
}

impl FirestoreRepository {
    pub fn new(settings: StoreSettings) -> Self {
        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            settings.base_url.trim_end_matches('/'),
            urlencoding::encode(&settings.project_id),
            urlencoding::encode(&settings.database),
        );

        Self {
            client: reqwest::Client::new(),
            documents_url,
            collection: settings.collection,
            settings_document: settings.settings_document,
            access_token: settings.access_token.filter(|t| !t.is_empty()),
        }
    }

    fn run_query_url(&self) -> String {
        format!("{}:runQuery", self.documents_url)
    }

    fn document_url(&self, path: &str) -> String {
        let encoded: Vec<_> = path
            .trim_matches('/')
            .split('/')
            .map(urlencoding::encode)
            .collect();
        format!("{}/{}", self.documents_url, encoded.join("/"))
    }

    fn submissions_query(&self) -> serde_json::Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "orderBy": [{
                    "field": { "fieldPath": "timestamp" },
                    "direction": "DESCENDING"
                }]
            }
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let response = self
            .authorized(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(FetchError::Permission {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(FetchError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decode every document in a `runQuery` response, skipping ones without a timestamp.
pub fn decode_run_query(items: Vec<RunQueryItem>) -> Vec<Submission> {
    items
        .into_iter()
        .filter_map(|item| item.document)
        .filter_map(|doc| {
            let decoded = decode_submission(&doc);
            if decoded.is_none() {
                tracing::warn!("Skipping submission {} without a valid timestamp", doc.id());
            }
            decoded
        })
        .collect()
}

#[async_trait]
impl SubmissionRepository for FirestoreRepository {
    async fn fetch_all(&self) -> Result<Vec<Submission>, FetchError> {
        let request = self
            .client
            .post(self.run_query_url())
            .json(&self.submissions_query());

        tracing::debug!("Querying collection {}", self.collection);
        let items = self
            .send(request)
            .await?
            .json::<Vec<RunQueryItem>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let submissions = decode_run_query(items);
        tracing::debug!("Decoded {} submissions from {}", submissions.len(), self.collection);
        Ok(submissions)
    }
}

#[async_trait]
impl VisibilitySettings for FirestoreRepository {
    async fn load(&self) -> Result<PublicSettings, FetchError> {
        let request = self.client.get(self.document_url(&self.settings_document));

        let document = match self.send(request).await {
            Ok(response) => response
                .json::<Document>()
                .await
                .map_err(|e| FetchError::Decode(e.to_string()))?,
            Err(FetchError::Status { status: 404, .. }) => {
                tracing::debug!("No settings document at {}; data is private", self.settings_document);
                return Ok(PublicSettings::private());
            }
            Err(e) => return Err(e),
        };

        Ok(PublicSettings {
            is_public_data_enabled: decode_public_flag(&document),
        })
    }
}
