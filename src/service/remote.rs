//! HTTP client for the remote dataset API.
//!
//! Endpoints (relative to the configured base URL, HTTP Basic auth on all):
//! - `POST upload/` multipart field `file`, answers `{message, summary}`
//! - `GET history/` answers the most recent uploads with their aggregates
//! - `GET report/{id}/` answers a PDF
//!
//! The API never returns rows or extremes. Extremes for a fresh upload come
//! from the rows parsed locally; listed history entries have none.

use super::{DatasetService, UploadOutcome};
use crate::config::AppConfig;
use crate::error::{ChemvizError, Result};
use crate::models::{
    EquipmentRecord, HistoryEntry, RemoteDataset, SessionMode, SummaryStatistics, UploadResponse,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of presenting credentials to the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Accepted,
    Rejected,
    /// The request never produced a response
    Unreachable,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct RemoteService {
    client: Client,
    config: AppConfig,
    username: String,
    password: String,
}

impl RemoteService {
    pub fn new(
        config: &AppConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            username: username.into(),
            password: password.into(),
        })
    }

    /// Probe the history endpoint with the stored credentials
    pub async fn check_credentials(&self) -> CredentialCheck {
        match self.get("history/").send().await {
            Ok(response) if response.status().is_success() => CredentialCheck::Accepted,
            Ok(response) => {
                debug!("Credential check rejected with {}", response.status());
                CredentialCheck::Rejected
            }
            Err(e) => {
                warn!("Remote service unreachable: {}", e);
                CredentialCheck::Unreachable
            }
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.config.endpoint(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn fetch_history(&self) -> Result<Vec<RemoteDataset>> {
        let response = self.get("history/").send().await?;
        let response = ensure_success(response, "Failed to fetch history").await?;
        Ok(response.json::<Vec<RemoteDataset>>().await?)
    }
}

/// Pass 2xx responses through; turn anything else into a readable error
async fn ensure_success(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error);

    Err(ChemvizError::remote(match detail {
        Some(error) => error,
        None => format!("{context}: {status}"),
    }))
}

/// `<name>_report.pdf`, keeping only the last path component of a
/// server-supplied name
fn report_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    format!("{base}_report.pdf")
}

#[async_trait]
impl DatasetService for RemoteService {
    fn mode(&self) -> SessionMode {
        SessionMode::Connected
    }

    async fn upload(
        &mut self,
        file_name: &str,
        contents: &str,
        records: &[EquipmentRecord],
    ) -> Result<UploadOutcome> {
        let part = Part::bytes(contents.as_bytes().to_vec())
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.endpoint("upload/"))
            .basic_auth(&self.username, Some(&self.password))
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response, "Upload failed").await?;
        let body: UploadResponse = response.json().await?;

        info!("Remote upload of {}: {}", file_name, body.message);

        // The upload response carries no id; the newest listed entry with the
        // same name is the one just stored.
        let history_id = match self.fetch_history().await {
            Ok(listing) => listing
                .iter()
                .find(|dataset| dataset.filename == file_name)
                .map(|dataset| dataset.id),
            Err(e) => {
                warn!("Could not refresh history after upload: {}", e);
                None
            }
        };

        Ok(UploadOutcome {
            summary: SummaryStatistics::from_remote(&body.summary, Some(records)),
            history_id,
        })
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let listing = self.fetch_history().await?;
        debug!("Fetched {} remote history entries", listing.len());
        Ok(listing.into_iter().map(HistoryEntry::from).collect())
    }

    async fn report(&self, entry: &HistoryEntry, dir: &Path) -> Result<PathBuf> {
        let response = self.get(&format!("report/{}/", entry.id)).send().await?;
        let response = ensure_success(response, "Failed to download report").await?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(report_file_name(&entry.file_name));
        tokio::fs::write(&path, &bytes).await?;

        info!("Saved remote report to {}", path.display());
        Ok(path)
    }

    async fn clear_history(&mut self) -> Result<()> {
        Err(ChemvizError::remote(
            "History is managed by the remote service and cannot be cleared from here",
        ))
    }
}
