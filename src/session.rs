//! User sessions.
//!
//! A [`Session`] is created by logging in and owns everything that used to be
//! shared state in a dashboard: who is logged in, which dataset service was
//! selected, and the dataset currently being looked at. Logging out consumes
//! the session and clears what was persisted for it.
//!
//! Login rules:
//! - credentials accepted by the remote API give a connected session
//! - credentials rejected by the remote API fail
//! - if the API cannot be reached, the configured demo pair opens an offline
//!   demo session; anything else fails

use crate::config::AppConfig;
use crate::constants::{SAMPLE_CSV, SAMPLE_FILE_NAME};
use crate::error::{ChemvizError, Result};
use crate::models::{Dataset, HistoryEntry, SessionMode};
use crate::parser::parse_with_columns;
use crate::report::Report;
use crate::service::{CredentialCheck, DatasetService, DemoService, RemoteService};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Credentials remembered between command invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
    pub password: String,
    pub mode: SessionMode,
}

/// Reads and writes the remembered session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            path: config.session_file(),
        }
    }

    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub fn save(&self, stored: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(stored)?)?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

pub struct Session {
    username: String,
    password: String,
    config: AppConfig,
    service: Box<dyn DatasetService>,
    current: Option<Dataset>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("mode", &self.service.mode())
            .field("current", &self.current.as_ref().map(|d| &d.file_name))
            .finish()
    }
}

impl Session {
    /// Verify credentials and pick the dataset service for this session
    pub async fn login(config: &AppConfig, username: &str, password: &str) -> Result<Self> {
        let remote = RemoteService::new(config, username, password)?;

        match remote.check_credentials().await {
            CredentialCheck::Accepted => {
                info!("Logged in to {} as {}", config.api_base_url, username);
                Ok(Self::with_service(config, username, password, Box::new(remote)))
            }
            CredentialCheck::Rejected => Err(ChemvizError::InvalidCredentials),
            CredentialCheck::Unreachable => {
                if username == config.demo_username && password == config.demo_password {
                    warn!("Remote service unreachable, starting demo session");
                    let demo = DemoService::open(config)?;
                    Ok(Self::with_service(config, username, password, Box::new(demo)))
                } else {
                    Err(ChemvizError::InvalidCredentials)
                }
            }
        }
    }

    /// Rebuild a session from remembered credentials without re-verifying
    pub fn resume(config: &AppConfig, stored: &StoredSession) -> Result<Self> {
        let service: Box<dyn DatasetService> = match stored.mode {
            SessionMode::Demo => Box::new(DemoService::open(config)?),
            SessionMode::Connected => Box::new(RemoteService::new(
                config,
                &stored.username,
                &stored.password,
            )?),
        };
        Ok(Self::with_service(
            config,
            &stored.username,
            &stored.password,
            service,
        ))
    }

    /// Session over an explicit service
    pub fn with_service(
        config: &AppConfig,
        username: &str,
        password: &str,
        service: Box<dyn DatasetService>,
    ) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            config: config.clone(),
            service,
            current: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn mode(&self) -> SessionMode {
        self.service.mode()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The dataset loaded by the last upload or history selection
    pub fn current(&self) -> Option<&Dataset> {
        self.current.as_ref()
    }

    /// What to remember so a later invocation can resume this session
    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            username: self.username.clone(),
            password: self.password.clone(),
            mode: self.mode(),
        }
    }

    /// Parse, summarise and store an uploaded CSV, making it the current dataset
    pub async fn upload(&mut self, file_name: &str, contents: &str) -> Result<&Dataset> {
        if !file_name.ends_with(".csv") {
            return Err(ChemvizError::invalid_upload(
                file_name,
                "Only CSV files are allowed",
            ));
        }

        let (columns, records) = parse_with_columns(contents);
        let missing = columns.missing_columns();
        if !missing.is_empty() {
            warn!("{} is missing columns {:?}; defaults used", file_name, missing);
        }
        if records.is_empty() {
            return Err(ChemvizError::EmptyDataset {
                file: file_name.to_string(),
            });
        }

        let outcome = self.service.upload(file_name, contents, &records).await?;
        debug!(
            "Upload of {} accepted ({} records, history id {:?})",
            file_name,
            records.len(),
            outcome.history_id
        );

        Ok(&*self.current.insert(Dataset {
            file_name: file_name.to_string(),
            records,
            summary: outcome.summary,
            history_id: outcome.history_id,
        }))
    }

    /// Upload a CSV file from disk
    pub async fn upload_file(&mut self, path: &Path) -> Result<&Dataset> {
        if !path.exists() {
            return Err(ChemvizError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = tokio::fs::read_to_string(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.upload(&file_name, &contents).await
    }

    /// Upload the bundled ten-row sample dataset
    pub async fn load_sample(&mut self) -> Result<&Dataset> {
        self.upload(SAMPLE_FILE_NAME, SAMPLE_CSV).await
    }

    /// Past uploads, newest first
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.service.history().await
    }

    async fn history_entry(&self, id: u64) -> Result<HistoryEntry> {
        self.service
            .history()
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or(ChemvizError::HistoryEntryNotFound { id })
    }

    /// Make a past upload the current dataset.
    ///
    /// Entries listed by the remote service carry no rows; the dataset then
    /// holds only the summary, whose extremes are marked unavailable.
    pub async fn load_from_history(&mut self, id: u64) -> Result<&Dataset> {
        let entry = self.history_entry(id).await?;
        Ok(&*self.current.insert(Dataset {
            file_name: entry.file_name,
            records: entry.records,
            summary: entry.summary,
            history_id: Some(entry.id),
        }))
    }

    /// Write a text report for the current dataset
    pub fn report_current(&self, dir: &Path) -> Result<PathBuf> {
        let dataset = self.current.as_ref().ok_or(ChemvizError::NoDataset)?;
        Report::for_dataset(dataset).write_to(dir)
    }

    /// Produce the service's report for a past upload
    pub async fn report_history_entry(&self, id: u64, dir: &Path) -> Result<PathBuf> {
        let entry = self.history_entry(id).await?;
        self.service.report(&entry, dir).await
    }

    /// Forget past uploads (demo sessions only)
    pub async fn clear_history(&mut self) -> Result<()> {
        self.service.clear_history().await
    }

    /// End the session, dropping remembered credentials and local history
    pub async fn logout(mut self, store: &SessionStore) -> Result<()> {
        if self.mode() == SessionMode::Demo {
            self.service.clear_history().await?;
        }
        store.clear()?;
        info!("Logged out {}", self.username);
        Ok(())
    }
}
