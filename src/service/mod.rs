//! Dataset services: where uploads are summarised, stored and reported.
//!
//! A session picks one implementation when it is created:
//! - [`DemoService`] works entirely offline, summarising locally and keeping a
//!   bounded history on disk
//! - [`RemoteService`] delegates storage, aggregation and PDF reports to the
//!   remote dataset API
//!
//! Both receive the already-parsed rows so extremes can be computed locally
//! whatever the backend reports.

pub mod demo;
pub mod remote;

#[cfg(test)]
mod tests;

pub use demo::DemoService;
pub use remote::{CredentialCheck, RemoteService};

use crate::error::Result;
use crate::models::{EquipmentRecord, HistoryEntry, SessionMode, SummaryStatistics};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// What a service reports back for an accepted upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub summary: SummaryStatistics,
    /// Id of the stored history entry, when the service exposes one
    pub history_id: Option<u64>,
}

#[async_trait]
pub trait DatasetService: Send + Sync {
    /// Which backend this is
    fn mode(&self) -> SessionMode;

    /// Store an upload and summarise it.
    ///
    /// `contents` is the raw file text; `records` is its parsed form.
    async fn upload(
        &mut self,
        file_name: &str,
        contents: &str,
        records: &[EquipmentRecord],
    ) -> Result<UploadOutcome>;

    /// Past uploads, newest first
    async fn history(&self) -> Result<Vec<HistoryEntry>>;

    /// Produce the report for a past upload inside `dir`
    async fn report(&self, entry: &HistoryEntry, dir: &Path) -> Result<PathBuf>;

    /// Forget past uploads
    async fn clear_history(&mut self) -> Result<()>;
}
