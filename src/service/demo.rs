//! Offline dataset service used when the remote API is unreachable.

use super::{DatasetService, UploadOutcome};
use crate::config::AppConfig;
use crate::error::Result;
use crate::history::LocalHistory;
use crate::models::{EquipmentRecord, HistoryEntry, SessionMode};
use crate::report::Report;
use crate::summary::summarize;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct DemoService {
    history: LocalHistory,
}

impl DemoService {
    /// Open the demo service with its history file under the state directory
    pub fn open(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            history: LocalHistory::open(&config.demo_history_file(), config.history_limit)?,
        })
    }

    /// Demo service whose history lives only as long as the value
    pub fn in_memory(history_limit: usize) -> Self {
        Self {
            history: LocalHistory::new(history_limit),
        }
    }
}

#[async_trait]
impl DatasetService for DemoService {
    fn mode(&self) -> SessionMode {
        SessionMode::Demo
    }

    async fn upload(
        &mut self,
        file_name: &str,
        _contents: &str,
        records: &[EquipmentRecord],
    ) -> Result<UploadOutcome> {
        let summary = summarize(records);
        let entry = self
            .history
            .push(file_name, records.to_vec(), summary.clone())?;

        info!(
            "Stored {} locally as history entry {} ({} records)",
            file_name, entry.id, entry.record_count
        );

        Ok(UploadOutcome {
            summary,
            history_id: Some(entry.id),
        })
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.entries().to_vec())
    }

    async fn report(&self, entry: &HistoryEntry, dir: &Path) -> Result<PathBuf> {
        Report::for_history_entry(entry).write_to(dir)
    }

    async fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }
}
