//! Bounded upload history kept on the local machine.
//!
//! Used by demo sessions, which have no server to list past uploads. Entries
//! are held newest first and the oldest are dropped once the limit is
//! reached. The whole list is persisted as one JSON file.

use crate::error::Result;
use crate::models::{EquipmentRecord, HistoryEntry, SummaryStatistics};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalHistory {
    limit: usize,
    entries: Vec<HistoryEntry>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl LocalHistory {
    /// Create an in-memory history
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::new(),
            path: None,
        }
    }

    /// Open a history backed by `path`.
    ///
    /// Starts empty if the file is absent or cannot be decoded; a damaged
    /// cache is overwritten by the next save.
    pub fn open(path: &Path, limit: usize) -> Result<Self> {
        let mut history = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            match serde_json::from_str::<LocalHistory>(&text) {
                Ok(mut loaded) => {
                    loaded.limit = limit;
                    loaded.entries.truncate(limit);
                    loaded
                }
                Err(e) => {
                    warn!(
                        "Ignoring unreadable history cache {}: {}",
                        path.display(),
                        e
                    );
                    Self::new(limit)
                }
            }
        } else {
            Self::new(limit)
        };

        debug!(
            "Opened local history at {} ({} entries)",
            path.display(),
            history.entries.len()
        );
        history.path = Some(path.to_path_buf());
        Ok(history)
    }

    /// Record a new upload at the front, evicting beyond the limit
    pub fn push(
        &mut self,
        file_name: impl Into<String>,
        records: Vec<EquipmentRecord>,
        summary: SummaryStatistics,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: self.next_id(),
            file_name: file_name.into(),
            uploaded_at: Utc::now(),
            record_count: records.len(),
            summary,
            records,
        };

        self.entries.insert(0, entry.clone());
        self.entries.truncate(self.limit);
        self.save()?;
        Ok(entry)
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Drop every entry and persist the empty list
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    fn next_id(&self) -> u64 {
        self.entries.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
