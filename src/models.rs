//! Core data structures for equipment datasets.
//!
//! Defines parsed equipment rows, derived summary statistics, the wire shapes
//! exchanged with the remote dataset service, and upload history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of uploaded equipment data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub name: String,
    pub category: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Where the min/max values of a summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremesSource {
    /// Scanned from the records the summary describes
    Local,
    /// Summary came from the remote service without its rows; extremes are zero
    Unavailable,
}

/// Descriptive statistics over one set of equipment records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_count: usize,
    pub average_flowrate: f64,
    pub average_pressure: f64,
    pub average_temperature: f64,
    pub min_flowrate: f64,
    pub max_flowrate: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Occurrences per category label, keyed verbatim
    pub type_distribution: BTreeMap<String, usize>,
    pub extremes: ExtremesSource,
}

/// Aggregate returned by the remote service (no extremes, no rows)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSummary {
    pub total_equipment: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub type_distribution: BTreeMap<String, usize>,
}

/// Body of a successful remote upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub summary: RemoteSummary,
}

/// One item of the remote history listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDataset {
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub summary: RemoteSummary,
}

/// A past upload as seen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub record_count: usize,
    pub summary: SummaryStatistics,
    /// Original rows; empty when the entry came from the remote listing
    #[serde(default)]
    pub records: Vec<EquipmentRecord>,
}

impl HistoryEntry {
    /// Whether the original rows are held alongside the summary
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}

impl From<RemoteDataset> for HistoryEntry {
    fn from(remote: RemoteDataset) -> Self {
        Self {
            id: remote.id,
            file_name: remote.filename,
            uploaded_at: remote.uploaded_at,
            record_count: remote.summary.total_equipment,
            summary: SummaryStatistics::from_remote(&remote.summary, None),
            records: Vec::new(),
        }
    }
}

/// The dataset currently loaded in a session
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub file_name: String,
    pub records: Vec<EquipmentRecord>,
    pub summary: SummaryStatistics,
    /// History id assigned by the service that stored the upload
    pub history_id: Option<u64>,
}

/// Which backend a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Demo,
    Connected,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Demo => write!(f, "demo"),
            SessionMode::Connected => write!(f, "connected"),
        }
    }
}
