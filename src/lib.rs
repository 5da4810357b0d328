//! chemviz Library
//!
//! Tools for summarising chemical equipment parameter datasets uploaded as
//! CSV files.
//!
//! This library provides:
//! - A lenient CSV parser for equipment rows (name, type, flowrate, pressure,
//!   temperature)
//! - Summary statistics: counts, means, min/max per metric and a type histogram
//! - Sessions that log in against a remote dataset API or fall back to an
//!   offline demo mode
//! - Bounded upload history and plain-text reports

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod models;
pub mod parser;
pub mod report;
pub mod service;
pub mod session;
pub mod summary;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ChemvizError, Result};
pub use models::{Dataset, EquipmentRecord, ExtremesSource, HistoryEntry, SummaryStatistics};
pub use parser::parse_csv;
pub use session::{Session, SessionStore};
pub use summary::summarize;
