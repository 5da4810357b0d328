//! Plain-text analysis reports.
//!
//! A report covers one summary and, when the rows are held, a listing of
//! every record. Summaries whose extremes are unavailable print `n/a` for the
//! ranges.

use crate::constants::{FLOWRATE_UNIT, PRESSURE_UNIT, TEMPERATURE_UNIT};
use crate::error::Result;
use crate::models::{Dataset, EquipmentRecord, HistoryEntry, SummaryStatistics};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a report is rendered from
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: Option<ReportSource<'a>>,
    pub summary: &'a SummaryStatistics,
    pub records: &'a [EquipmentRecord],
}

/// Upload the report describes, when known
#[derive(Debug, Clone)]
pub struct ReportSource<'a> {
    pub file_name: &'a str,
    pub uploaded_at: DateTime<Utc>,
}

impl<'a> Report<'a> {
    /// Report over the dataset currently loaded in a session
    pub fn for_dataset(dataset: &'a Dataset) -> Self {
        Self {
            generated_at: Utc::now(),
            source: None,
            summary: &dataset.summary,
            records: &dataset.records,
        }
    }

    /// Report over a past upload
    pub fn for_history_entry(entry: &'a HistoryEntry) -> Self {
        Self {
            generated_at: Utc::now(),
            source: Some(ReportSource {
                file_name: &entry.file_name,
                uploaded_at: entry.uploaded_at,
            }),
            summary: &entry.summary,
            records: &entry.records,
        }
    }

    /// File name the report is saved under
    pub fn file_name(&self) -> String {
        match &self.source {
            Some(source) => format!("{}_report.txt", file_stem(source.file_name)),
            None => format!(
                "equipment-report-{}.txt",
                self.generated_at.timestamp_millis()
            ),
        }
    }

    pub fn render(&self) -> String {
        let s = self.summary;
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "CHEMICAL EQUIPMENT ANALYSIS REPORT");
        let _ = writeln!(out, "==================================");
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if let Some(source) = &self.source {
            let _ = writeln!(out, "File: {}", source.file_name);
            let _ = writeln!(
                out,
                "Uploaded: {}",
                source.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }

        section(&mut out, "SUMMARY STATISTICS");
        let _ = writeln!(out, "Total Equipment: {}", s.total_count);
        let _ = writeln!(out, "Equipment Types: {}", s.type_count());

        section(&mut out, "AVERAGES");
        let _ = writeln!(
            out,
            "Average Flowrate: {:.2} {FLOWRATE_UNIT}",
            s.average_flowrate
        );
        let _ = writeln!(
            out,
            "Average Pressure: {:.2} {PRESSURE_UNIT}",
            s.average_pressure
        );
        let _ = writeln!(
            out,
            "Average Temperature: {:.2} {TEMPERATURE_UNIT}",
            s.average_temperature
        );

        section(&mut out, "RANGES");
        let ranges = [
            ("Flowrate", s.min_flowrate, s.max_flowrate, FLOWRATE_UNIT),
            ("Pressure", s.min_pressure, s.max_pressure, PRESSURE_UNIT),
            (
                "Temperature",
                s.min_temperature,
                s.max_temperature,
                TEMPERATURE_UNIT,
            ),
        ];
        for (label, min, max, unit) in ranges {
            if s.has_extremes() {
                let _ = writeln!(out, "{label}: {min} - {max} {unit}");
            } else {
                let _ = writeln!(out, "{label}: n/a");
            }
        }

        section(&mut out, "TYPE DISTRIBUTION");
        for (category, count) in s.categories_by_count() {
            let _ = writeln!(out, "{category}: {count} units");
        }

        if !self.records.is_empty() {
            section(&mut out, "EQUIPMENT DETAILS");
            for r in self.records {
                let _ = writeln!(
                    out,
                    "{} ({}): Flow={}, Pressure={}, Temp={}",
                    r.name, r.category, r.flowrate, r.pressure, r.temperature
                );
            }
        }

        out
    }

    /// Render and write the report into `dir`, returning the written path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render())?;
        info!("Wrote report to {}", path.display());
        Ok(path)
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

/// File name with a trailing `.csv` removed
pub fn file_stem(file_name: &str) -> &str {
    file_name.strip_suffix(".csv").unwrap_or(file_name)
}
