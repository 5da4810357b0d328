//! Terminal rendering of summaries, record tables and history listings.

use crate::constants::{FLOWRATE_UNIT, PRESSURE_UNIT, TEMPERATURE_UNIT};
use crate::models::{EquipmentRecord, HistoryEntry, SummaryStatistics};
use chrono::Utc;
use colored::*;
use std::fmt::Write as _;

/// Summary block: counts, averages, ranges and the type histogram
pub fn format_summary(title: &str, summary: &SummaryStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title.bright_green().bold());
    let _ = writeln!(
        out,
        "  {} {}",
        "Total equipment:".bright_cyan(),
        summary.total_count.to_string().bright_white().bold()
    );
    let _ = writeln!(
        out,
        "  {} {}",
        "Equipment types:".bright_cyan(),
        summary.type_count().to_string().bright_white()
    );

    let _ = writeln!(out, "\n{}", "Averages".bright_yellow());
    for (label, value, unit) in [
        ("Flowrate:", summary.average_flowrate, FLOWRATE_UNIT),
        ("Pressure:", summary.average_pressure, PRESSURE_UNIT),
        ("Temperature:", summary.average_temperature, TEMPERATURE_UNIT),
    ] {
        let _ = writeln!(out, "  {:<13} {:>10.2} {}", label.bright_cyan(), value, unit);
    }

    let _ = writeln!(out, "\n{}", "Ranges".bright_yellow());
    if summary.has_extremes() {
        for (label, min, max, unit) in [
            (
                "Flowrate:",
                summary.min_flowrate,
                summary.max_flowrate,
                FLOWRATE_UNIT,
            ),
            (
                "Pressure:",
                summary.min_pressure,
                summary.max_pressure,
                PRESSURE_UNIT,
            ),
            (
                "Temperature:",
                summary.min_temperature,
                summary.max_temperature,
                TEMPERATURE_UNIT,
            ),
        ] {
            let _ = writeln!(out, "  {:<13} {} - {} {}", label.bright_cyan(), min, max, unit);
        }
    } else {
        let _ = writeln!(
            out,
            "  {}",
            "not available (rows are held by the remote service)".bright_black()
        );
    }

    let _ = writeln!(out, "\n{}", "Type distribution".bright_yellow());
    for (category, count) in summary.categories_by_count() {
        let label = if category.is_empty() {
            "(blank)"
        } else {
            category
        };
        let _ = writeln!(
            out,
            "  {:<20} {}",
            label.bright_cyan(),
            count.to_string().bright_white()
        );
    }

    out
}

/// Aligned table of records
pub fn format_records(records: &[&EquipmentRecord]) -> String {
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Equipment Name".len());
    let type_width = records
        .iter()
        .map(|r| r.category.chars().count())
        .max()
        .unwrap_or(0)
        .max("Type".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<type_width$}  {:>10}  {:>10}  {:>12}",
        "Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"
    );
    let _ = writeln!(
        out,
        "{}",
        "-".repeat(name_width + type_width + 10 + 10 + 12 + 8)
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<type_width$}  {:>10}  {:>10}  {:>12}",
            r.name, r.category, r.flowrate, r.pressure, r.temperature
        );
    }
    out
}

/// One line per history entry, newest first
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", "No upload history".bright_black());
    }

    let now = Utc::now();
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "  {} {} {} {}{}",
            format!("#{}", entry.id).bright_yellow().bold(),
            entry.file_name.bright_cyan(),
            format!("({} records)", entry.record_count).bright_white(),
            format_age(now.signed_duration_since(entry.uploaded_at)).bright_black(),
            if entry.has_records() {
                ""
            } else {
                " [summary only]"
            }
        );
    }
    out
}

/// Rough "time ago" label
pub fn format_age(age: chrono::Duration) -> String {
    let seconds = age.num_seconds().max(0);
    match seconds {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{} min ago", seconds / 60),
        3600..=86_399 => format!("{} h ago", seconds / 3600),
        _ => format!("{} days ago", seconds / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAMPLE_CSV;
    use crate::models::RemoteSummary;
    use crate::parser::parse_csv;
    use crate::summary::summarize;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_summary() {
        colored::control::set_override(false);
        let summary = summarize(&parse_csv(SAMPLE_CSV));
        let text = format_summary("Summary", &summary);

        assert!(text.contains("Total equipment: 10"));
        assert!(text.contains("Equipment types: 5"));
        assert!(text.contains("153.00 m³/h"));
        assert!(text.contains("90 - 210 m³/h"));
        assert!(text.contains("Heat Exchanger"));
    }

    #[test]
    fn test_format_summary_without_extremes() {
        colored::control::set_override(false);
        let remote = RemoteSummary {
            total_equipment: 1,
            avg_flowrate: 1.0,
            avg_pressure: 1.0,
            avg_temperature: 1.0,
            type_distribution: BTreeMap::from([(String::new(), 1)]),
        };
        let text = format_summary("Summary", &SummaryStatistics::from_remote(&remote, None));

        assert!(text.contains("not available"));
        assert!(text.contains("(blank)"));
    }

    #[test]
    fn test_format_records_alignment() {
        let records = parse_csv(SAMPLE_CSV);
        let rows: Vec<&EquipmentRecord> = records.iter().collect();
        let table = format_records(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("Equipment Name"));
        assert!(lines[5].starts_with("Reactor 2 "));
        assert!(lines[5].contains("210"));
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(chrono::Duration::seconds(5)), "just now");
        assert_eq!(format_age(chrono::Duration::minutes(3)), "3 min ago");
        assert_eq!(format_age(chrono::Duration::hours(5)), "5 h ago");
        assert_eq!(format_age(chrono::Duration::days(2)), "2 days ago");
        assert_eq!(format_age(chrono::Duration::seconds(-10)), "just now");
    }

    #[test]
    fn test_format_empty_history() {
        colored::control::set_override(false);
        assert_eq!(format_history(&[]), "No upload history\n");
    }
}
