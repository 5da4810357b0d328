//! Equipment CSV parsing.
//!
//! The format is deliberately naive: rows are split on newlines and cells on
//! commas, with no support for quoted fields, escaped commas or embedded
//! newlines. A comma inside a quoted value shifts every following cell.
//! Malformed cells never fail the parse; they degrade to empty text or zero.

use crate::constants::{
    COLUMN_FLOWRATE, COLUMN_NAME, COLUMN_PRESSURE, COLUMN_TEMPERATURE, COLUMN_TYPE,
    EXPECTED_COLUMNS,
};
use crate::error::{ChemvizError, Result};
use crate::models::EquipmentRecord;
use std::path::Path;
use tracing::debug;

/// Positions of the expected labels within a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub category: Option<usize>,
    pub flowrate: Option<usize>,
    pub pressure: Option<usize>,
    pub temperature: Option<usize>,
}

impl ColumnMap {
    /// Resolve column positions from a raw header line.
    ///
    /// Labels are trimmed and matched exactly; the first occurrence wins.
    pub fn from_header(line: &str) -> Self {
        let labels: Vec<&str> = line.split(',').map(str::trim).collect();
        let position = |label: &str| labels.iter().position(|l| *l == label);

        Self {
            name: position(COLUMN_NAME),
            category: position(COLUMN_TYPE),
            flowrate: position(COLUMN_FLOWRATE),
            pressure: position(COLUMN_PRESSURE),
            temperature: position(COLUMN_TEMPERATURE),
        }
    }

    /// Expected labels absent from the header
    pub fn missing_columns(&self) -> Vec<&'static str> {
        let found = [
            self.name,
            self.category,
            self.flowrate,
            self.pressure,
            self.temperature,
        ];
        EXPECTED_COLUMNS
            .iter()
            .zip(found)
            .filter(|(_, index)| index.is_none())
            .map(|(label, _)| *label)
            .collect()
    }

    fn record(&self, line: &str) -> EquipmentRecord {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |index: Option<usize>| index.and_then(|i| cells.get(i).copied());

        EquipmentRecord {
            name: text_cell(cell(self.name)),
            category: text_cell(cell(self.category)),
            flowrate: numeric_cell(cell(self.flowrate)),
            pressure: numeric_cell(cell(self.pressure)),
            temperature: numeric_cell(cell(self.temperature)),
        }
    }
}

/// Parse CSV text into equipment records, one per data row.
///
/// The first line is the header and is never emitted. Surrounding whitespace
/// of the whole input is trimmed first so trailing blank lines yield nothing.
pub fn parse_csv(text: &str) -> Vec<EquipmentRecord> {
    parse_with_columns(text).1
}

/// Parse CSV text and also return the resolved header layout
pub fn parse_with_columns(text: &str) -> (ColumnMap, Vec<EquipmentRecord>) {
    let mut lines = text.trim().split('\n');

    let columns = match lines.next() {
        Some(header) if !header.trim().is_empty() => ColumnMap::from_header(header),
        _ => return (ColumnMap::default(), Vec::new()),
    };

    let records: Vec<EquipmentRecord> = lines.map(|line| columns.record(line)).collect();

    debug!(
        "Parsed {} records (missing columns: {:?})",
        records.len(),
        columns.missing_columns()
    );

    (columns, records)
}

/// Read a CSV file from disk and parse it
pub fn parse_csv_file(path: &Path) -> Result<Vec<EquipmentRecord>> {
    if !path.exists() {
        return Err(ChemvizError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    Ok(parse_csv(&text))
}

fn text_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Coerce a cell to f64; anything that is not a usable finite number becomes zero.
///
/// Only the leading numeric part is read, so unit suffixes such as `8.5 bar`
/// keep their value.
fn numeric_cell(value: Option<&str>) -> f64 {
    value
        .and_then(leading_number)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix of the form `[+-]digits[.digits][e[+-]digits]`, parsed
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAMPLE_CSV;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature";

    #[test]
    fn test_parse_single_row() {
        let text = format!("{HEADER}\nPump A,Pump,120,8.5,320");
        let records = parse_csv(&text);

        assert_eq!(
            records,
            vec![EquipmentRecord {
                name: "Pump A".to_string(),
                category: "Pump".to_string(),
                flowrate: 120.0,
                pressure: 8.5,
                temperature: 320.0,
            }]
        );
    }

    #[test]
    fn test_non_numeric_cells_become_zero() {
        let text = format!("{HEADER}\nPump A,Pump,abc,,NaN");
        let records = parse_csv(&text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].flowrate, 0.0);
        assert_eq!(records[0].pressure, 0.0);
        assert_eq!(records[0].temperature, 0.0);
    }

    #[test]
    fn test_infinite_values_become_zero() {
        let text = format!("{HEADER}\nP,Pump,inf,-inf,infinity\nQ,Pump,Infinity,1e400,10");
        let records = parse_csv(&text);

        for record in &records {
            assert!(record.flowrate.is_finite());
            assert!(record.pressure.is_finite());
            assert!(record.temperature.is_finite());
        }
        assert_eq!(records[0].flowrate, 0.0);
        assert_eq!(records[0].pressure, 0.0);
        assert_eq!(records[0].temperature, 0.0);
        assert_eq!(records[1].flowrate, 0.0);
        assert_eq!(records[1].pressure, 0.0);
        assert_eq!(records[1].temperature, 10.0);
    }

    #[test]
    fn test_unit_suffixes_keep_leading_number() {
        let text = format!("{HEADER}\nPump A,Pump,120m3/h,8.5 bar,-3.5e2K");
        let records = parse_csv(&text);

        assert_eq!(records[0].flowrate, 120.0);
        assert_eq!(records[0].pressure, 8.5);
        assert_eq!(records[0].temperature, -350.0);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("+7x"), Some(7.0));
        assert_eq!(leading_number("2e"), Some(2.0));
        assert_eq!(leading_number("2e+x"), Some(2.0));
        assert_eq!(leading_number("1.5E3 units"), Some(1500.0));
    }

    #[test]
    fn test_header_order_and_whitespace() {
        let text = " Temperature , Flowrate ,Equipment Name,Type , Pressure\n\
                    300 , 90 , Mixer 1 , Mixer , 5.0\n";
        let records = parse_csv(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Mixer 1");
        assert_eq!(records[0].category, "Mixer");
        assert_eq!(records[0].flowrate, 90.0);
        assert_eq!(records[0].pressure, 5.0);
        assert_eq!(records[0].temperature, 300.0);
    }

    #[test]
    fn test_missing_columns_default() {
        let text = "Equipment Name,Flowrate\nPump A,120";
        let (columns, records) = parse_with_columns(text);

        assert_eq!(
            columns.missing_columns(),
            vec![COLUMN_TYPE, COLUMN_PRESSURE, COLUMN_TEMPERATURE]
        );
        assert_eq!(records[0].name, "Pump A");
        assert_eq!(records[0].category, "");
        assert_eq!(records[0].flowrate, 120.0);
        assert_eq!(records[0].pressure, 0.0);
        assert_eq!(records[0].temperature, 0.0);
    }

    #[test]
    fn test_short_rows_default() {
        let text = format!("{HEADER}\nPump A,Pump");
        let records = parse_csv(&text);

        assert_eq!(records[0].category, "Pump");
        assert_eq!(records[0].flowrate, 0.0);
        assert_eq!(records[0].temperature, 0.0);
    }

    #[test]
    fn test_trailing_blank_lines_ignored() {
        let text = format!("{HEADER}\nPump A,Pump,120,8.5,320\n\n\n");
        assert_eq!(parse_csv(&text).len(), 1);
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("   \n  ").is_empty());
        assert!(parse_csv(HEADER).is_empty());
    }

    #[test]
    fn test_quoted_comma_misaligns_columns() {
        let text = format!("{HEADER}\n\"Pump, big\",Pump,120,8.5,320");
        let records = parse_csv(&text);

        assert_eq!(records[0].name, "\"Pump");
        assert_eq!(records[0].category, "big\"");
        assert_eq!(records[0].flowrate, 0.0);
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let text = "Type,Type,Flowrate\nPump,Mixer,10";
        let records = parse_csv(text);
        assert_eq!(records[0].category, "Pump");
    }

    #[test]
    fn test_carriage_returns_trimmed() {
        let text = format!("{HEADER}\r\nPump A,Pump,120,8.5,320\r\n");
        let records = parse_csv(&text);
        assert_eq!(records[0].temperature, 320.0);
    }

    #[test]
    fn test_sample_dataset_preserves_order() {
        let records = parse_csv(SAMPLE_CSV);
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].name, "Pump A");
        assert_eq!(records[9].name, "Mixer 2");
    }

    #[test]
    fn test_parse_csv_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{HEADER}").unwrap();
        writeln!(temp_file, "Reactor 1,Reactor,200,15.0,450").unwrap();

        let records = parse_csv_file(temp_file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Reactor");
    }

    #[test]
    fn test_parse_csv_file_missing() {
        let result = parse_csv_file(Path::new("/nonexistent/equipment.csv"));
        assert!(matches!(result, Err(ChemvizError::FileNotFound { .. })));
    }
}
