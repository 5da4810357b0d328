//! Summary statistics over equipment records.
//!
//! `summarize` is a pure, total reduction: one linear pass for sums and
//! extremes plus a category histogram. An empty input yields the all-zero
//! summary rather than an error.

use crate::models::{EquipmentRecord, ExtremesSource, RemoteSummary, SummaryStatistics};
use std::collections::BTreeMap;

/// Reduce a record set into descriptive statistics
pub fn summarize(records: &[EquipmentRecord]) -> SummaryStatistics {
    let Some(extremes) = Extremes::scan(records) else {
        return SummaryStatistics::empty();
    };

    let count = records.len() as f64;
    let (flow_sum, pressure_sum, temp_sum) = records.iter().fold(
        (0.0, 0.0, 0.0),
        |(flow, pressure, temp), r| (flow + r.flowrate, pressure + r.pressure, temp + r.temperature),
    );

    SummaryStatistics {
        total_count: records.len(),
        average_flowrate: flow_sum / count,
        average_pressure: pressure_sum / count,
        average_temperature: temp_sum / count,
        min_flowrate: extremes.flowrate.0,
        max_flowrate: extremes.flowrate.1,
        min_pressure: extremes.pressure.0,
        max_pressure: extremes.pressure.1,
        min_temperature: extremes.temperature.0,
        max_temperature: extremes.temperature.1,
        type_distribution: type_distribution(records),
        extremes: ExtremesSource::Local,
    }
}

/// Count occurrences of each category label, verbatim
pub fn type_distribution(records: &[EquipmentRecord]) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for record in records {
        *distribution.entry(record.category.clone()).or_insert(0) += 1;
    }
    distribution
}

/// Records matching a case-insensitive search over name or type and an exact
/// type filter. `None` or an empty string disables either condition.
pub fn filter_records<'a>(
    records: &'a [EquipmentRecord],
    search: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a EquipmentRecord> {
    let needle = search.map(str::to_lowercase).unwrap_or_default();
    let category = category.filter(|c| !c.is_empty());

    records
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.name.to_lowercase().contains(&needle)
                || r.category.to_lowercase().contains(&needle)
        })
        .filter(|r| category.is_none_or(|c| r.category == c))
        .collect()
}

/// (min, max) per metric
struct Extremes {
    flowrate: (f64, f64),
    pressure: (f64, f64),
    temperature: (f64, f64),
}

impl Extremes {
    fn scan(records: &[EquipmentRecord]) -> Option<Self> {
        let first = records.first()?;
        let seed = Self {
            flowrate: (first.flowrate, first.flowrate),
            pressure: (first.pressure, first.pressure),
            temperature: (first.temperature, first.temperature),
        };

        Some(records[1..].iter().fold(seed, |acc, r| Self {
            flowrate: widen(acc.flowrate, r.flowrate),
            pressure: widen(acc.pressure, r.pressure),
            temperature: widen(acc.temperature, r.temperature),
        }))
    }
}

fn widen((min, max): (f64, f64), value: f64) -> (f64, f64) {
    (min.min(value), max.max(value))
}

impl SummaryStatistics {
    /// The summary of an empty record set
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            average_flowrate: 0.0,
            average_pressure: 0.0,
            average_temperature: 0.0,
            min_flowrate: 0.0,
            max_flowrate: 0.0,
            min_pressure: 0.0,
            max_pressure: 0.0,
            min_temperature: 0.0,
            max_temperature: 0.0,
            type_distribution: BTreeMap::new(),
            extremes: ExtremesSource::Local,
        }
    }

    /// Build a summary from a remote aggregate.
    ///
    /// The remote service does not report extremes. They are scanned from
    /// `records` when the caller still holds the uploaded rows; otherwise they
    /// stay zero and are marked unavailable.
    pub fn from_remote(remote: &RemoteSummary, records: Option<&[EquipmentRecord]>) -> Self {
        let local = records.and_then(Extremes::scan);
        let extremes = if local.is_some() {
            ExtremesSource::Local
        } else {
            ExtremesSource::Unavailable
        };
        let Extremes {
            flowrate,
            pressure,
            temperature,
        } = local.unwrap_or(Extremes {
            flowrate: (0.0, 0.0),
            pressure: (0.0, 0.0),
            temperature: (0.0, 0.0),
        });

        Self {
            total_count: remote.total_equipment,
            average_flowrate: remote.avg_flowrate,
            average_pressure: remote.avg_pressure,
            average_temperature: remote.avg_temperature,
            min_flowrate: flowrate.0,
            max_flowrate: flowrate.1,
            min_pressure: pressure.0,
            max_pressure: pressure.1,
            min_temperature: temperature.0,
            max_temperature: temperature.1,
            type_distribution: remote.type_distribution.clone(),
            extremes,
        }
    }

    /// Number of distinct categories
    pub fn type_count(&self) -> usize {
        self.type_distribution.len()
    }

    /// Whether min/max values describe real data
    pub fn has_extremes(&self) -> bool {
        self.extremes == ExtremesSource::Local
    }

    /// Histogram ordered by count (descending), then label
    pub fn categories_by_count(&self) -> Vec<(&str, usize)> {
        let mut categories: Vec<(&str, usize)> = self
            .type_distribution
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        categories
    }
}
