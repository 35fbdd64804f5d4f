//! Report model
//!
//! A report is an insertion-ordered list of label/value entries produced by
//! the report controller, plus the renderings used by export collaborators:
//! a plain-text summary and a two-column CSV.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Header row of CSV exports
pub const CSV_HEADER: &str = "key,value";

/// Scalar value stored in a report entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    Count(i64),
    Text(String),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Count(n) => write!(f, "{}", n),
            ReportValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ReportValue {
    fn from(n: i64) -> Self {
        ReportValue::Count(n)
    }
}

impl From<usize> for ReportValue {
    fn from(n: usize) -> Self {
        ReportValue::Count(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ReportValue {
    fn from(s: &str) -> Self {
        ReportValue::Text(s.to_string())
    }
}

impl From<String> for ReportValue {
    fn from(s: String) -> Self {
        ReportValue::Text(s)
    }
}

/// A single labelled report value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub key: String,
    pub value: ReportValue,
}

/// Export rendering requested from the report controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    #[default]
    Summary,
}

impl From<&str> for ExportFormat {
    /// `"CSV"` (any case) selects CSV; anything else the plain summary.
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Summary
        }
    }
}

/// Generated report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Unique identifier
    pub id: Uuid,
    /// Report type label
    pub report_type: String,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create an empty report of the given type
    pub fn new(report_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            report_type: report_type.into(),
            generated_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Append an entry, or replace the value of an existing key in place.
    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<ReportValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(ReportEntry { key, value }),
        }
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    /// Plain-text summary
    pub fn generate_summary(&self) -> String {
        let mut out = format!(
            "=== REPORT: {} ===\nGenerated: {}\n\n",
            self.report_type,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for entry in &self.entries {
            out.push_str(&format!("{}: {}\n", entry.key, entry.value));
        }
        out
    }

    /// Two-column CSV with a `key,value` header; every line ends in `\n`
    pub fn export_to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&csv_field(&entry.key));
            out.push(',');
            out.push_str(&csv_field(&entry.value.to_string()));
            out.push('\n');
        }
        out
    }

    /// JSON object of the entries, in insertion order
    pub fn to_json(&self) -> serde_json::Value {
        let data: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|e| {
                let value = serde_json::to_value(&e.value).unwrap_or(serde_json::Value::Null);
                (e.key.clone(), value)
            })
            .collect();

        serde_json::json!({
            "id": self.id,
            "report_type": self.report_type,
            "generated_at": self.generated_at,
            "data": data,
        })
    }
}

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
