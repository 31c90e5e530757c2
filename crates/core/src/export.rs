//! Report export in the two supported formats.
//!
//! CSV is a fixed four-column layout (`Type,Value,Date,Status`) written by
//! hand; JSON is the pretty-printed report.

use serde::Serialize;

use crate::error::CoreError;

pub const CSV_HEADER: &str = "Type,Value,Date,Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Missing format defaults to JSON.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            Some(other) => Err(CoreError::Validation(format!(
                "Unknown export format '{other}'. Allowed: json, csv"
            ))),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// One line of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub kind: String,
    pub value: String,
    pub date: String,
    pub status: String,
}

/// Quote a field when it contains a comma, quote, or line break.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn to_csv(rows: &[ReportRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let line = [&row.kind, &row.value, &row.date, &row.status]
            .iter()
            .map(|f| csv_escape(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize export: {e}")))
}

/// `rapport-<date>.<ext>`
pub fn export_file_name(format: ExportFormat, date: chrono::NaiveDate) -> String {
    format!("rapport-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, value: &str, status: &str) -> ReportRow {
        ReportRow {
            kind: kind.into(),
            value: value.into(),
            date: "2024-03-01".into(),
            status: status.into(),
        }
    }

    #[test]
    fn csv_has_fixed_header_and_one_line_per_row() {
        let csv = to_csv(&[row("contract", "1000.00", "active"), row("market", "50", "draft")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Type,Value,Date,Status");
        assert_eq!(lines[1], "contract,1000.00,2024-03-01,active");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn csv_quotes_commas_and_quotes() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn empty_csv_is_just_the_header() {
        assert_eq!(to_csv(&[]), "Type,Value,Date,Status\n");
    }

    #[test]
    fn format_parsing() {
        assert_eq!(ExportFormat::parse(None).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("CSV")).unwrap(), ExportFormat::Csv);
        assert!(ExportFormat::parse(Some("xlsx")).is_err());
    }

    #[test]
    fn json_is_pretty_printed() {
        let json = to_pretty_json(&row("contract", "1", "active")).unwrap();
        assert!(json.contains("\n  \"kind\": \"contract\""));
    }

    #[test]
    fn file_name_uses_date_and_extension() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(export_file_name(ExportFormat::Csv, date), "rapport-2024-03-01.csv");
    }
}
