use std::io::Write;

use collision_estimator::{DomainError, ProbabilityResult};
use serde::Serialize;

use crate::error::Error;

/// Output format for calculation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Machine-readable form of a calculation. Result fields are absent when the
/// calculation produced no result.
#[derive(Debug, Serialize)]
pub struct Report {
    pub buckets: String,
    pub hashes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn new(
        buckets: String,
        hashes: String,
        result: &Result<ProbabilityResult, DomainError>,
    ) -> Self {
        match result {
            Ok(result) => Self {
                buckets,
                hashes,
                probability: Some(result.to_f64()),
                display: Some(result.to_string()),
                exact: Some(result.exact),
                method: Some(result.method.as_str()),
                value: Some(result.value.to_string()),
                error: None,
            },
            Err(e) => Self {
                buckets,
                hashes,
                probability: None,
                display: None,
                exact: None,
                method: None,
                value: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// The text line shown for a result, `-` when there is none.
pub fn render_text(result: &Result<ProbabilityResult, DomainError>) -> String {
    match result {
        Ok(result) => format!("Collision probability: {result}"),
        Err(_) => "Collision probability: -".to_string(),
    }
}

/// Process exit status for a one-shot calculation: 2 when an input exceeds the
/// representable range, 0 otherwise (invalid input only means "no result").
pub fn exit_code(result: &Result<ProbabilityResult, DomainError>) -> u8 {
    match result {
        Err(DomainError::Overflow { .. }) => 2,
        _ => 0,
    }
}

/// Writes a result in the requested format. Errors are reported on stderr in text mode
/// and inside the JSON object otherwise.
pub fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    report: &Report,
    result: &Result<ProbabilityResult, DomainError>,
    raw: bool,
) -> Result<(), Error> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", render_text(result))?;
            match result {
                Ok(result) if raw => writeln!(out, "Value: {}", result.value)?,
                Ok(_) => {}
                Err(e) => eprintln!("No result: {e}"),
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
