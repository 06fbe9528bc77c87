//! Output formatting and persistence for computed results.
//!
//! Supports pretty-printing, JSON serialization, and CSV append of
//! prediction history.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::grade::Grade;
use crate::predict::types::{MeanOrigin, PredictionResult, PredictionSource};
use csv::WriterBuilder;
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;

/// One row of the prediction history CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub course_code: Option<String>,
    pub overall_score: f64,
    pub class_mean: f64,
    pub class_sd: f64,
    pub provisional_grade: Grade,
    pub letter_grade: Grade,
    pub source: PredictionSource,
    pub mean_origin: MeanOrigin,
    pub progress: f64,
}

impl PredictionRecord {
    pub fn from_result(result: &PredictionResult, progress: f64) -> Self {
        PredictionRecord {
            timestamp: Utc::now(),
            course_code: None,
            overall_score: result.overall_score,
            class_mean: result.class_mean,
            class_sd: result.class_sd,
            provisional_grade: result.provisional_grade,
            letter_grade: result.letter_grade,
            source: result.source,
            mean_origin: result.mean_origin,
            progress,
        }
    }

    /// Set the course the prediction was made for.
    pub fn with_course(mut self, course_code: &str) -> Self {
        self.course_code = Some(course_code.to_string());
        self
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`PredictionRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &PredictionRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
