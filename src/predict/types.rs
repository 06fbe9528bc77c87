//! Result types of the prediction pipeline.

use serde::Serialize;
use std::fmt;

use crate::grade::Grade;

/// Which computation path produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionSource {
    /// Class mean from component averages or the mean model, SD and grade
    /// from the models.
    #[serde(rename = "ML")]
    Ml,
    /// Manual class average and SD, z-score bands.
    ManualZ,
    /// Manual class average, SD and grade from the models.
    ManualAvgPlusMl,
    /// Manual class SD, mean and grade from the models.
    ManualSdPlusMl,
    /// Fixed lab scale.
    LabRule,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PredictionSource::Ml => "ML",
            PredictionSource::ManualZ => "Manual (Z-score)",
            PredictionSource::ManualAvgPlusMl => "ManualAvg + ML",
            PredictionSource::ManualSdPlusMl => "ManualSD + ML",
            PredictionSource::LabRule => "Lab Rule-based",
        })
    }
}

/// Where the class mean came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanOrigin {
    Manual,
    /// Weighted score of the supplied component averages.
    ComponentAverages,
    Model,
    /// Lab courses: the mean is the student's own total.
    OwnScore,
}

/// Lab courses end in `P` or `E`; everything else is graded as theory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseKind {
    Theory,
    Lab,
}

impl CourseKind {
    pub fn from_code(course_code: &str) -> Self {
        let code = course_code.trim();
        if code.ends_with('P') || code.ends_with('E') {
            CourseKind::Lab
        } else {
            CourseKind::Theory
        }
    }
}

/// Final output of a grade prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub overall_score: f64,
    pub class_mean: f64,
    pub class_sd: f64,
    /// Grade before the hard rules ran.
    pub provisional_grade: Grade,
    pub letter_grade: Grade,
    pub source: PredictionSource,
    pub mean_origin: MeanOrigin,
}
