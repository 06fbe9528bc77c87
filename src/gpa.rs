//! Semester GPA over a list of course entries.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EngineError, check_range};
use crate::grade::CourseGrade;

/// One selected course and the grade entered for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseEntry {
    pub course_code: String,
    pub credits: f64,
    pub grade: CourseGrade,
}

impl CourseEntry {
    /// Validates `credits` against `[0, credit_cap]` and `grade` against the
    /// grade set selected by `is_non_graded`.
    pub fn new(
        course_code: impl Into<String>,
        credits: f64,
        grade: &str,
        is_non_graded: bool,
        credit_cap: f64,
    ) -> Result<Self, EngineError> {
        let credits = check_range("credits", credits, 0.0, credit_cap)?;
        Ok(Self {
            course_code: course_code.into(),
            credits,
            grade: CourseGrade::parse(grade, is_non_graded)?,
        })
    }

    /// Builds an entry whose grade is forced into the right grade set:
    /// a mismatched grade becomes `P` (non-graded) or `S` (graded).
    pub fn relabeled(
        course_code: impl Into<String>,
        credits: f64,
        grade: &str,
        is_non_graded: bool,
    ) -> Self {
        Self {
            course_code: course_code.into(),
            credits,
            grade: CourseGrade::parse_or_default(grade, is_non_graded),
        }
    }

    pub fn is_non_graded(&self) -> bool {
        self.grade.is_non_graded()
    }
}

/// Reduces `entries` to `(gpa, gpa_credits)`.
///
/// Non-graded entries never contribute. With no graded credits the result is
/// `(0.0, 0.0)`. No rounding is applied.
pub fn compute_gpa(entries: &[CourseEntry]) -> (f64, f64) {
    let mut weighted = 0.0;
    let mut credits = 0.0;

    for entry in entries {
        if let CourseGrade::Graded(grade) = entry.grade {
            weighted += grade.points() * entry.credits;
            credits += entry.credits;
        }
    }

    if credits == 0.0 {
        return (0.0, 0.0);
    }

    (weighted / credits, credits)
}

/// GPA result that keeps "no graded course" apart from an actual 0.0 GPA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GpaOutcome {
    Computed { gpa: f64, gpa_credits: f64 },
    NoGradedCourses,
}

impl GpaOutcome {
    pub fn from_entries(entries: &[CourseEntry]) -> Self {
        match compute_gpa(entries) {
            (_, credits) if credits == 0.0 => GpaOutcome::NoGradedCourses,
            (gpa, gpa_credits) => GpaOutcome::Computed { gpa, gpa_credits },
        }
    }

    pub fn gpa(&self) -> f64 {
        match self {
            GpaOutcome::Computed { gpa, .. } => *gpa,
            GpaOutcome::NoGradedCourses => 0.0,
        }
    }

    pub fn gpa_credits(&self) -> f64 {
        match self {
            GpaOutcome::Computed { gpa_credits, .. } => *gpa_credits,
            GpaOutcome::NoGradedCourses => 0.0,
        }
    }
}

/// Summary shown for a semester (or free-mode) course list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaReport {
    pub outcome: GpaOutcome,
    /// Credits of every selected course, graded or not.
    pub total_credits: f64,
    pub has_non_graded: bool,
}

impl GpaReport {
    /// Builds the report, refusing to show a GPA when the selected credits
    /// exceed `credit_limit`.
    pub fn build(entries: &[CourseEntry], credit_limit: f64) -> Result<Self, EngineError> {
        let total_credits: f64 = entries.iter().map(|e| e.credits).sum();

        if total_credits > credit_limit {
            warn!(total_credits, credit_limit, "Selected credits exceed limit");
            return Err(EngineError::CreditLimitExceeded {
                total: total_credits,
                limit: credit_limit,
            });
        }

        let outcome = GpaOutcome::from_entries(entries);
        debug!(?outcome, total_credits, courses = entries.len(), "GPA computed");

        Ok(Self {
            outcome,
            total_credits,
            has_non_graded: entries.iter().any(CourseEntry::is_non_graded),
        })
    }
}
