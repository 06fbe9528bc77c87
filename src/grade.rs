//! Letter grades and their grade points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// A graded-course letter.
///
/// | Grade | Points |
/// |-------|--------|
/// | S     | 10     |
/// | A     | 9      |
/// | B     | 8      |
/// | C     | 7      |
/// | D     | 6      |
/// | E     | 5      |
/// | F     | 0      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    F,
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Grade {
    /// Every grade, lowest first.
    pub const ASCENDING: [Grade; 7] = [
        Grade::F,
        Grade::E,
        Grade::D,
        Grade::C,
        Grade::B,
        Grade::A,
        Grade::S,
    ];

    pub fn points(self) -> f64 {
        match self {
            Grade::S => 10.0,
            Grade::A => 9.0,
            Grade::B => 8.0,
            Grade::C => 7.0,
            Grade::D => 6.0,
            Grade::E => 5.0,
            Grade::F => 0.0,
        }
    }

    /// Maps a classifier class id (0 = F ... 6 = S) to a grade.
    pub fn from_class_id(id: i64) -> Option<Grade> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::ASCENDING.get(i).copied())
    }

    /// The grade directly above this one, if any.
    pub fn next_higher(self) -> Option<Grade> {
        Self::ASCENDING.get(self as usize + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Grade::S),
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            "F" => Ok(Grade::F),
            other => Err(EngineError::UnknownGrade(other.to_string())),
        }
    }
}

/// Outcome of a non-graded course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassFail {
    P,
    F,
}

impl FromStr for PassFail {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P" => Ok(PassFail::P),
            "F" => Ok(PassFail::F),
            other => Err(EngineError::UnknownGrade(other.to_string())),
        }
    }
}

/// The grade recorded for a course: a letter for graded courses, pass/fail
/// for non-graded ones. The variant is the non-graded flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseGrade {
    Graded(Grade),
    NonGraded(PassFail),
}

impl CourseGrade {
    /// Parses `s` against the grade set selected by `is_non_graded`.
    pub fn parse(s: &str, is_non_graded: bool) -> Result<Self, EngineError> {
        if is_non_graded {
            s.parse().map(CourseGrade::NonGraded)
        } else {
            s.parse().map(CourseGrade::Graded)
        }
    }

    /// Like [`CourseGrade::parse`], but falls back to the default of the set
    /// (`P` for non-graded, `S` for graded) instead of failing.
    pub fn parse_or_default(s: &str, is_non_graded: bool) -> Self {
        Self::parse(s, is_non_graded).unwrap_or_else(|_| Self::default_for(is_non_graded))
    }

    pub fn default_for(is_non_graded: bool) -> Self {
        if is_non_graded {
            CourseGrade::NonGraded(PassFail::P)
        } else {
            CourseGrade::Graded(Grade::S)
        }
    }

    pub fn is_non_graded(&self) -> bool {
        matches!(self, CourseGrade::NonGraded(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            CourseGrade::Graded(g) => g.as_str(),
            CourseGrade::NonGraded(PassFail::P) => "P",
            CourseGrade::NonGraded(PassFail::F) => "F",
        }
    }
}
