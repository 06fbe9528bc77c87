//! Course catalog loaded from a branch CSV, and theory/lab companion lookup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::config::MAX_SEM_CREDITS;
use crate::error::EngineError;
use crate::gpa::CourseEntry;
use crate::grade::CourseGrade;

/// A single row of the catalog CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Course {
    #[serde(rename = "Course Code")]
    pub code: String,
    #[serde(rename = "Course Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub course_type: String,
    #[serde(rename = "Credits")]
    pub credits: f64,
}

impl Course {
    /// "CODE - Name", as shown in course pickers.
    pub fn display(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }

    pub fn is_non_graded(&self) -> bool {
        self.course_type.contains("Non-Graded")
    }

    /// Builds a validated entry for this course with `grade`.
    pub fn entry(&self, grade: &str) -> Result<CourseEntry, EngineError> {
        CourseEntry::new(
            self.code.clone(),
            self.credits,
            grade,
            self.is_non_graded(),
            MAX_SEM_CREDITS,
        )
    }

    /// Entry with the default grade of its set (`S`, or `P` if non-graded).
    pub fn default_entry(&self) -> CourseEntry {
        CourseEntry {
            course_code: self.code.clone(),
            credits: self.credits,
            grade: CourseGrade::default_for(self.is_non_graded()),
        }
    }
}

/// Code of the theory/lab companion: an `L` suffix pairs with `P` and back.
pub fn companion_code(course_code: &str) -> Option<String> {
    let mut chars = course_code.chars();
    let last = chars.next_back()?;
    let prefix = chars.as_str();
    match last.to_ascii_uppercase() {
        'L' => Some(format!("{prefix}P")),
        'P' => Some(format!("{prefix}L")),
        _ => None,
    }
}

/// Read access to a set of courses.
pub trait CourseLookup {
    fn course(&self, code: &str) -> Option<&Course>;

    /// The companion course of `code`, if it exists in the catalog.
    fn lookup_companion(&self, code: &str) -> Option<&Course> {
        companion_code(code).and_then(|c| self.course(&c))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    by_code: HashMap<String, usize>,
}

impl CourseCatalog {
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let by_code = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.clone(), i))
            .collect();
        Self { courses, by_code }
    }

    /// Loads a catalog CSV. Headers and fields are trimmed; files that are
    /// not valid UTF-8 are decoded as Latin-1.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("course catalog '{}' not found", path.display()))?;
        let catalog = Self::from_csv(&decode(bytes))
            .with_context(|| format!("failed to parse course catalog '{}'", path.display()))?;
        info!(path = %path.display(), courses = catalog.len(), "Course catalog loaded");
        Ok(catalog)
    }

    pub fn from_csv(content: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut courses = Vec::new();
        for result in rdr.deserialize() {
            let course: Course = result?;
            courses.push(course);
        }

        Ok(Self::from_courses(courses))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Resolves `(code, grade)` selections into entries. Each selected
    /// course whose companion exists but was not selected gets the companion
    /// inserted right after it with a default grade. A course may be
    /// selected once.
    pub fn entries_with_companions(
        &self,
        selections: &[(String, String)],
    ) -> Result<Vec<CourseEntry>, EngineError> {
        let selected: Vec<&str> = selections.iter().map(|(code, _)| code.as_str()).collect();
        let mut entries: Vec<CourseEntry> = Vec::with_capacity(selections.len());

        for (code, grade) in selections {
            let course = self
                .course(code)
                .ok_or_else(|| EngineError::UnknownCourse(code.clone()))?;
            if entries.iter().any(|e| e.course_code == course.code) {
                return Err(EngineError::DuplicateCourse(course.code.clone()));
            }
            entries.push(course.entry(grade)?);

            if let Some(companion) = self.lookup_companion(code) {
                let already = selected.contains(&companion.code.as_str())
                    || entries.iter().any(|e| e.course_code == companion.code);
                if !already {
                    debug!(course = %code, companion = %companion.code, "Adding companion course");
                    entries.push(companion.default_entry());
                }
            }
        }

        Ok(entries)
    }
}

impl CourseLookup for CourseCatalog {
    fn course(&self, code: &str) -> Option<&Course> {
        self.by_code.get(code.trim()).map(|&i| &self.courses[i])
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}
