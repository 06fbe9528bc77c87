//! Program-wide limits and per-branch configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Per-semester credit cap.
pub const MAX_SEM_CREDITS: f64 = 30.5;
/// Number of semester slots in a program.
pub const TOTAL_SEMESTERS: usize = 8;
/// Credits are entered in steps of this size.
pub const CREDIT_STEP: f64 = 0.5;
pub const MAX_GPA: f64 = 10.0;

/// Rounds `credits` to the nearest [`CREDIT_STEP`], ties to even.
pub fn round_to_half(credits: f64) -> f64 {
    (credits / CREDIT_STEP).round_ties_even() * CREDIT_STEP
}

/// Degree branch. Selects the course catalog and the program credit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Branch {
    /// CSE Core
    #[default]
    Bce,
    /// CSE, Cyber Physical Systems
    Bps,
    /// CSE, Artificial Intelligence and Machine Learning
    Bai,
    /// CSE, Data Science
    Bds,
    /// CSE, Artificial Intelligence and Robotics
    Brs,
    /// Mechatronics
    Bmh,
    /// Electronics and Communication
    Bec,
    /// Electronics and Computer Engineering
    Blc,
}

impl Branch {
    pub const ALL: [Branch; 8] = [
        Branch::Bce,
        Branch::Bps,
        Branch::Bai,
        Branch::Bds,
        Branch::Brs,
        Branch::Bmh,
        Branch::Bec,
        Branch::Blc,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Branch::Bce => "BCE",
            Branch::Bps => "BPS",
            Branch::Bai => "BAI",
            Branch::Bds => "BDS",
            Branch::Brs => "BRS",
            Branch::Bmh => "BMH",
            Branch::Bec => "BEC",
            Branch::Blc => "BLC",
        }
    }

    /// Built-in program credit limit.
    pub fn max_total_credits(self) -> f64 {
        match self {
            Branch::Bmh => 154.0,
            Branch::Blc => 153.0,
            _ => 151.0,
        }
    }

    /// Built-in catalog file name, relative to the data directory.
    pub fn catalog_file(self) -> String {
        format!("courses_{}.csv", self.code().to_ascii_lowercase())
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Branch::ALL
            .into_iter()
            .find(|b| b.code() == code)
            .ok_or_else(|| format!("unknown branch '{s}'"))
    }
}

/// Optional per-branch overrides, stored as JSON:
/// ```json
/// {
///   "BMH": { "max_total_credits": 154.0, "catalog": "data/courses_bmh.csv" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchOverride {
    pub max_total_credits: Option<f64>,
    pub catalog: Option<PathBuf>,
}

/// Resolved configuration for a single run.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    data_dir: PathBuf,
    overrides: HashMap<String, BranchOverride>,
}

impl ProgramConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Loads branch overrides from a JSON file at `path`.
    pub fn load(data_dir: impl Into<PathBuf>, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read program config '{}'", path.display()))?;
        let raw: HashMap<String, BranchOverride> = serde_json::from_str(&content)
            .with_context(|| format!("invalid program config '{}'", path.display()))?;
        let overrides = raw
            .into_iter()
            .map(|(k, v)| (k.trim().to_ascii_uppercase(), v))
            .collect();

        Ok(Self {
            data_dir: data_dir.into(),
            overrides,
        })
    }

    fn override_for(&self, branch: Branch) -> Option<&BranchOverride> {
        self.overrides.get(branch.code())
    }

    pub fn max_total_credits(&self, branch: Branch) -> f64 {
        self.override_for(branch)
            .and_then(|o| o.max_total_credits)
            .unwrap_or_else(|| branch.max_total_credits())
    }

    pub fn catalog_path(&self, branch: Branch) -> PathBuf {
        self.override_for(branch)
            .and_then(|o| o.catalog.clone())
            .unwrap_or_else(|| self.data_dir.join(branch.catalog_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_round_to_half() {
        assert_eq!(round_to_half(3.2), 3.0);
        assert_eq!(round_to_half(3.3), 3.5);
        assert_eq!(round_to_half(4.0), 4.0);
    }

    #[test]
    fn test_round_to_half_ties_to_even() {
        assert_eq!(round_to_half(22.25), 22.0);
        assert_eq!(round_to_half(22.75), 23.0);
        assert_eq!(round_to_half(3.25), 3.0);
    }

    #[test]
    fn test_branch_limits() {
        assert_eq!(Branch::Bce.max_total_credits(), 151.0);
        assert_eq!(Branch::Bmh.max_total_credits(), 154.0);
        assert_eq!(Branch::Blc.max_total_credits(), 153.0);
        assert_eq!(Branch::Bec.max_total_credits(), 151.0);
    }

    #[test]
    fn test_branch_parse() {
        assert_eq!("bmh".parse::<Branch>().unwrap(), Branch::Bmh);
        assert!("xyz".parse::<Branch>().is_err());
        assert_eq!(Branch::default(), Branch::Bce);
    }

    #[test]
    fn test_catalog_path_default() {
        let config = ProgramConfig::new("data");
        assert_eq!(
            config.catalog_path(Branch::Blc),
            PathBuf::from("data/courses_blc.csv")
        );
    }

    #[test]
    fn test_load_overrides() {
        let path = env::temp_dir().join("grade_calc_test_program_config.json");
        fs::write(&path, r#"{ "bce": { "max_total_credits": 160.0 } }"#).unwrap();

        let config = ProgramConfig::load("data", &path).unwrap();
        assert_eq!(config.max_total_credits(Branch::Bce), 160.0);
        assert_eq!(config.max_total_credits(Branch::Bmh), 154.0);

        fs::remove_file(&path).unwrap();
    }
}
