//! Raw assessment marks and the weighted overall score.

use serde::Serialize;

use crate::error::{EngineError, check_range};

pub const CAT_MAX: f64 = 50.0;
pub const DA_MAX: f64 = 10.0;
pub const FAT_MAX: f64 = 100.0;
pub const LAB_MAX: f64 = 60.0;
pub const LAB_FAT_MAX: f64 = 40.0;
pub const MANUAL_AVG_MAX: f64 = 100.0;
pub const MANUAL_SD_MAX: f64 = 40.0;
pub const CLASS_STRENGTH_MIN: u32 = 10;
pub const CLASS_STRENGTH_MAX: u32 = 120;
pub const DEFAULT_CLASS_STRENGTH: u32 = 60;

/// Overall score out of 100.
///
/// | Component     | Out of | Weight |
/// |---------------|--------|--------|
/// | CAT 1, CAT 2  | 50     | 15     |
/// | DA 1, 2, 3    | 10     | 10     |
/// | FAT           | 100    | 40     |
///
/// Inputs are not clamped.
pub fn weighted_score(cat1: f64, cat2: f64, da1: f64, da2: f64, da3: f64, fat: f64) -> f64 {
    (cat1 / 50.0) * 15.0
        + (cat2 / 50.0) * 15.0
        + (da1 / 10.0) * 10.0
        + (da2 / 10.0) * 10.0
        + (da3 / 10.0) * 10.0
        + (fat / 100.0) * 40.0
}

/// The six theory components. Used both for a student's own marks and for
/// class averages (where 0 means "not supplied").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Components {
    pub cat1: f64,
    pub cat2: f64,
    pub da1: f64,
    pub da2: f64,
    pub da3: f64,
    pub fat: f64,
}

impl Components {
    fn validated(self, what: Which) -> Result<Self, EngineError> {
        let (cat1, cat2, da1, da2, da3, fat) = match what {
            Which::Marks => ("cat1", "cat2", "da1", "da2", "da3", "fat"),
            Which::Averages => (
                "cat1 average",
                "cat2 average",
                "da1 average",
                "da2 average",
                "da3 average",
                "fat average",
            ),
        };
        Ok(Self {
            cat1: check_range(cat1, self.cat1, 0.0, CAT_MAX)?,
            cat2: check_range(cat2, self.cat2, 0.0, CAT_MAX)?,
            da1: check_range(da1, self.da1, 0.0, DA_MAX)?,
            da2: check_range(da2, self.da2, 0.0, DA_MAX)?,
            da3: check_range(da3, self.da3, 0.0, DA_MAX)?,
            fat: check_range(fat, self.fat, 0.0, FAT_MAX)?,
        })
    }

    pub fn overall(&self) -> f64 {
        weighted_score(self.cat1, self.cat2, self.da1, self.da2, self.da3, self.fat)
    }

    pub fn das(&self) -> [f64; 3] {
        [self.da1, self.da2, self.da3]
    }

    pub fn cats(&self) -> [f64; 2] {
        [self.cat1, self.cat2]
    }

    /// True when at least one component is non-zero.
    pub fn any_supplied(&self) -> bool {
        self.das().iter().chain(self.cats().iter()).any(|v| *v > 0.0) || self.fat > 0.0
    }
}

#[derive(Clone, Copy)]
enum Which {
    Marks,
    Averages,
}

/// Manually entered class statistics. 0 means "not supplied".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ManualOverrides {
    pub class_average: f64,
    pub class_sd: f64,
}

/// Everything needed for one theory-course prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkSet {
    pub marks: Components,
    pub averages: Components,
    pub manual: ManualOverrides,
    pub class_strength: u32,
}

impl MarkSet {
    /// Validates every field against its declared range.
    pub fn new(
        marks: Components,
        averages: Components,
        manual: ManualOverrides,
        class_strength: u32,
    ) -> Result<Self, EngineError> {
        check_range(
            "class strength",
            f64::from(class_strength),
            f64::from(CLASS_STRENGTH_MIN),
            f64::from(CLASS_STRENGTH_MAX),
        )?;
        Ok(Self {
            marks: marks.validated(Which::Marks)?,
            averages: averages.validated(Which::Averages)?,
            manual: ManualOverrides {
                class_average: check_range(
                    "class average",
                    manual.class_average,
                    0.0,
                    MANUAL_AVG_MAX,
                )?,
                class_sd: check_range("class sd", manual.class_sd, 0.0, MANUAL_SD_MAX)?,
            },
            class_strength,
        })
    }

    pub fn overall(&self) -> f64 {
        self.marks.overall()
    }
}

/// Lab-course marks (60 + 40 format).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabMarks {
    pub lab: f64,
    pub fat: f64,
}

impl LabMarks {
    pub fn new(lab: f64, fat: f64) -> Result<Self, EngineError> {
        Ok(Self {
            lab: check_range("lab marks", lab, 0.0, LAB_MAX)?,
            fat: check_range("lab fat marks", fat, 0.0, LAB_FAT_MAX)?,
        })
    }

    pub fn total(&self) -> f64 {
        self.lab + self.fat
    }
}
