//! Cumulative GPA over completed semesters and the target-CGPA solver.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{MAX_GPA, MAX_SEM_CREDITS, TOTAL_SEMESTERS, round_to_half};
use crate::error::{EngineError, check_range};

/// A completed semester. Either field may still be unset while the user is
/// filling the form; such records are skipped by aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SemesterRecord {
    pub gpa: Option<f64>,
    pub credits: Option<f64>,
}

impl SemesterRecord {
    /// Validates the GPA against `[0, 10]` and the credits against
    /// `[0, MAX_SEM_CREDITS]`. Credits are snapped to the 0.5 step.
    pub fn new(gpa: Option<f64>, credits: Option<f64>) -> Result<Self, EngineError> {
        let gpa = gpa.map(|g| check_range("gpa", g, 0.0, MAX_GPA)).transpose()?;
        let credits = credits
            .map(|c| check_range("credits", round_to_half(c), 0.0, MAX_SEM_CREDITS))
            .transpose()?;
        Ok(Self { gpa, credits })
    }

    fn complete(&self) -> Option<(f64, f64)> {
        Some((self.gpa?, self.credits?))
    }
}

/// A program has at most [`TOTAL_SEMESTERS`] semester slots.
pub fn check_semester_count(records: &[SemesterRecord]) -> Result<(), EngineError> {
    check_range("semesters", records.len() as f64, 0.0, TOTAL_SEMESTERS as f64)?;
    Ok(())
}

/// Returns `(Σ gpa·credits, Σ credits)` over complete records.
pub fn weighted_totals(records: &[SemesterRecord]) -> (f64, f64) {
    records
        .iter()
        .filter_map(SemesterRecord::complete)
        .fold((0.0, 0.0), |(sum, total), (gpa, credits)| {
            (sum + gpa * credits, total + credits)
        })
}

/// CGPA over complete records, or `None` while no credits are recorded.
pub fn compute_cgpa(records: &[SemesterRecord]) -> Option<f64> {
    let (weighted_sum, total_credits) = weighted_totals(records);
    if total_credits == 0.0 {
        return None;
    }
    Some(weighted_sum / total_credits)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CgpaSummary {
    pub cgpa: f64,
    pub weighted_sum: f64,
    pub total_credits: f64,
}

impl CgpaSummary {
    /// Summarises `records`, or `Ok(None)` when nothing is computable yet.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidRange`] for more than [`TOTAL_SEMESTERS`]
    /// records. [`EngineError::CreditLimitExceeded`] when the recorded credits
    /// exceed `max_total_credits`; the caller must ask for a correction
    /// instead of showing a CGPA.
    pub fn from_records(
        records: &[SemesterRecord],
        max_total_credits: f64,
    ) -> Result<Option<Self>, EngineError> {
        check_semester_count(records)?;
        let (weighted_sum, total_credits) = weighted_totals(records);

        if total_credits > max_total_credits {
            warn!(total_credits, max_total_credits, "Recorded credits exceed program limit");
            return Err(EngineError::CreditLimitExceeded {
                total: total_credits,
                limit: max_total_credits,
            });
        }

        if total_credits == 0.0 {
            return Ok(None);
        }

        Ok(Some(Self {
            cgpa: weighted_sum / total_credits,
            weighted_sum,
            total_credits,
        }))
    }

    /// CGPA of 9.0 or above.
    pub fn is_nine_pointer(&self) -> bool {
        self.cgpa >= 9.0
    }
}

/// Result of the required-GPA solver. Every variant carries the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalOutcome {
    /// Required GPA is above 10.0.
    Unreachable { required: f64 },
    /// Required GPA is negative: the target is already exceeded.
    AlreadyExceeded { required: f64 },
    Reachable { required: f64 },
}

impl GoalOutcome {
    pub fn required(&self) -> f64 {
        match *self {
            GoalOutcome::Unreachable { required }
            | GoalOutcome::AlreadyExceeded { required }
            | GoalOutcome::Reachable { required } => required,
        }
    }
}

/// Average GPA needed over `credits_to_add` further credits to finish at
/// `target_cgpa`.
///
/// The caller rejects `credits_to_add <= 0` and `current_credits == 0`.
pub fn required_gpa(
    target_cgpa: f64,
    current_weighted_sum: f64,
    current_credits: f64,
    credits_to_add: f64,
) -> GoalOutcome {
    let needed = target_cgpa * (current_credits + credits_to_add) - current_weighted_sum;
    let required = needed / credits_to_add;

    if required > MAX_GPA {
        GoalOutcome::Unreachable { required }
    } else if required < 0.0 {
        GoalOutcome::AlreadyExceeded { required }
    } else {
        GoalOutcome::Reachable { required }
    }
}

/// How the credits still to be earned are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalTimeframe {
    NextSemester(f64),
    NextTwoSemesters(f64, f64),
    /// All remaining credits over all remaining semesters.
    Remaining,
}

/// Credits and semester count a goal is spread over, plus the solver result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalPlan {
    pub target_cgpa: f64,
    pub credits_to_add: f64,
    pub semesters: usize,
    pub outcome: GoalOutcome,
}

impl GoalTimeframe {
    /// Returns `(credits_to_add, semesters)` given what is left in the program.
    pub fn credits_to_add(
        self,
        remaining_credits: f64,
        remaining_semesters: usize,
    ) -> Result<(f64, usize), EngineError> {
        match self {
            GoalTimeframe::NextSemester(credits) => {
                let cap = remaining_credits.min(MAX_SEM_CREDITS);
                Ok((check_range("next semester credits", credits, 0.0, cap)?, 1))
            }
            GoalTimeframe::NextTwoSemesters(first, second) => {
                let first = check_range("next semester credits", first, 0.0, remaining_credits)?;
                let second = check_range(
                    "following semester credits",
                    second,
                    0.0,
                    remaining_credits - first,
                )?;
                Ok((first + second, 2))
            }
            GoalTimeframe::Remaining => Ok((remaining_credits, remaining_semesters)),
        }
    }
}

/// Solves for the GPA needed to reach `target_cgpa` within `timeframe`.
///
/// Remaining semesters count every record slot as used, completed or not.
pub fn plan_goal(
    target_cgpa: f64,
    records: &[SemesterRecord],
    max_total_credits: f64,
    timeframe: GoalTimeframe,
) -> Result<GoalPlan, EngineError> {
    let target_cgpa = check_range("target cgpa", target_cgpa, 0.0, MAX_GPA)?;
    check_semester_count(records)?;
    let (weighted_sum, current_credits) = weighted_totals(records);

    let remaining_semesters = TOTAL_SEMESTERS.saturating_sub(records.len());
    let remaining_credits = max_total_credits - current_credits;
    if remaining_semesters == 0 || remaining_credits <= 0.0 {
        return Err(EngineError::NoRemainingCapacity);
    }

    let (credits_to_add, semesters) =
        timeframe.credits_to_add(remaining_credits, remaining_semesters)?;

    if current_credits == 0.0 {
        return Err(EngineError::NoGradedHistory);
    }
    if credits_to_add <= 0.0 {
        return Err(EngineError::NoCreditsToAdd);
    }

    let outcome = required_gpa(target_cgpa, weighted_sum, current_credits, credits_to_add);
    debug!(target_cgpa, credits_to_add, semesters, ?outcome, "Goal solved");

    Ok(GoalPlan {
        target_cgpa,
        credits_to_add,
        semesters,
        outcome,
    })
}
