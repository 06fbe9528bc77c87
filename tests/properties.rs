use grade_calc::cgpa::{SemesterRecord, compute_cgpa, required_gpa, weighted_totals};
use grade_calc::gpa::{CourseEntry, compute_gpa};
use grade_calc::grade::Grade;
use grade_calc::predict::classify::{lab_grade, zscore_grade};
use grade_calc::predict::progress::progress_to_next;
use grade_calc::predict::rules::apply_hard_rules;
use proptest::prelude::*;

const GRADED: &[&str] = &["S", "A", "B", "C", "D", "E", "F"];
const NON_GRADED: &[&str] = &["P", "F"];

fn graded_entry() -> impl Strategy<Value = CourseEntry> {
    (1u32..=10, prop::sample::select(GRADED)).prop_map(
        |(half_credits, grade)| {
            CourseEntry::new("GRADED", f64::from(half_credits) / 2.0, grade, false, 30.5).unwrap()
        },
    )
}

fn non_graded_entry() -> impl Strategy<Value = CourseEntry> {
    (1u32..=6, prop::sample::select(NON_GRADED)).prop_map(|(half_credits, grade)| {
        CourseEntry::new("NONGRADED", f64::from(half_credits) / 2.0, grade, true, 30.5).unwrap()
    })
}

fn record() -> impl Strategy<Value = SemesterRecord> {
    (0.0f64..=10.0, 2u32..=50).prop_map(|(gpa, half_credits)| SemesterRecord {
        gpa: Some(gpa),
        credits: Some(f64::from(half_credits) / 2.0),
    })
}

fn any_grade() -> impl Strategy<Value = Grade> {
    prop::sample::select(Grade::ASCENDING.to_vec())
}

proptest! {
    #[test]
    fn gpa_ignores_non_graded_only(entries in prop::collection::vec(non_graded_entry(), 0..8)) {
        prop_assert_eq!(compute_gpa(&entries), (0.0, 0.0));
    }

    #[test]
    fn gpa_stays_in_scale(
        graded in prop::collection::vec(graded_entry(), 1..10),
        other in prop::collection::vec(non_graded_entry(), 0..4),
    ) {
        let expected_credits: f64 = graded.iter().map(|e| e.credits).sum();
        let mut entries = graded;
        entries.extend(other);
        let (gpa, credits) = compute_gpa(&entries);
        prop_assert!((0.0..=10.0).contains(&gpa), "gpa out of scale: {}", gpa);
        prop_assert!((credits - expected_credits).abs() < 1e-9);
    }

    #[test]
    fn cgpa_is_order_invariant(records in prop::collection::vec(record(), 1..8)) {
        let forward = compute_cgpa(&records).unwrap();
        let mut reversed = records.clone();
        reversed.reverse();
        let backward = compute_cgpa(&reversed).unwrap();
        prop_assert!((forward - backward).abs() < 1e-9);
        prop_assert!((0.0..=10.0 + 1e-9).contains(&forward));
    }

    #[test]
    fn required_gpa_reaches_target(
        records in prop::collection::vec(record(), 1..6),
        target in 0.0f64..=10.0,
        half_credits in 1u32..=60,
    ) {
        let (weighted_sum, current) = weighted_totals(&records);
        let to_add = f64::from(half_credits) / 2.0;
        let required = required_gpa(target, weighted_sum, current, to_add).required();

        let mut extended = records.clone();
        extended.push(SemesterRecord { gpa: Some(required), credits: Some(to_add) });
        let cgpa = compute_cgpa(&extended).unwrap();
        prop_assert!((cgpa - target).abs() < 1e-6, "{} != {}", cgpa, target);
    }

    #[test]
    fn progress_full_without_spread(
        grade in any_grade(),
        overall in 0.0f64..=100.0,
        mean in 0.0f64..=100.0,
    ) {
        prop_assert_eq!(progress_to_next(grade, overall, mean, 0.0), 1.0);
    }

    #[test]
    fn progress_is_bounded(
        overall in 0.0f64..=100.0,
        mean in 0.0f64..=100.0,
        sd in 0.1f64..=40.0,
    ) {
        let grade = zscore_grade(overall, mean, sd);
        let progress = progress_to_next(grade, overall, mean, sd);
        prop_assert!((0.0..=1.0).contains(&progress));
    }

    #[test]
    fn zscore_grade_is_monotone(
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
        mean in 0.0f64..=100.0,
        sd in 0.0f64..=40.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(zscore_grade(low, mean, sd) <= zscore_grade(high, mean, sd));
    }

    #[test]
    fn lab_grade_is_monotone(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(lab_grade(low) <= lab_grade(high));
    }

    #[test]
    fn hard_rules_fail_and_cap(
        overall in 0.0f64..=100.0,
        fat in 0.0f64..=100.0,
        predicted in any_grade(),
    ) {
        let grade = apply_hard_rules(overall, fat, predicted);
        if overall < 50.0 || fat < 40.0 {
            prop_assert_eq!(grade, Grade::F);
        } else if overall < 80.0 {
            prop_assert!(grade != Grade::S);
        }
        prop_assert!(grade <= predicted);
    }
}
