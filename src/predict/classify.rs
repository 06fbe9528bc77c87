use crate::grade::Grade;

/// Letter grade for a lab course (60 + 40 format). The total is rounded up
/// before banding; bands are closed on the lower bound.
///
/// | Total (ceil) | Grade |
/// |--------------|-------|
/// | >= 90        | S     |
/// | >= 80        | A     |
/// | >= 70        | B     |
/// | >= 60        | C     |
/// | >= 50        | D     |
/// | >= 40        | E     |
/// | < 40         | F     |
pub fn lab_grade(total_marks: f64) -> Grade {
    match total_marks.ceil() {
        t if t >= 90.0 => Grade::S,
        t if t >= 80.0 => Grade::A,
        t if t >= 70.0 => Grade::B,
        t if t >= 60.0 => Grade::C,
        t if t >= 50.0 => Grade::D,
        t if t >= 40.0 => Grade::E,
        _ => Grade::F,
    }
}

/// Relative grade from the z-score of `overall` against the class.
///
/// With no spread (`class_sd == 0`) the result is S at or above the mean and
/// F below it. Otherwise each letter covers two 0.5-wide bands:
///
/// | z         | Grade |
/// |-----------|-------|
/// | >= 2.25   | S     |
/// | >= 1.75   | S     |
/// | >= 1.25   | A     |
/// | >= 0.75   | A     |
/// | >= 0.25   | B     |
/// | >= -0.25  | B     |
/// | >= -0.75  | C     |
/// | >= -1.25  | C     |
/// | >= -1.75  | D     |
/// | >= -2.25  | D     |
/// | >= -2.75  | E     |
/// | >= -3.25  | E     |
/// | < -3.25   | F     |
pub fn zscore_grade(overall: f64, class_mean: f64, class_sd: f64) -> Grade {
    if class_sd == 0.0 {
        return if overall >= class_mean { Grade::S } else { Grade::F };
    }

    match (overall - class_mean) / class_sd {
        z if z >= 2.25 => Grade::S,
        z if z >= 1.75 => Grade::S,
        z if z >= 1.25 => Grade::A,
        z if z >= 0.75 => Grade::A,
        z if z >= 0.25 => Grade::B,
        z if z >= -0.25 => Grade::B,
        z if z >= -0.75 => Grade::C,
        z if z >= -1.25 => Grade::C,
        z if z >= -1.75 => Grade::D,
        z if z >= -2.25 => Grade::D,
        z if z >= -2.75 => Grade::E,
        z if z >= -3.25 => Grade::E,
        _ => Grade::F,
    }
}
