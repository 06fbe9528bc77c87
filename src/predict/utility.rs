/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the strictly positive values; `None` when there are none.
/// A zero entry means "not supplied".
pub fn positive_mean(values: &[f64]) -> Option<f64> {
    let supplied: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    if supplied.is_empty() {
        return None;
    }
    Some(mean(&supplied))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn test_positive_mean_ignores_zeros() {
        assert_eq!(positive_mean(&[0.0, 8.0, 0.0, 6.0]), Some(7.0));
        assert_eq!(positive_mean(&[0.0, 0.0]), None);
        assert_eq!(positive_mean(&[]), None);
    }
}
