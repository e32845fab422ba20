//! Rounding rules shared by every aggregate.
//!
//! Percentages are `0` whenever the denominator is `0`; halves round up.

/// Rounds `value` to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// `numerator / denominator` as a percentage with one decimal place.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_one_decimal(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 1000.0).round() / 10.0
}

/// `numerator / denominator` as a whole-number percentage.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn percent_whole(numerator: i64, denominator: i64) -> i64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() as i64
}

/// Arithmetic mean, or `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_decimal_percent_of_a_third() {
        assert!((percent_one_decimal(1, 3) - 33.3).abs() < f64::EPSILON);
    }

    #[test]
    fn whole_percent_of_a_third() {
        assert_eq!(percent_whole(1, 3), 33);
        assert_eq!(percent_whole(2, 3), 67);
    }

    #[test]
    fn zero_denominator_yields_zero() {
        assert!(percent_one_decimal(5, 0).abs() < f64::EPSILON);
        assert_eq!(percent_whole(5, 0), 0);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(percent_whole(1, 8), 13);
        assert!((round_to(0.000_05, 4) - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn average_of_empty_slice_is_none() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }
}
