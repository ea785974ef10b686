/// Rounds to the nearest integer, with halves going up (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Whole-number percentage of `part` in `whole`; 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> i64 {
    if whole == 0 {
        return 0;
    }
    round_half_up(part as f64 / whole as f64 * 100.0)
}

/// Narrows a wide accumulator back to `i64`, clamping at the bounds.
pub fn saturate_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn saturate_clamps_out_of_range_sums() {
        assert_eq!(saturate_i64(42), 42);
        assert_eq!(saturate_i64(i128::from(i64::MAX) * 3), i64::MAX);
        assert_eq!(saturate_i64(i128::from(i64::MIN) * 3), i64::MIN);
    }

    #[test]
    fn percent_handles_zero_whole() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(4, 5), 80);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }
}
