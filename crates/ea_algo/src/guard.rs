//! Guarded arithmetic shared by every engine formula.

/// Map NaN/∞ to 0. Shared with input coercion in `ea_core`.
pub use ea_core::inputs::finite_or_zero as finite;

/// `num / den`, or 0 when the denominator is 0 or the quotient is not finite.
#[inline]
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    finite(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_zero() {
        assert_eq!(safe_div(5.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(-5.0, -0.0), 0.0);
    }

    #[test]
    fn finite_matches_input_coercion_guard() {
        for v in [2.5, -0.0, f64::NAN, f64::INFINITY] {
            assert_eq!(finite(v).to_bits(), ea_core::inputs::finite_or_zero(v).to_bits());
        }
        assert_eq!(finite(f64::NAN), 0.0);
    }

    #[test]
    fn overflow_is_scrubbed() {
        assert_eq!(safe_div(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert_eq!(finite(f64::NEG_INFINITY), 0.0);
        assert_eq!(safe_div(9.0, 3.0), 3.0);
    }
}
