pub fn div_or_zero(lhs: f32, rhs: f32) -> f32 {
    if rhs == 0.0 {
        0.0
    } else {
        lhs / rhs
    }
}

/// Natural log that treats non-positive input as zero.
pub fn ln_or_zero(val: f32) -> f32 {
    if val <= 0.0 {
        0.0
    } else {
        val.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_div_or_zero() {
        assert_approx_eq!(div_or_zero(3.0, 2.0), 1.5);
        assert_eq!(div_or_zero(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_ln_or_zero() {
        assert_eq!(ln_or_zero(0.0), 0.0);
        assert_eq!(ln_or_zero(1.0), 0.0);
        assert_approx_eq!(ln_or_zero(std::f32::consts::E), 1.0);
    }
}
