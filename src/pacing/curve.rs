//! Shared curve shapes
//!
//! Single source for the exponential approach used by every ramp knob.

/// One-sided exponential approach from `start` toward `end`.
///
/// `value(t) = start + (end - start) * (1 - exp(-max(0, t) / tau))`
///
/// Negative time clamps to the start value. A non-positive `tau` snaps to `end`.
#[inline]
pub fn exp_approach(start: f32, end: f32, t: f32, tau: f32) -> f32 {
    if tau <= 0.0 {
        return end;
    }
    start + (end - start) * approach_progress(t, tau)
}

/// Fraction of the way an exponential approach has travelled, in [0, 1)
#[inline]
pub fn approach_progress(t: f32, tau: f32) -> f32 {
    if tau <= 0.0 {
        return 1.0;
    }
    1.0 - (-t.max(0.0) / tau).exp()
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_approach_endpoints() {
        assert_eq!(exp_approach(2.0, 10.0, 0.0, 5.0), 2.0);
        assert!((exp_approach(2.0, 10.0, 500.0, 5.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_exp_approach_negative_time_clamps() {
        assert_eq!(exp_approach(2.0, 10.0, -30.0, 5.0), 2.0);
    }

    #[test]
    fn test_exp_approach_descending() {
        // Same formula walks downward when end < start
        let v = exp_approach(800.0, 400.0, 40.0, 40.0);
        assert!(v < 800.0 && v > 400.0);
    }

    #[test]
    fn test_zero_tau_snaps_to_end() {
        assert_eq!(exp_approach(1.0, 3.0, 0.0, 0.0), 3.0);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.6, 1.0, 0.5) - 0.8).abs() < 1e-6);
        assert_eq!(lerp(1.0, 2.0, 0.0), 1.0);
    }
}
