pub mod health;
pub mod insights;
pub mod trials;

use std::time::Instant;

/// Elapsed wall-clock seconds since `started`, rounded to the two decimals
/// reported in every response body.
pub(crate) fn elapsed_seconds(started: Instant) -> f64 {
    round2(started.elapsed().as_secs_f64())
}

fn round2(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(0.666), 0.67);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn elapsed_seconds_is_non_negative() {
        assert!(elapsed_seconds(Instant::now()) >= 0.0);
    }
}
