use jiff::SignedDuration;

const SECONDS_PER_MINUTE: f64 = 60.0;

pub trait DurationExt {
    fn as_minutes_f64(&self) -> f64;
}

impl DurationExt for SignedDuration {
    fn as_minutes_f64(&self) -> f64 {
        self.as_secs_f64() / SECONDS_PER_MINUTE
    }
}

/// Converts minutes into a duration. Values out of range saturate to
/// `SignedDuration::MAX` or `SignedDuration::MIN`, NaN becomes zero.
pub fn from_minutes_f64(minutes: f64) -> SignedDuration {
    if minutes.is_nan() {
        return SignedDuration::ZERO;
    }

    match SignedDuration::try_from_secs_f64(minutes * SECONDS_PER_MINUTE) {
        Ok(duration) => duration,
        Err(_) if minutes > 0.0 => SignedDuration::MAX,
        Err(_) => SignedDuration::MIN,
    }
}

/// Positive part of a duration, zero when negative.
pub fn positive_part(duration: SignedDuration) -> SignedDuration {
    if duration.is_positive() {
        duration
    } else {
        SignedDuration::ZERO
    }
}

#[macro_export]
macro_rules! timer_debug {
    ($msg:literal,$block:expr) => {{
        let now = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(now);

        tracing::debug!("{}: Took {:?}", $msg, elapsed);

        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_conversion() {
        let duration = from_minutes_f64(12.5);
        assert_eq!(duration, SignedDuration::from_secs(750));
        assert_eq!(duration.as_minutes_f64(), 12.5);
    }

    #[test]
    fn test_out_of_range_minutes_saturate() {
        assert_eq!(from_minutes_f64(f64::NAN), SignedDuration::ZERO);
        assert_eq!(from_minutes_f64(f64::INFINITY), SignedDuration::MAX);
        assert_eq!(from_minutes_f64(1e18), SignedDuration::MAX);
        assert_eq!(from_minutes_f64(f64::NEG_INFINITY), SignedDuration::MIN);
    }

    #[test]
    fn test_positive_part() {
        assert_eq!(
            positive_part(SignedDuration::from_mins(-5)),
            SignedDuration::ZERO
        );
        assert_eq!(
            positive_part(SignedDuration::from_mins(5)),
            SignedDuration::from_mins(5)
        );
    }
}
