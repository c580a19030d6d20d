use chrono::{DateTime, Duration, Utc};

use crate::common::errors::{OptionsError, Result};
use crate::common::types::LifecycleState;

/// Days an expired market stays awaiting settlement before it is closed
pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 180;

/// Time-driven lifecycle rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub grace_period: Duration,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            grace_period: Duration::days(DEFAULT_GRACE_PERIOD_DAYS),
        }
    }
}

impl LifecyclePolicy {
    /// Grace period in whole days; negative or out-of-range values are rejected
    pub fn with_grace_days(days: i64) -> Result<Self> {
        if days < 0 {
            return Err(OptionsError::InvalidInput(format!(
                "grace period must not be negative, got {} days",
                days
            )));
        }
        let grace_period = Duration::try_days(days).ok_or_else(|| {
            OptionsError::InvalidInput(format!("grace period of {} days is out of range", days))
        })?;
        Ok(Self { grace_period })
    }

    /// `open` before expiration, `expired` inside the grace window, `closed` after
    pub fn state(&self, expiration: DateTime<Utc>, now: DateTime<Utc>) -> LifecycleState {
        if now < expiration {
            LifecycleState::Open
        } else {
            // A window running past the end of representable time never closes
            match expiration.checked_add_signed(self.grace_period) {
                Some(closes_at) if now >= closes_at => LifecycleState::Closed,
                _ => LifecycleState::Expired,
            }
        }
    }
}

/// Lifecycle state under the default grace period
pub fn lifecycle_state(expiration: DateTime<Utc>, now: DateTime<Utc>) -> LifecycleState {
    LifecyclePolicy::default().state(expiration, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 4, 29, 19, 23, 0).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let now = now();
        assert_eq!(
            lifecycle_state(now + Duration::seconds(1), now),
            LifecycleState::Open
        );
        assert_eq!(
            lifecycle_state(now - Duration::seconds(1), now),
            LifecycleState::Expired
        );
        assert_eq!(lifecycle_state(now, now), LifecycleState::Expired);
        assert_eq!(
            lifecycle_state(now - Duration::days(181), now),
            LifecycleState::Closed
        );
        assert_eq!(
            lifecycle_state(now - Duration::days(180), now),
            LifecycleState::Closed
        );
    }

    #[test]
    fn test_custom_grace_period() {
        let now = now();
        let policy = LifecyclePolicy::with_grace_days(7).unwrap();
        assert_eq!(
            policy.state(now - Duration::days(6), now),
            LifecycleState::Expired
        );
        assert_eq!(
            policy.state(now - Duration::days(8), now),
            LifecycleState::Closed
        );
    }

    #[test]
    fn test_grace_period_out_of_range() {
        assert!(matches!(
            LifecyclePolicy::with_grace_days(i64::MAX),
            Err(OptionsError::InvalidInput(_))
        ));
        assert!(matches!(
            LifecyclePolicy::with_grace_days(-1),
            Err(OptionsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_grace_window_past_representable_time_stays_expired() {
        let now = now();
        let policy = LifecyclePolicy::with_grace_days(100_000_000).unwrap();
        assert_eq!(
            policy.state(now - Duration::days(1), now),
            LifecycleState::Expired
        );
    }

    #[test]
    fn test_state_is_deterministic() {
        let now = now();
        let expiration = now - Duration::days(3);
        assert_eq!(
            lifecycle_state(expiration, now),
            lifecycle_state(expiration, now)
        );
    }
}
