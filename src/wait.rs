//! Bounded polling shared by instance, VPC and password waits.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::error::{InfraError, InfraResult};

/// Instant `timeout` from now. Durations past the clock's range are
/// rejected as an invalid `field`.
pub(crate) fn deadline_after(timeout: Duration, field: &str) -> InfraResult<Instant> {
    Instant::now()
        .checked_add(timeout)
        .ok_or_else(|| InfraError::Validation(field.to_owned()))
}

/// Runs `check` every `interval` until it reports `true` or `timeout`
/// elapses. Check errors abort the loop, as does a `timeout` too large to
/// schedule.
pub(crate) async fn poll_until<F, Fut>(
    interval: Duration,
    timeout: Duration,
    action: &str,
    resource_id: &str,
    mut check: F,
) -> InfraResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = InfraResult<bool>>,
{
    let deadline = deadline_after(timeout, "wait_timeout")?;
    while Instant::now() <= deadline {
        if check().await? {
            return Ok(());
        }
        sleep(interval).await;
    }
    Err(InfraError::Timeout {
        action: action.to_owned(),
        resource_id: resource_id.to_owned(),
    })
}

/// Sleeps for `delay` unless it is zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn returns_once_the_check_succeeds() {
        let attempts = Cell::new(0_u32);
        let result = poll_until(
            Duration::from_secs(5),
            Duration::from_secs(60),
            "running",
            "i-1",
            || {
                attempts.set(attempts.get() + 1);
                let done = attempts.get() == 3;
                async move { Ok(done) }
            },
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_timeout() {
        let started = Instant::now();
        let result = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(2),
            "available",
            "vpc-1",
            || async { Ok(false) },
        )
        .await;
        assert_eq!(
            result,
            Err(InfraError::Timeout {
                action: String::from("available"),
                resource_id: String::from("vpc-1"),
            })
        );
        assert!(started.elapsed() <= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn check_errors_abort_immediately() {
        let result = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(60),
            "running",
            "i-1",
            || async { Err(InfraError::not_found("i-1")) },
        )
        .await;
        assert!(matches!(result, Err(InfraError::NotFound { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn unschedulable_timeouts_are_rejected_before_polling() {
        let attempts = Cell::new(0_u32);
        let result = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(u64::MAX),
            "running",
            "i-1",
            || {
                attempts.set(attempts.get() + 1);
                async { Ok(true) }
            },
        )
        .await;
        assert_eq!(
            result,
            Err(InfraError::Validation(String::from("wait_timeout")))
        );
        assert_eq!(attempts.get(), 0);
    }

    #[test]
    fn ordinary_timeouts_produce_a_deadline() {
        let now = Instant::now();
        let deadline = deadline_after(Duration::from_secs(600), "wait_timeout")
            .unwrap_or_else(|err| panic!("deadline should fit: {err}"));
        assert!(deadline >= now + Duration::from_secs(600));
    }
}
