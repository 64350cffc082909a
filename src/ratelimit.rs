//! Per-dependency admission control for external API calls.
//!
//! Each external dependency (YouTube, Gemini, GDBrowser) gets its own
//! [`RateLimiter`]: a fixed-window token reservoir (refilled to capacity at
//! each window boundary, no carry-over), a bound on concurrently in-flight
//! calls, and an optional minimum spacing between successive admissions.
//!
//! Admission never fails: callers wait as long as it takes. Unbounded wait is
//! the intended backpressure for this low-volume interactive workload.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Admission gate for one external dependency.
pub struct RateLimiter {
    name: &'static str,
    /// Tokens per window
    capacity: u32,
    /// Window length; the reservoir refills to `capacity` at each boundary
    window: Duration,
    /// Floor on time between successive admissions, if any
    min_interval: Option<Duration>,
    /// In-flight call slots
    slots: Arc<Semaphore>,
    reservoir: Mutex<Reservoir>,
}

struct Reservoir {
    window_start: Instant,
    tokens_used: u32,
    last_admission: Option<Instant>,
}

/// Proof of admission. Holding it occupies one in-flight slot; dropping it
/// (on any exit path) releases the slot.
pub struct Permit {
    _slot: OwnedSemaphorePermit,
}

impl RateLimiter {
    /// Create a limiter allowing `capacity` calls per `window`, at most
    /// `max_concurrent` in flight, with an optional inter-call spacing floor.
    pub fn new(
        name: &'static str,
        capacity: u32,
        window: Duration,
        max_concurrent: u32,
        min_interval: Option<Duration>,
    ) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            window,
            min_interval,
            slots: Arc::new(Semaphore::new(max_concurrent.max(1) as usize)),
            reservoir: Mutex::new(Reservoir {
                window_start: Instant::now(),
                tokens_used: 0,
                last_admission: None,
            }),
        }
    }

    /// Limiter allowing `requests_per_minute` calls on a one-minute window.
    pub fn per_minute(
        name: &'static str,
        requests_per_minute: u32,
        max_concurrent: u32,
        min_interval: Option<Duration>,
    ) -> Self {
        Self::new(
            name,
            requests_per_minute,
            Duration::from_secs(60),
            max_concurrent,
            min_interval,
        )
    }

    /// Wait until a token and an in-flight slot are available, then take both.
    ///
    /// Infallible: waits as long as necessary.
    pub async fn admit(&self) -> Permit {
        let slot = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .expect("rate limiter semaphore never closes");

        let mut reservoir = self.reservoir.lock().await;
        loop {
            let now = Instant::now();

            // Roll forward to the window containing `now`; refill wipes any
            // unused tokens, no carry-over.
            if now >= reservoir.window_start + self.window {
                let elapsed_windows =
                    (now - reservoir.window_start).as_nanos() / self.window.as_nanos().max(1);
                reservoir.window_start += self.window * elapsed_windows as u32;
                reservoir.tokens_used = 0;
            }

            if reservoir.tokens_used >= self.capacity {
                let next_window = reservoir.window_start + self.window;
                debug!(
                    limiter = self.name,
                    wait_ms = (next_window - now).as_millis() as u64,
                    "reservoir exhausted, waiting for next window"
                );
                sleep_until(next_window).await;
                continue;
            }

            // Spacing floor. The lock stays held across this sleep on
            // purpose: admissions must be serialized for spacing to hold.
            // Re-run the window roll and token check after waking; the sleep
            // may have crossed a window boundary, and the token must come
            // out of the window the admission actually lands in.
            if let (Some(interval), Some(last)) = (self.min_interval, reservoir.last_admission) {
                let ready_at = last + interval;
                if now < ready_at {
                    debug!(
                        limiter = self.name,
                        wait_ms = (ready_at - now).as_millis() as u64,
                        "spacing floor, delaying admission"
                    );
                    sleep_until(ready_at).await;
                    continue;
                }
            }

            reservoir.tokens_used += 1;
            reservoir.last_admission = Some(Instant::now());
            return Permit { _slot: slot };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_admissions_within_capacity_are_immediate() {
        let limiter = RateLimiter::new("test", 3, Duration::from_secs(60), 10, None);
        let start = Instant::now();
        for _ in 0..3 {
            drop(limiter.admit().await);
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reservoir_refills_at_window_boundary() {
        let limiter = RateLimiter::new("test", 2, Duration::from_secs(60), 10, None);
        let start = Instant::now();
        drop(limiter.admit().await);
        drop(limiter.admit().await);
        // Third admission must wait out the rest of the window.
        drop(limiter.admit().await);
        assert!(start.elapsed() >= Duration::from_secs(60));
        // And the refill grants a full window again.
        drop(limiter.admit().await);
        assert!(start.elapsed() < Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_spaces_admissions() {
        let limiter = RateLimiter::new(
            "test",
            100,
            Duration::from_secs(60),
            10,
            Some(Duration::from_millis(1500)),
        );
        let start = Instant::now();
        drop(limiter.admit().await);
        drop(limiter.admit().await);
        drop(limiter.admit().await);
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spacing_sleep_across_window_boundary_respects_capacity() {
        // First admission lands late in a window; the spacing delay pushes
        // the second one past the boundary. That token must be charged to
        // the window the admission lands in, so the new window still only
        // grants `capacity` calls in total.
        let limiter = RateLimiter::new(
            "test",
            2,
            Duration::from_secs(60),
            10,
            Some(Duration::from_secs(10)),
        );
        let start = Instant::now();

        tokio::time::sleep(Duration::from_secs(55)).await;
        drop(limiter.admit().await); // t=55s, first window
        drop(limiter.admit().await); // spacing carries this to t=65s, second window
        drop(limiter.admit().await); // t=75s, second window now full

        // Fourth admission must wait out the second window entirely.
        drop(limiter.admit().await);
        assert!(start.elapsed() >= Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bound_blocks_extra_admission() {
        let limiter = Arc::new(RateLimiter::new("test", 100, Duration::from_secs(60), 2, None));

        let first = limiter.admit().await;
        let _second = limiter.admit().await;

        let third = tokio::spawn({
            let limiter = Arc::clone(&limiter);
            async move {
                let _permit = limiter.admit().await;
            }
        });

        // Give the third admission every chance to (incorrectly) complete.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!third.is_finished());

        drop(first);
        third.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_permit_released_on_drop() {
        let limiter = RateLimiter::new("test", 100, Duration::from_secs(60), 1, None);
        drop(limiter.admit().await);
        // Would deadlock if the slot were not returned.
        drop(limiter.admit().await);
    }
}
