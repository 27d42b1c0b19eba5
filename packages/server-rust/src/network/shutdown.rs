//! Serving lifecycle and in-flight request accounting for the HTTP transport.
//!
//! The MCP handler takes an [`InFlightGuard`] per POST; shutdown waits for
//! the last guard to drop, woken by a [`Notify`] rather than by polling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::Notify;

/// Starting -> Ready -> Draining -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Starting,
    Ready,
    Draining,
    /// Drained: no request was in flight when the drain finished.
    Stopped,
}

impl HealthState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicU64,
    idle: Notify,
}

/// Shared by the handlers, the health probes and [`super::NetworkModule`].
#[derive(Debug)]
pub struct ShutdownController {
    in_flight: Arc<InFlight>,
    state: ArcSwap<HealthState>,
}

impl ShutdownController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_flight: Arc::default(),
            state: ArcSwap::from_pointee(HealthState::Starting),
        }
    }

    pub fn set_ready(&self) {
        self.state.store(Arc::new(HealthState::Ready));
    }

    /// New MCP posts are refused with 503 from here on.
    pub fn trigger_shutdown(&self) {
        self.state.store(Arc::new(HealthState::Draining));
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.count.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.count.load(Ordering::Acquire)
    }

    /// Waits until no request is in flight or `timeout` passes.
    ///
    /// On success the state becomes `Stopped` and `true` is returned; on
    /// timeout the state is left as it was.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let drained = tokio::time::timeout(timeout, async {
            loop {
                let idle = self.in_flight.idle.notified();
                if self.in_flight_count() == 0 {
                    return;
                }
                idle.await;
            }
        })
        .await
        .is_ok();

        if drained {
            self.state.store(Arc::new(HealthState::Stopped));
        }
        drained
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts one request as in flight until dropped, including on panic or
/// cancellation of the handler future.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_states() {
        let controller = ShutdownController::default();
        let states = [
            controller.health_state(),
            {
                controller.set_ready();
                controller.health_state()
            },
            {
                controller.trigger_shutdown();
                controller.health_state()
            },
        ];
        assert_eq!(
            states.map(HealthState::as_str),
            ["starting", "ready", "draining"]
        );
    }

    #[test]
    fn guards_count_requests() {
        let controller = ShutdownController::new();
        let guards: Vec<_> = (0..3).map(|_| controller.in_flight_guard()).collect();
        assert_eq!(controller.in_flight_count(), 3);

        drop(guards);
        assert_eq!(controller.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn idle_controller_drains_immediately() {
        let controller = ShutdownController::new();
        controller.trigger_shutdown();
        assert!(controller.wait_for_drain(Duration::ZERO).await);
        assert_eq!(controller.health_state(), HealthState::Stopped);
    }

    #[tokio::test]
    async fn drain_wakes_when_last_guard_drops() {
        let controller = Arc::new(ShutdownController::new());
        controller.set_ready();
        let first = controller.in_flight_guard();
        let second = controller.in_flight_guard();
        controller.trigger_shutdown();

        let releaser = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(first);
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(second);
        });

        assert!(controller.wait_for_drain(Duration::from_secs(5)).await);
        assert_eq!(controller.in_flight_count(), 0);
        assert_eq!(controller.health_state(), HealthState::Stopped);
        releaser.await.unwrap();
    }

    #[tokio::test]
    async fn drain_gives_up_after_timeout() {
        let controller = ShutdownController::new();
        controller.set_ready();
        let _stuck = controller.in_flight_guard();
        controller.trigger_shutdown();

        assert!(!controller.wait_for_drain(Duration::from_millis(30)).await);
        assert_eq!(controller.health_state(), HealthState::Draining);
    }
}
