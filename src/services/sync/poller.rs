use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Handle to a running poll loop. Dropping it does not stop the loop;
/// call [`PollerHandle::stop`].
#[derive(Debug, Clone)]
pub struct PollerHandle {
    cancel: CancellationToken,
}

impl PollerHandle {
    /// Cancel future invocations. Safe to call more than once.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Fixed-interval driver for a fetch-and-reconcile cycle
pub struct Poller;

impl Poller {
    /// Invoke `cycle` immediately, then every `period`, until the returned
    /// handle is stopped. The cycle receives the loop's cancellation token so
    /// it can discard results that resolve after teardown.
    ///
    /// A failing cycle never stops the loop; error handling is the cycle's
    /// responsibility.
    pub fn start<F, Fut>(period: Duration, cycle: F) -> PollerHandle
    where
        F: Fn(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tick.tick() => cycle(token.clone()).await,
                }
            }
        });

        PollerHandle { cancel }
    }
}
