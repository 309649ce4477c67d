//! Status Polling
//!
//! Long-running backend jobs (route optimization, import sessions) expose a
//! status endpoint. A poll loop refetches that signature on a fixed interval
//! while the job is processing and stops the instant the status is terminal.
//! One task per resource keeps ticks serialized; aborting the JoinHandle
//! cancels the loop.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::JobStatus;
use crate::query::client::{Backend, QueryClient};
use crate::query::signature::Signature;

/// Interval the console uses for job-status endpoints.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

// == Spawn Status Poll ==
/// Polls a job-status signature until its `status` field is terminal.
///
/// The current value is checked first: a resource that is already terminal
/// is never polled. Resolves with the final payload; a fetch failure ends
/// the loop and propagates (the consumer decides whether to re-subscribe).
pub fn spawn_status_poll<B>(
    client: Arc<QueryClient<B>>,
    signature: Signature,
    interval: Duration,
) -> JoinHandle<Result<Value>>
where
    B: Backend + 'static,
{
    spawn_poll_until(client, signature, interval, |payload| {
        JobStatus::from_payload(payload).is_terminal()
    })
}

/// Polls a signature until the given predicate reports a terminal payload.
pub fn spawn_poll_until<B, F>(
    client: Arc<QueryClient<B>>,
    signature: Signature,
    interval: Duration,
    is_terminal: F,
) -> JoinHandle<Result<Value>>
where
    B: Backend + 'static,
    F: Fn(&Value) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        let current = client.read(&signature).await?;
        if is_terminal(&current) {
            debug!(signature = %signature, "resource already terminal, not polling");
            return Ok(current);
        }

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately; the initial
        // read above already covered it.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let payload = client.refetch(&signature).await?;
            if is_terminal(&payload) {
                info!(signature = %signature, "poll loop reached terminal status");
                return Ok(payload);
            }
            debug!(signature = %signature, "still processing");
        }
    })
}
