//! Throttle gate for global request pacing
//!
//! All outgoing requests pass through a single gate that guarantees a
//! minimum interval between any two consecutive grants, process-wide.
//! Intents are queued on a channel and processed strictly in submission
//! order by one serializer task; the task is the only owner of the pacing
//! state, so no lock is needed around it. Each intent carries its own
//! oneshot reply channel, so a grant can never be delivered to the wrong
//! caller.

use crate::CrawlError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};

/// One pending request intent, identified for logging and correlation
#[derive(Debug, Clone)]
pub struct RequestTicket {
    /// Monotonically increasing intent id
    pub id: u64,
    /// URL the caller intends to fetch once granted
    pub url: String,
}

/// Permission for a specific ticket to proceed now
#[derive(Debug)]
pub struct Grant {
    /// Id of the ticket this grant answers
    pub ticket_id: u64,
}

struct Intent {
    ticket: RequestTicket,
    reply: oneshot::Sender<Grant>,
}

/// Handle for submitting request intents to the gate
///
/// Cloning the handle shares the same underlying serializer task, so the
/// minimum-interval guarantee spans every clone.
#[derive(Clone)]
pub struct ThrottleGate {
    tx: mpsc::UnboundedSender<Intent>,
    next_id: Arc<AtomicU64>,
}

impl ThrottleGate {
    /// Spawns the serializer task and returns a handle to it
    ///
    /// The task runs until every handle (and every pending intent sender)
    /// has been dropped.
    pub fn spawn(min_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(serialize_grants(rx, min_interval));

        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Submits an intent for `url` and waits for its grant
    ///
    /// Returns once the gate decides it is safe to proceed. Intents are
    /// granted in submission order, each at least the configured interval
    /// after the previous grant.
    pub async fn acquire(&self, url: &str) -> Result<Grant, CrawlError> {
        let ticket = RequestTicket {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            url: url.to_string(),
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Intent {
                ticket,
                reply: reply_tx,
            })
            .map_err(|_| CrawlError::ThrottleClosed)?;

        reply_rx.await.map_err(|_| CrawlError::ThrottleClosed)
    }
}

/// Serializer loop: grants intents FIFO, spaced at least `min_interval` apart
async fn serialize_grants(mut rx: mpsc::UnboundedReceiver<Intent>, min_interval: Duration) {
    // No previous grant: the first intent is never delayed.
    let mut last_granted: Option<Instant> = None;

    while let Some(intent) = rx.recv().await {
        if let Some(last) = last_granted {
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        last_granted = Some(Instant::now());
        tracing::trace!(
            "Granting request {} for {}",
            intent.ticket.id,
            intent.ticket.url
        );

        // The caller may have timed out and dropped its receiver; the grant
        // slot is consumed either way so the spacing invariant holds.
        let _ = intent.reply.send(Grant {
            ticket_id: intent.ticket.id,
        });
    }
}
