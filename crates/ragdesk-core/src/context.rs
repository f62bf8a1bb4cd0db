//! Request context for a single question or index write.
//!
//! `RequestContext` carries the cancellation token and optional deadline that
//! every external call (embed, completion, vector-store query) made on behalf
//! of one request must honour. `run()` wraps such a call so that cancellation
//! or an expired deadline surfaces as [`RagError::Cancelled`] /
//! [`RagError::TimedOut`] instead of the call's own result.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use ragdesk_types::error::RagError;

/// Cancellation and deadline scope shared by the external calls of one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (used in logs).
    pub request_id: Uuid,
    /// Cancelling this token aborts every pending call made through `run()`.
    pub cancellation: CancellationToken,
    deadline: Option<(Instant, u64)>,
}

impl RequestContext {
    /// Create a context with no deadline.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now for all calls made through this context.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.deadline = Some((Instant::now() + timeout, millis));
        self
    }

    /// Apply an optional timeout in milliseconds (as stored in configuration).
    pub fn with_timeout_ms(self, timeout_ms: Option<u64>) -> Self {
        match timeout_ms {
            Some(ms) => self.with_timeout(Duration::from_millis(ms)),
            None => self,
        }
    }

    /// Derive a context whose token is cancelled with this one (but not vice versa).
    pub fn child(&self) -> Self {
        Self {
            request_id: self.request_id,
            cancellation: self.cancellation.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Await an external call under this context's cancellation and deadline.
    pub async fn run<F, T, E>(&self, call: F) -> Result<T, RagError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<RagError>,
    {
        if self.cancellation.is_cancelled() {
            return Err(RagError::Cancelled);
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => Err(RagError::Cancelled),
                result = call => result.map_err(Into::into),
            }
        };

        match self.deadline {
            Some((deadline, millis)) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(RagError::TimedOut(millis))),
            None => guarded.await,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
