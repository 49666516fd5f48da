//! Fire-and-forget execution of inference tickets.
//!
//! The selection state machine runs on a single synchronous thread and must
//! never wait for the network. [`InferenceDispatcher`] owns a small Tokio
//! runtime, runs each [`InferenceTicket`] on it, and queues the finished
//! [`InferenceOutcome`] for the owner to collect and pass to
//! [`MapSession::resolve`](inspection_core::MapSession::resolve).

use std::sync::Arc;

use inspection_core::{InferenceError, InferenceOutcome, InferenceService, InferenceTicket};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::ClientBuildError;

/// Runs inference tickets in the background and queues their outcomes.
///
/// Outcomes arrive in completion order, not dispatch order. Every dispatched
/// ticket yields exactly one outcome: a service call that panics is reported
/// as [`InferenceError::Aborted`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use inspection_core::{InferenceKind, MapSession};
/// use inspection_data::inference::{HttpInferenceClient, InferenceDispatcher};
///
/// # fn run(mut session: MapSession) -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpInferenceClient::new("http://localhost:8000")?;
/// let mut dispatcher = InferenceDispatcher::new(Arc::new(client))?;
///
/// dispatcher.dispatch(session.request(InferenceKind::Predict)?);
/// while let Some(outcome) = dispatcher.next_blocking() {
///     if let Some(notice) = session.resolve(outcome) {
///         println!("{notice}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct InferenceDispatcher {
    service: Arc<dyn InferenceService>,
    runtime: Runtime,
    sender: UnboundedSender<InferenceOutcome>,
    receiver: UnboundedReceiver<InferenceOutcome>,
    pending: usize,
}

impl std::fmt::Debug for InferenceDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceDispatcher")
            .field("service", &"<dyn InferenceService>")
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl InferenceDispatcher {
    /// Create a dispatcher running requests against `service`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::Runtime`] if the Tokio runtime fails to
    /// build.
    pub fn new(service: Arc<dyn InferenceService>) -> Result<Self, ClientBuildError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("inspection-inference")
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok(Self {
            service,
            runtime,
            sender,
            receiver,
            pending: 0,
        })
    }

    /// Start running `ticket` and return immediately.
    pub fn dispatch(&mut self, ticket: InferenceTicket) {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        log::debug!(
            "dispatching {} request for generation {}",
            ticket.kind,
            ticket.generation
        );
        self.pending += 1;
        let kind = ticket.kind;
        let features = ticket.features.clone();
        let call = self
            .runtime
            .spawn(async move { service.run(kind, &features).await });
        self.runtime.spawn(async move {
            let result = call.await.unwrap_or_else(|join_error| {
                log::warn!("{kind} task aborted: {join_error}");
                Err(InferenceError::Aborted {
                    message: join_error.to_string(),
                })
            });
            if sender.send(ticket.complete(result)).is_err() {
                log::debug!("inference outcome dropped: dispatcher closed");
            }
        });
    }

    /// Number of dispatched tickets whose outcome has not been collected.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Collect a finished outcome without waiting.
    pub fn try_next(&mut self) -> Option<InferenceOutcome> {
        let outcome = self.receiver.try_recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(outcome)
    }

    /// Wait for the next outcome.
    ///
    /// Returns `None` once every dispatched ticket has been collected. Must
    /// not be called from inside an async context.
    pub fn next_blocking(&mut self) -> Option<InferenceOutcome> {
        if self.pending == 0 {
            return None;
        }
        let Self {
            runtime, receiver, ..
        } = self;
        let outcome = runtime.block_on(receiver.recv())?;
        self.pending = self.pending.saturating_sub(1);
        Some(outcome)
    }
}
