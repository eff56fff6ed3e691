use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// A cloneable flag for cancelling a running optimization from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the "running" state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes the request.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// When a search must stop and hand back its best solution so far.
///
/// The default deadline never expires.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Option<Instant>,
    token: Option<CancelToken>,
}

impl Deadline {
    /// A deadline that never expires
    pub fn none() -> Self {
        Self::default()
    }

    /// Expire at a fixed instant
    pub fn at(instant: Instant) -> Self {
        Self {
            at: Some(instant),
            token: None,
        }
    }

    /// Expire `budget` from now. A budget too large to represent as an
    /// instant never expires.
    pub fn after(budget: Duration) -> Self {
        match Instant::now().checked_add(budget) {
            Some(at) => Self::at(at),
            None => Self::none(),
        }
    }

    /// Additionally expire when `token` is cancelled
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Has a time limit or a cancellation token been set?
    pub fn is_bounded(&self) -> bool {
        self.at.is_some() || self.token.is_some()
    }

    /// Cheap check of the cancellation token only
    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Full check: cancellation, then the clock
    pub fn is_expired(&self) -> bool {
        self.is_cancelled() || self.at.is_some_and(|at| Instant::now() >= at)
    }
}
