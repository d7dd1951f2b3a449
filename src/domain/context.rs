//! Cancellable execution context handed to command handlers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::error::{DomainError, DomainResult};

/// Cancellation flag plus optional deadline.
///
/// The dispatcher only passes the context through; cancelling is up to the
/// caller (via [`CancelHandle`]) and honouring it is up to the handler.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

/// Caller side of an [`ExecContext`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that counts as cancelled once `timeout` has elapsed.
    ///
    /// A timeout too large to represent as an `Instant` never expires.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(Cancelled)` once cancelled or past the deadline.
    pub fn check(&self) -> DomainResult<()> {
        if self.is_cancelled() {
            Err(DomainError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_cancel_handle_when_cancelled_then_context_reports_it() {
        let ctx = ExecContext::new();
        assert!(ctx.check().is_ok());

        ctx.cancel_handle().cancel();

        assert!(ctx.is_cancelled());
        assert_eq!(ctx.check(), Err(DomainError::Cancelled));
    }

    #[test]
    fn given_elapsed_timeout_when_checking_then_cancelled() {
        let ctx = ExecContext::with_timeout(Duration::ZERO);
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn given_unrepresentable_timeout_when_creating_then_never_expires() {
        let ctx = ExecContext::with_timeout(Duration::MAX);

        assert_eq!(ctx.deadline(), None);
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn given_timeout_when_creating_then_deadline_lies_ahead() {
        let before = Instant::now();

        let ctx = ExecContext::with_timeout(Duration::from_secs(60));

        let deadline = ctx.deadline().expect("deadline should be set");
        assert!(deadline >= before + Duration::from_secs(60));
        assert!(!ctx.is_cancelled());
        assert_eq!(ExecContext::new().deadline(), None);
    }

    #[test]
    fn given_clone_when_cancelling_original_then_clone_sees_it() {
        let ctx = ExecContext::new();
        let copy = ctx.clone();
        ctx.cancel_handle().cancel();
        assert!(copy.is_cancelled());
    }
}
