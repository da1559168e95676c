//! Two-step confirmation guard for destructive actions.
//!
//! Any destructive delete goes through the same protocol: arm the flow with
//! the target's id (which fetches a fresh display summary), then either
//! `confirm()` - which runs the commit operation exactly once - or
//! `cancel()` - which discards the request without a network call. The
//! protocol is written once here and bound to concrete fetch/commit
//! operations by the storefront (cart items) and admin (products) crates.
//!
//! The transition rules live in [`advance`], a pure reducer; the
//! [`ConfirmationFlow`] driver wraps it with the state lock and runs the
//! injected async operations.

use std::sync::{Mutex, PoisonError};

/// A short-lived pairing of a destructive action with its user-visible
/// preview.
///
/// Created when the user initiates a delete, discarded once the flow
/// settles; it is not reusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest<S> {
    /// Identity of the entity the delete targets.
    pub target: String,
    /// Freshly fetched display summary. `None` when the preview fetch
    /// failed; the confirm/cancel choice stays available regardless.
    pub summary: Option<S>,
}

/// Lifecycle of a confirmation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState<S> {
    /// No destructive action is pending.
    Idle,
    /// A request is armed and waiting for the user's decision.
    Awaiting(ConfirmationRequest<S>),
    /// The commit operation is running; further clicks are ignored.
    Committing {
        /// Identity of the entity being deleted.
        target: String,
    },
}

impl<S> ConfirmState<S> {
    /// Whether the flow has no pending request.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the flow is waiting for a confirm/cancel decision.
    #[must_use]
    pub const fn is_awaiting(&self) -> bool {
        matches!(self, Self::Awaiting(_))
    }
}

/// Events fed to [`advance`].
#[derive(Debug)]
pub enum ConfirmEvent<S> {
    /// A delete was initiated and its summary fetch settled.
    Arm(ConfirmationRequest<S>),
    /// The user confirmed the pending request.
    Confirm,
    /// The user cancelled the pending request.
    Cancel,
    /// The commit operation settled, successfully or not.
    Settled,
}

/// Side effect the caller must run after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Nothing to run.
    None,
    /// Run the commit operation against `target`, then feed
    /// [`ConfirmEvent::Settled`].
    RunCommit {
        /// Identity of the entity to delete.
        target: String,
    },
}

/// Pure transition function for the confirmation protocol.
///
/// Invalid (state, event) pairs leave the state untouched and request no
/// action; this is what makes repeated confirm clicks harmless.
pub fn advance<S>(
    state: ConfirmState<S>,
    event: ConfirmEvent<S>,
) -> (ConfirmState<S>, ConfirmAction) {
    match (state, event) {
        (ConfirmState::Idle, ConfirmEvent::Arm(request)) => {
            (ConfirmState::Awaiting(request), ConfirmAction::None)
        }
        (ConfirmState::Awaiting(request), ConfirmEvent::Confirm) => {
            let target = request.target;
            (
                ConfirmState::Committing {
                    target: target.clone(),
                },
                ConfirmAction::RunCommit { target },
            )
        }
        (ConfirmState::Awaiting(_), ConfirmEvent::Cancel) => {
            (ConfirmState::Idle, ConfirmAction::None)
        }
        (ConfirmState::Committing { .. }, ConfirmEvent::Settled) => {
            (ConfirmState::Idle, ConfirmAction::None)
        }
        (state, _) => (state, ConfirmAction::None),
    }
}

// =============================================================================
// Async driver
// =============================================================================

/// Operations a confirmation flow is parametrized by.
///
/// Implementors own the transport; the flow only sequences the calls.
pub trait ConfirmTarget {
    /// Display summary shown while awaiting the decision.
    type Summary: Clone + Send;
    /// Error surfaced from a failed commit.
    type Error: std::fmt::Display + Send;

    /// Fetch a fresh display summary for `target`.
    ///
    /// Stale list data must not be reused here; the preview is fetched at
    /// arm time. Implementors should log their own failures - the flow
    /// degrades to a placeholder summary and carries on.
    fn fetch_summary(
        &self,
        target: &str,
    ) -> impl Future<Output = Result<Self::Summary, Self::Error>> + Send;

    /// Run the destructive operation against `target`.
    fn commit(&self, target: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Outcome of [`ConfirmationFlow::confirm`].
#[derive(Debug)]
pub enum ConfirmOutcome<E> {
    /// The commit ran and the flow is back to idle. `error` carries a
    /// commit failure; the flow terminates either way and the caller
    /// decides what to show.
    Committed {
        /// The commit failure, if any.
        error: Option<E>,
    },
    /// No request was awaiting confirmation, so nothing ran.
    Ignored,
}

impl<E> ConfirmOutcome<E> {
    /// Whether the commit operation was invoked.
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Driver binding the pure protocol to a [`ConfirmTarget`].
pub struct ConfirmationFlow<T: ConfirmTarget> {
    ops: T,
    state: Mutex<ConfirmState<T::Summary>>,
}

impl<T: ConfirmTarget> ConfirmationFlow<T> {
    /// Create an idle flow over the given operations.
    pub fn new(ops: T) -> Self {
        Self {
            ops,
            state: Mutex::new(ConfirmState::Idle),
        }
    }

    /// Arm the flow for `target`.
    ///
    /// Fetches the display summary and enters `Awaiting`. A failed summary
    /// fetch still arms the flow with a placeholder so the delete remains
    /// possible. Arming a flow that is not idle is a no-op.
    pub async fn arm(&self, target: &str) -> ConfirmState<T::Summary> {
        let summary = self.ops.fetch_summary(target).await.ok();
        let request = ConfirmationRequest {
            target: target.to_owned(),
            summary,
        };
        self.apply(ConfirmEvent::Arm(request));
        self.state()
    }

    /// Confirm the pending request, running the commit exactly once.
    ///
    /// Valid only from `Awaiting`; repeated clicks while the commit is
    /// outstanding return [`ConfirmOutcome::Ignored`]. A failed commit is
    /// reported in the outcome but still settles the flow.
    pub async fn confirm(&self) -> ConfirmOutcome<T::Error> {
        let ConfirmAction::RunCommit { target } = self.apply(ConfirmEvent::Confirm) else {
            return ConfirmOutcome::Ignored;
        };

        let error = self.ops.commit(&target).await.err();
        self.apply(ConfirmEvent::Settled);

        ConfirmOutcome::Committed { error }
    }

    /// Cancel the pending request without any network call.
    ///
    /// Returns `true` when an awaiting request was discarded.
    pub fn cancel(&self) -> bool {
        let mut guard = self.lock();
        let was_awaiting = guard.is_awaiting();
        let current = std::mem::replace(&mut *guard, ConfirmState::Idle);
        let (next, _) = advance(current, ConfirmEvent::Cancel);
        *guard = next;
        was_awaiting
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ConfirmState<T::Summary> {
        self.lock().clone()
    }

    /// The pending request, when the flow is awaiting a decision.
    #[must_use]
    pub fn request(&self) -> Option<ConfirmationRequest<T::Summary>> {
        match &*self.lock() {
            ConfirmState::Awaiting(request) => Some(request.clone()),
            _ => None,
        }
    }

    fn apply(&self, event: ConfirmEvent<T::Summary>) -> ConfirmAction {
        let mut guard = self.lock();
        let current = std::mem::replace(&mut *guard, ConfirmState::Idle);
        let (next, action) = advance(current, event);
        *guard = next;
        action
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ConfirmState<T::Summary>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
