//! Email verification flow.
//!
//! Drives the verification state machine against the collaborator for a
//! single token. The flow is re-entrant through `retry()` - each retry is a
//! fresh, independent attempt with no limit and no backoff - but never
//! issues two concurrent calls for the same token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use maplefront_core::machine::verify::{VerifyAction, VerifyEvent, VerifyState, advance};

use crate::remote::{ApiError, StorefrontApi};

/// Failure message shown when the entry URL carries no token.
pub const MISSING_TOKEN_MESSAGE: &str = "No verification token was provided.";

/// Failure message used when the collaborator gives none.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Verification failed. The link may be invalid or expired.";

/// A single token's verification attempt.
pub struct VerificationFlow<A> {
    remote: A,
    token: Option<String>,
    state: Mutex<VerifyState>,
    calling: AtomicBool,
}

impl<A: StorefrontApi> VerificationFlow<A> {
    /// Create the flow for the token supplied by the entry URL.
    ///
    /// With a token present the initial state is `Loading` (the caller
    /// drives the first attempt with [`run`](Self::run)); with the token
    /// missing or empty the flow starts in `Failure` with a fixed message
    /// and never makes a network call.
    pub fn new(remote: A, token: Option<&str>) -> Self {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned);

        let state = if token.is_some() {
            VerifyState::Loading
        } else {
            VerifyState::Failure {
                message: MISSING_TOKEN_MESSAGE.to_owned(),
            }
        };

        Self {
            remote,
            token,
            state: Mutex::new(state),
            calling: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn status(&self) -> VerifyState {
        self.lock().clone()
    }

    /// Drive the outstanding attempt to completion.
    ///
    /// A no-op unless the flow is in `Loading` with no call already
    /// running, so concurrent invocations collapse into one collaborator
    /// call.
    pub async fn run(&self) -> VerifyState {
        let Some(token) = self.token.clone() else {
            return self.status();
        };

        if !self.status().is_loading() {
            return self.status();
        }

        if self.calling.swap(true, Ordering::SeqCst) {
            return self.status();
        }

        let event = match self.remote.verify_email(&token).await {
            Ok(Some(message)) => VerifyEvent::Succeeded { message },
            Ok(None) => VerifyEvent::Failed {
                message: FALLBACK_FAILURE_MESSAGE.to_owned(),
            },
            Err(ApiError::Status {
                message: Some(message),
                ..
            }) => VerifyEvent::Failed { message },
            Err(_) => VerifyEvent::Failed {
                message: FALLBACK_FAILURE_MESSAGE.to_owned(),
            },
        };

        let state = self.apply(event);
        self.calling.store(false, Ordering::SeqCst);
        state
    }

    /// Re-enter `Loading` and repeat the call.
    ///
    /// Valid only from `Failure`; a retry while a call is outstanding or
    /// after success is a no-op.
    pub async fn retry(&self) -> VerifyState {
        // Without a token there is nothing to retry; the fixed failure
        // message stands.
        if self.token.is_none() {
            return self.status();
        }

        let action = {
            let mut guard = self.lock();
            let current = std::mem::replace(&mut *guard, VerifyState::Loading);
            let (next, action) = advance(current, VerifyEvent::Retry);
            *guard = next;
            action
        };

        match action {
            VerifyAction::StartCall => self.run().await,
            VerifyAction::None => self.status(),
        }
    }

    fn apply(&self, event: VerifyEvent) -> VerifyState {
        let mut guard = self.lock();
        let current = std::mem::replace(&mut *guard, VerifyState::Loading);
        let (next, _) = advance(current, event);
        *guard = next.clone();
        next
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VerifyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
