//! Retryable token-verification state machine.
//!
//! A single attempt runs `Loading -> Success` or `Loading -> Failure`;
//! `Failure -> Loading` on retry, with no retry limit and no backoff.
//! Success is terminal. The driver that performs the network call lives in
//! the storefront crate; this module only encodes the transitions.

/// States of a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyState {
    /// The verification call is outstanding.
    Loading,
    /// The token was accepted.
    Success {
        /// Human-readable result from the collaborator.
        message: String,
    },
    /// The token was rejected, missing, or the call failed.
    Failure {
        /// Human-readable result, server-provided when available.
        message: String,
    },
}

impl VerifyState {
    /// Whether a call is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the attempt settled successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The result message, meaningful only once the attempt settled.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Loading => None,
            Self::Success { message } | Self::Failure { message } => Some(message),
        }
    }
}

/// Events fed to [`advance`].
#[derive(Debug)]
pub enum VerifyEvent {
    /// The collaborator accepted the token.
    Succeeded {
        /// Server-provided result message.
        message: String,
    },
    /// The collaborator rejected the token or the call failed.
    Failed {
        /// Server-provided message, or the caller's fallback.
        message: String,
    },
    /// The user asked for another attempt.
    Retry,
}

/// Side effect the caller must run after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyAction {
    /// Nothing to run.
    None,
    /// Issue a fresh verification call, then feed `Succeeded`/`Failed`.
    StartCall,
}

/// Pure transition function for the verification protocol.
///
/// `Retry` while a call is outstanding is a no-op, which is what prevents
/// duplicate concurrent calls for the same token. `Retry` from `Success` is
/// also a no-op; a verified token stays verified.
#[must_use]
pub fn advance(state: VerifyState, event: VerifyEvent) -> (VerifyState, VerifyAction) {
    match (state, event) {
        (VerifyState::Loading, VerifyEvent::Succeeded { message }) => {
            (VerifyState::Success { message }, VerifyAction::None)
        }
        (VerifyState::Loading, VerifyEvent::Failed { message }) => {
            (VerifyState::Failure { message }, VerifyAction::None)
        }
        (VerifyState::Failure { .. }, VerifyEvent::Retry) => {
            (VerifyState::Loading, VerifyAction::StartCall)
        }
        (state, _) => (state, VerifyAction::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_settles() {
        let (state, action) = advance(
            VerifyState::Loading,
            VerifyEvent::Succeeded {
                message: "verified".to_owned(),
            },
        );
        assert!(state.is_success());
        assert_eq!(state.message(), Some("verified"));
        assert_eq!(action, VerifyAction::None);

        let (state, _) = advance(
            VerifyState::Loading,
            VerifyEvent::Failed {
                message: "expired".to_owned(),
            },
        );
        assert_eq!(state.message(), Some("expired"));
    }

    #[test]
    fn test_retry_from_failure_restarts() {
        let failure = VerifyState::Failure {
            message: "expired".to_owned(),
        };
        let (state, action) = advance(failure, VerifyEvent::Retry);
        assert!(state.is_loading());
        assert_eq!(action, VerifyAction::StartCall);
    }

    #[test]
    fn test_retry_is_noop_while_loading_or_after_success() {
        let (state, action) = advance(VerifyState::Loading, VerifyEvent::Retry);
        assert!(state.is_loading());
        assert_eq!(action, VerifyAction::None);

        let success = VerifyState::Success {
            message: "verified".to_owned(),
        };
        let (state, action) = advance(success, VerifyEvent::Retry);
        assert!(state.is_success());
        assert_eq!(action, VerifyAction::None);
    }
}
