//! Reducer-style state machines.
//!
//! Each machine is a plain state-transition function taking the current
//! state and an event and returning the next state plus the side effect the
//! caller must run. The machines are independent of any rendering framework
//! and of the transport behind the operations they guard.
//!
//! - [`confirm`] - two-step guard for destructive deletes, instantiated for
//!   cart items and for admin-managed products
//! - [`verify`] - retryable token-verification attempt

pub mod confirm;
pub mod verify;

pub use confirm::{
    ConfirmAction, ConfirmEvent, ConfirmOutcome, ConfirmState, ConfirmTarget, ConfirmationFlow,
    ConfirmationRequest,
};
pub use verify::{VerifyAction, VerifyEvent, VerifyState};
