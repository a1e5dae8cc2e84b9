//! Retry engine for forwarded upstream calls.
//!
//! The classifier turns one attempt's result (already pre-classified by the
//! transport) into a stop/retry decision; the run loop drives attempts under a
//! fixed-delay [`RetryPolicy`] and reports a [`CallOutcome`].

mod classify;
mod outcome;
mod policy;
mod run;

pub use classify::{
    classify, classify_http_status, failure_kind, AttemptResult, FailureKind, RetryDecision,
    TransportFailureKind,
};
pub use outcome::{CallOutcome, Outcome, OutcomeStatus};
pub use policy::{PolicyError, RetryPolicy, DEFAULT_RETRYABLE_STATUS_CODES};
pub use run::execute;
