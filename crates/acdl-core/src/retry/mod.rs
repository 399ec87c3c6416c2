//! Retry policy and loop.
//!
//! Fixed delay between attempts with a hard ceiling on the attempt count.
//! Every failure is retried; callers decide what a failure is.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryExhausted};
