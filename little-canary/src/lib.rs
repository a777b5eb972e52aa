// ABOUTME: executes one observable canary action per invocation and audits it.
// ABOUTME: exposes the dispatcher, executors and audit log writer used by the lc binary.

pub mod actions;
pub mod audit;
pub mod error;
pub mod identity;
pub mod runner;

pub use error::{CanaryError, Result};
pub use runner::{run, Invocation, Outcome, DEFAULT_AUDIT_PATH, VERSION};
