// ABOUTME: dispatches one canary invocation to its executor and records the completed action.
// ABOUTME: malformed invocations return a usage outcome and never touch the audit log.

use std::path::PathBuf;

use little_canary_common::{parse_action, Action, Usage};

use crate::actions;
use crate::audit;
use crate::error::Result;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_AUDIT_PATH: &str = "activity.log";

/// Identity and arguments of a single canary run.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program_name: String,
    /// Words after the program name.
    pub args: Vec<String>,
    pub pid: u32,
    pub username: String,
    pub audit_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Usage(Usage),
    Version(&'static str),
}

pub async fn run(invocation: &Invocation) -> Result<Outcome> {
    let action = match parse_action(invocation.args.as_slice()) {
        Ok(action) => action,
        Err(usage) => return Ok(Outcome::Usage(usage)),
    };

    let activity = match &action {
        Action::Proc(proc) => actions::exec::run(proc).await?,
        Action::File(file) => actions::files::run(file).await?,
        Action::Net(net) => actions::net::run(net).await?,
        Action::Version => return Ok(Outcome::Version(VERSION)),
    };

    audit::append_record(invocation, activity).await?;
    Ok(Outcome::Completed)
}
