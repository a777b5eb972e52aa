// ABOUTME: writes append-only audit records for each completed canary action.
// ABOUTME: merges invocation identity into the record and logs it as one json line.

use chrono::{SecondsFormat, Utc};
use little_canary_common::{Activity, AuditRecord};
use tokio::io::AsyncWriteExt;

use crate::error::{CanaryError, Result};
use crate::runner::Invocation;

pub fn build_record(invocation: &Invocation, activity: Activity) -> AuditRecord {
    AuditRecord {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        username: invocation.username.clone(),
        proc_name: invocation.program_name.clone(),
        proc_command: invocation.args.join(" "),
        pid: invocation.pid,
        activity,
    }
}

/// Appends one record to the invocation's audit log, creating the file if needed.
///
/// The whole line, newline included, goes out in a single append-mode write
/// so concurrent canaries sharing the log never interleave partial lines.
pub async fn append_record(invocation: &Invocation, activity: Activity) -> Result<AuditRecord> {
    let record = build_record(invocation, activity);

    let mut line = serde_json::to_vec(&record)?;
    line.push(b'\n');

    let audit_path = &invocation.audit_path;
    let audit_err = |source| CanaryError::Audit {
        path: audit_path.clone(),
        source,
    };

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(audit_path)
        .await
        .map_err(audit_err)?;

    file.write_all(&line).await.map_err(audit_err)?;
    file.flush().await.map_err(audit_err)?;

    log::info!(
        "recorded {} activity in {}",
        activity_type(&record.activity),
        audit_path.display()
    );
    Ok(record)
}

fn activity_type(activity: &Activity) -> &'static str {
    match activity {
        Activity::Proc => "proc",
        Activity::File { .. } => "file",
        Activity::Net { .. } => "net",
    }
}
