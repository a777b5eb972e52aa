// ABOUTME: executes the proc action by spawning a subprocess with its output discarded.
// ABOUTME: waits for the child to exit so the audit record follows a finished process.

use std::io;
use std::process::Stdio;

use little_canary_common::{Activity, ProcAction};
use tokio::process::Command;

use crate::error::{CanaryError, Result};

/// Characters that make a command line need `sh -c` rather than a direct exec.
const SHELL_META: &[char] = &[
    '*', '?', '{', '}', '[', ']', '<', '>', '(', ')', '~', '&', '|', '\\', '$', ';', '\'', '`', '"', '\n', '#',
    '=', '%',
];

fn needs_shell(command: &str) -> bool {
    command.contains(SHELL_META)
}

pub async fn run(proc: &ProcAction) -> Result<Activity> {
    let mut cmd = if needs_shell(&proc.command) {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(&proc.command);
        cmd
    } else {
        let mut words = proc.command.split_whitespace();
        let mut cmd = match words.next() {
            Some(program) => Command::new(program),
            None => {
                return Err(CanaryError::CommandNotFound {
                    command: proc.command.clone(),
                })
            }
        };
        cmd.args(words);
        cmd
    };

    cmd.stdout(Stdio::null()).stderr(Stdio::null());

    let status = match cmd.status().await {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CanaryError::CommandNotFound {
                command: proc.command.clone(),
            })
        }
        Err(err) => {
            return Err(CanaryError::Spawn {
                command: proc.command.clone(),
                source: err,
            })
        }
    };

    log::debug!("proc `{}` exited with {status}", proc.command);
    Ok(Activity::Proc)
}
