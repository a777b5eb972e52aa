// ABOUTME: runs the lc canary binary for a single action and exits.
// ABOUTME: gathers invocation identity, then prints usage or version text when there is any.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use little_canary::{identity, Invocation, Outcome, DEFAULT_AUDIT_PATH};

#[derive(Debug, Parser)]
#[command(name = "lc")]
struct Args {
    #[arg(long, env = "LC_LOG_FILE", default_value = DEFAULT_AUDIT_PATH)]
    log_file: PathBuf,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    action: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = env_logger::try_init();
    let args = Args::parse();

    let program_name = std::env::args().next().unwrap_or_else(|| "lc".to_string());
    let invocation = Invocation {
        program_name,
        args: args.action,
        pid: std::process::id(),
        username: identity::current_username(),
        audit_path: args.log_file,
    };

    let outcome = little_canary::run(&invocation).await?;
    match &outcome {
        Outcome::Completed => Ok(ExitCode::SUCCESS),
        Outcome::Version(version) => {
            println!("{version}");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Usage(usage) => {
            log::debug!("rejected invocation {:?}", invocation.args);
            eprintln!("{usage}");
            Ok(ExitCode::from(2))
        }
    }
}
