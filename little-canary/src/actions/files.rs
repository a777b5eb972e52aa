// ABOUTME: implements the create, delete and modify file actions.
// ABOUTME: resolves the canonical path for the audit record, before deletion where it must.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use little_canary_common::{Activity, FileAction};
use tokio::io::AsyncWriteExt;

use crate::error::{CanaryError, Result};

pub async fn run(action: &FileAction) -> Result<Activity> {
    let path = Path::new(action.path());
    let resolved = match action {
        FileAction::Create { .. } => create(path).await?,
        FileAction::Delete { .. } => delete(path).await?,
        FileAction::Modify { content, .. } => modify(path, content).await?,
    };

    log::debug!("file {:?} on {}", action.activity(), resolved.display());
    Ok(Activity::File {
        activity: action.activity(),
        path: resolved.to_string_lossy().into_owned(),
    })
}

/// Touch semantics: create if absent, otherwise only bump the mtime.
async fn create(path: &Path) -> Result<PathBuf> {
    match tokio::fs::metadata(path).await {
        Ok(_) => {
            // read-only handle, so directories and read-only files can be touched too
            let existing = path.to_path_buf();
            tokio::task::spawn_blocking(move || std::fs::File::open(existing)?.set_modified(SystemTime::now()))
                .await
                .map_err(io::Error::from)??;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(tokio::fs::canonicalize(path).await?)
}

async fn delete(path: &Path) -> Result<PathBuf> {
    ensure_exists(path).await?;

    let resolved = tokio::fs::canonicalize(path).await?;
    tokio::fs::remove_file(path).await?;
    Ok(resolved)
}

async fn modify(path: &Path, content: &str) -> Result<PathBuf> {
    ensure_exists(path).await?;

    let mut file = tokio::fs::OpenOptions::new().append(true).open(path).await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;

    Ok(tokio::fs::canonicalize(path).await?)
}

async fn ensure_exists(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(CanaryError::FileNotFound(path.to_path_buf())),
        Err(err) => Err(err.into()),
    }
}
