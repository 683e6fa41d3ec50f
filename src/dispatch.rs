//! Parallel fan-out of shard searches to independent worker processes.
//!
//! One OS process per shard, all launched before any join, all waited on
//! before any failure is reported. The returned output list preserves
//! shard order regardless of which worker finishes first; the merger
//! depends on that.

use crate::command::SearchCommand;
use crate::workspace::ScratchSpace;
use crate::ParablastError;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, warn};

/// One shard bound to its designated output file.
struct ShardTask {
    shard: PathBuf,
    output: PathBuf,
}

/// Run one worker per shard and return the output paths in shard order.
///
/// On any worker failure the whole dispatch fails, but only after every
/// worker has been waited on; surviving temp files are removed
/// best-effort before the error propagates.
pub fn dispatch(
    command: &SearchCommand,
    shards: Vec<PathBuf>,
    scratch: &ScratchSpace,
) -> Result<Vec<PathBuf>> {
    let mut tasks = Vec::with_capacity(shards.len());
    for shard in &shards {
        match scratch.allocate() {
            Ok(output) => tasks.push(ShardTask {
                shard: shard.clone(),
                output,
            }),
            Err(e) => {
                // The shards already exist on disk; a failed output
                // allocation must not leak them or the outputs handed
                // out so far.
                remove_temp_files(shards.iter().chain(tasks.iter().map(|t| &t.output)));
                return Err(e);
            }
        }
    }
    let outputs: Vec<PathBuf> = tasks.iter().map(|t| t.output.clone()).collect();
    let shard_paths: Vec<PathBuf> = tasks.iter().map(|t| t.shard.clone()).collect();

    // Launch every worker before joining any of them.
    let mut workers = Vec::with_capacity(tasks.len());
    for task in tasks {
        let binary = command.binary().to_path_buf();
        let args = command.args_for(&task.shard, &task.output);
        workers.push(thread::spawn(move || run_worker(binary, args, task.shard)));
    }

    // Wait for all, then report the first failure.
    let mut first_failure: Option<anyhow::Error> = None;
    for worker in workers {
        let result = worker
            .join()
            .unwrap_or_else(|_| Err(anyhow::anyhow!("worker thread panicked")));
        if let Err(e) = result {
            if first_failure.is_none() {
                first_failure = Some(e);
            }
        }
    }

    if let Some(e) = first_failure {
        remove_temp_files(shard_paths.iter().chain(outputs.iter()));
        return Err(e);
    }

    Ok(outputs)
}

/// Best-effort removal of temp files on a fatal path.
fn remove_temp_files<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to clean up temp file");
            }
        }
    }
}

/// Execute one shard search to completion.
///
/// The worker owns its shard input and deletes it on success; on failure
/// the shard is left in place for the dispatcher's cleanup pass.
fn run_worker(binary: PathBuf, args: Vec<OsString>, shard: PathBuf) -> Result<()> {
    debug!(binary = %binary.display(), shard = %shard.display(), "launching worker");

    let output = Command::new(&binary)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to run {}", binary.display()))?;

    if !output.status.success() {
        return Err(ParablastError::ToolFailed {
            tool: binary.display().to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    fs::remove_file(&shard)
        .with_context(|| format!("failed to remove consumed shard {}", shard.display()))?;
    debug!(shard = %shard.display(), "worker finished, shard removed");
    Ok(())
}
