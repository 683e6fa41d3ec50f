//! End-to-end orchestration: build (optional) -> split -> dispatch -> merge.

use crate::blastdb::{self, DbType, TransientDb};
use crate::cli::Cli;
use crate::command::{SearchCommand, SearchOptions};
use crate::config::ToolPaths;
use crate::dispatch;
use crate::merge;
use crate::split;
use crate::workspace::ScratchSpace;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Timestamped phase line on stdout, the tool's primary progress output.
fn phase(message: &str) {
    println!(
        "{} -> {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    );
}

pub fn run(cli: Cli) -> Result<()> {
    // Binaries are resolved once, up front; a missing required tool is
    // fatal before any sharding starts.
    let tools = ToolPaths::resolve(&cli);
    let search_binary = tools.for_function(cli.function)?.to_path_buf();

    let threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    let scratch_dir = match &cli.temp_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let scratch = ScratchSpace::new(scratch_dir);

    // A readable regular file is a raw FASTA that needs indexing first;
    // anything else is taken as a pre-built database prefix.
    let transient_db: Option<TransientDb> = if cli.target.is_file() {
        let makeblastdb = tools.require_makeblastdb()?;
        phase("Making database for blast.");
        let db = blastdb::build_database(
            makeblastdb,
            DbType::for_function(cli.function),
            &cli.target,
            &scratch,
        )?;
        phase("Done.");
        Some(db)
    } else {
        None
    };

    let database = transient_db
        .as_ref()
        .map(|db| db.prefix().to_path_buf())
        .unwrap_or_else(|| cli.target.clone());

    let options = SearchOptions {
        function: cli.function,
        strand: cli.strand,
        codon_table: cli.codon_table,
    };
    let command = SearchCommand::new(&search_binary, &database, &options);

    phase("Running blast.");
    let search_result = run_search(&command, &cli.query, threads, &scratch);

    // The transient database goes away before merging, whether or not the
    // search succeeded.
    if let Some(db) = transient_db {
        if let Err(e) = db.remove() {
            warn!("failed to remove transient database: {:#}", e);
        }
    }

    let outputs = search_result?;
    phase("Done.");

    if let Err(e) = merge::merge_outputs(&outputs, &cli.output) {
        best_effort_remove(&outputs);
        return Err(e);
    }
    phase("Finished.");

    Ok(())
}

/// Materialize all shards, then fan them out to the workers.
///
/// Zero shards (a query without records) is a no-op dispatch that returns
/// an empty output list.
fn run_search(
    command: &SearchCommand,
    query: &std::path::Path,
    threads: usize,
    scratch: &ScratchSpace,
) -> Result<Vec<PathBuf>> {
    let mut shards = Vec::new();
    for shard in split::split_fasta(query, threads, scratch)? {
        match shard {
            Ok(path) => shards.push(path),
            Err(e) => {
                best_effort_remove(&shards);
                return Err(e);
            }
        }
    }
    dispatch::dispatch(command, shards, scratch)
}

fn best_effort_remove(paths: &[PathBuf]) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove temp file");
            }
        }
    }
}
