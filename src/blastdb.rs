//! Transient BLAST database construction via makeblastdb.

use crate::cli::BlastFunction;
use crate::workspace::ScratchSpace;
use crate::ParablastError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Database alphabet, derived from the search function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Nucleotide,
    Protein,
}

impl DbType {
    /// The target of blastn / tblastn / tblastx is nucleotide, the rest
    /// search protein databases.
    pub fn for_function(function: BlastFunction) -> Self {
        match function {
            BlastFunction::Blastn | BlastFunction::Tblastn | BlastFunction::Tblastx => {
                DbType::Nucleotide
            }
            BlastFunction::Blastp | BlastFunction::Blastx => DbType::Protein,
        }
    }

    pub fn flag_value(self) -> &'static str {
        match self {
            DbType::Nucleotide => "nucl",
            DbType::Protein => "prot",
        }
    }
}

/// A database materialized for this run only, carrying the exact list of
/// files the indexing tool created under the allocated prefix.
#[derive(Debug)]
pub struct TransientDb {
    prefix: PathBuf,
    files: Vec<PathBuf>,
}

impl TransientDb {
    /// Prefix path to hand to the search command's `-db` flag.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Delete every file recorded in the manifest.
    pub fn remove(self) -> Result<()> {
        for file in &self.files {
            if file.exists() {
                fs::remove_file(file)
                    .with_context(|| format!("failed to remove {}", file.display()))?;
            }
        }
        Ok(())
    }
}

/// Index `fasta` into a searchable database under a freshly allocated
/// prefix. Fatal on non-zero exit.
pub fn build_database(
    makeblastdb: &Path,
    db_type: DbType,
    fasta: &Path,
    scratch: &ScratchSpace,
) -> Result<TransientDb> {
    let prefix = scratch.allocate()?;

    let output = Command::new(makeblastdb)
        .arg("-in")
        .arg(fasta)
        .arg("-dbtype")
        .arg(db_type.flag_value())
        .arg("-hash_index")
        .arg("-out")
        .arg(&prefix)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to run {}", makeblastdb.display()))?;

    if !output.status.success() {
        return Err(ParablastError::ToolFailed {
            tool: makeblastdb.display().to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    let files = manifest_for_prefix(&prefix)?;
    debug!(prefix = %prefix.display(), count = files.len(), "indexed transient database");
    Ok(TransientDb { prefix, files })
}

/// Snapshot the files sharing the prefix, taken once, immediately after
/// the tool exits. Later cleanup deletes exactly this list instead of
/// rescanning the directory; the prefix's random token guarantees no
/// user-supplied file can match.
fn manifest_for_prefix(prefix: &Path) -> Result<Vec<PathBuf>> {
    let dir = prefix
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = prefix
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to scan {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(&name) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
