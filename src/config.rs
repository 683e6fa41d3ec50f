//! Resolved locations of the external BLAST binaries.
//!
//! Discovery happens exactly once, here; core components receive paths
//! through this struct instead of consulting the environment themselves.

use crate::cli::{BlastFunction, Cli};
use crate::ParablastError;
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    pub makeblastdb: Option<PathBuf>,
    pub blastn: Option<PathBuf>,
    pub blastp: Option<PathBuf>,
    pub blastx: Option<PathBuf>,
    pub tblastn: Option<PathBuf>,
    pub tblastx: Option<PathBuf>,
}

impl ToolPaths {
    /// Resolve from explicit CLI flags, falling back to $PATH discovery.
    pub fn resolve(cli: &Cli) -> Self {
        fn find(explicit: &Option<PathBuf>, name: &str) -> Option<PathBuf> {
            explicit.clone().or_else(|| which::which(name).ok())
        }

        Self {
            makeblastdb: find(&cli.makeblastdb, "makeblastdb"),
            blastn: find(&cli.blastn, "blastn"),
            blastp: find(&cli.blastp, "blastp"),
            blastx: find(&cli.blastx, "blastx"),
            tblastn: find(&cli.tblastn, "tblastn"),
            tblastx: find(&cli.tblastx, "tblastx"),
        }
    }

    /// Binary for the selected search function, verified executable.
    pub fn for_function(&self, function: BlastFunction) -> Result<&Path> {
        let path = match function {
            BlastFunction::Blastn => &self.blastn,
            BlastFunction::Blastp => &self.blastp,
            BlastFunction::Blastx => &self.blastx,
            BlastFunction::Tblastn => &self.tblastn,
            BlastFunction::Tblastx => &self.tblastx,
        };
        require(path.as_deref(), function.name())
    }

    pub fn require_makeblastdb(&self) -> Result<&Path> {
        require(self.makeblastdb.as_deref(), "makeblastdb")
    }
}

fn require<'a>(path: Option<&'a Path>, name: &str) -> Result<&'a Path> {
    match path {
        Some(p) if is_executable(p) => Ok(p),
        _ => Err(ParablastError::ToolMissing(name.to_string()).into()),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
