//! Construction of the per-shard BLAST argument vector.
//!
//! Every worker runs the same command, differing only in its `-query` and
//! `-out` bindings. `-num_threads 1` is deliberate: parallelism comes from
//! the shard fan-out, not from the tool.

use crate::cli::{BlastFunction, Strand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Column order of the tabular output, shared by workers and the merger.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "qseqid", "qstart", "qend", "qlen", "sseqid", "sstart", "send", "slen", "pident", "score",
];

/// Per-run search knobs that shape the fixed part of the argument vector.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub function: BlastFunction,
    pub strand: Strand,
    pub codon_table: u8,
}

/// The command template shared by every shard worker.
#[derive(Debug, Clone)]
pub struct SearchCommand {
    binary: PathBuf,
    fixed_args: Vec<OsString>,
}

impl SearchCommand {
    pub fn new(binary: &Path, database: &Path, options: &SearchOptions) -> Self {
        let mut args: Vec<OsString> = vec![
            "-db".into(),
            database.into(),
            "-num_threads".into(),
            "1".into(),
            "-outfmt".into(),
            format!("6 {}", OUTPUT_COLUMNS.join(" ")).into(),
        ];

        let strand = options.strand.flag_value();
        let table = options.codon_table.to_string();
        match options.function {
            BlastFunction::Blastn => {
                args.push("-strand".into());
                args.push(strand.into());
            }
            BlastFunction::Blastx => {
                args.push("-strand".into());
                args.push(strand.into());
                args.push("-query_gencode".into());
                args.push(table.into());
            }
            BlastFunction::Tblastx => {
                args.push("-strand".into());
                args.push(strand.into());
                args.push("-db_gencode".into());
                args.push(table.clone().into());
                args.push("-query_gencode".into());
                args.push(table.into());
            }
            BlastFunction::Tblastn => {
                args.push("-db_gencode".into());
                args.push(table.into());
            }
            BlastFunction::Blastp => {}
        }

        Self {
            binary: binary.to_path_buf(),
            fixed_args: args,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Full argument list for one shard worker.
    pub fn args_for(&self, shard: &Path, output: &Path) -> Vec<OsString> {
        let mut args = self.fixed_args.clone();
        args.push("-query".into());
        args.push(shard.into());
        args.push("-out".into());
        args.push(output.into());
        args
    }
}
