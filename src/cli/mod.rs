use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "parablast",
    version,
    about = "Run BLAST searches in parallel by sharding the query file",
    long_about = "Parablast splits a FASTA query at record boundaries, runs one \
                  single-threaded BLAST worker per shard, and reassembles the \
                  per-shard results into a single tab-separated file in the \
                  original shard order."
)]
pub struct Cli {
    /// Query FASTA file
    #[arg(short, long, value_name = "fasta")]
    pub query: PathBuf,

    /// Search target: a pre-built BLAST database prefix, or a raw FASTA
    /// file to be indexed for this run
    #[arg(short, long, value_name = "database|fasta")]
    pub target: PathBuf,

    /// BLAST program to run
    #[arg(short, long, value_enum, value_name = "program")]
    pub function: BlastFunction,

    /// Combined output file
    #[arg(short, long, value_name = "output")]
    pub output: PathBuf,

    /// Path to makeblastdb (default: first match on $PATH)
    #[arg(long, value_name = "path")]
    pub makeblastdb: Option<PathBuf>,

    /// Path to blastn (default: first match on $PATH)
    #[arg(long, value_name = "path")]
    pub blastn: Option<PathBuf>,

    /// Path to blastp (default: first match on $PATH)
    #[arg(long, value_name = "path")]
    pub blastp: Option<PathBuf>,

    /// Path to blastx (default: first match on $PATH)
    #[arg(long, value_name = "path")]
    pub blastx: Option<PathBuf>,

    /// Path to tblastn (default: first match on $PATH)
    #[arg(long, value_name = "path")]
    pub tblastn: Option<PathBuf>,

    /// Path to tblastx (default: first match on $PATH)
    #[arg(long, value_name = "path")]
    pub tblastx: Option<PathBuf>,

    /// Number of shards / worker processes (0 = all available cores)
    #[arg(long, default_value = "0")]
    pub threads: usize,

    /// Strand(s) of the query to search against the database
    #[arg(long, value_enum, default_value = "both")]
    pub strand: Strand,

    /// NCBI genetic code table for translated searches
    #[arg(long, default_value = "1", value_name = "1-6, 9-16, 21-25",
          value_parser = parse_codon_table)]
    pub codon_table: u8,

    /// Directory for shard and database scratch files (default: current directory)
    #[arg(long, value_name = "dir")]
    pub temp_dir: Option<PathBuf>,
}

/// The BLAST program variant to run per shard.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlastFunction {
    Blastn,
    Blastp,
    Blastx,
    Tblastn,
    Tblastx,
}

impl BlastFunction {
    /// Canonical binary name, also used for $PATH discovery.
    pub fn name(&self) -> &'static str {
        match self {
            BlastFunction::Blastn => "blastn",
            BlastFunction::Blastp => "blastp",
            BlastFunction::Blastx => "blastx",
            BlastFunction::Tblastn => "tblastn",
            BlastFunction::Tblastx => "tblastx",
        }
    }
}

impl fmt::Display for BlastFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strand {
    Both,
    Minus,
    Plus,
}

impl Strand {
    pub fn flag_value(&self) -> &'static str {
        match self {
            Strand::Both => "both",
            Strand::Minus => "minus",
            Strand::Plus => "plus",
        }
    }
}

/// NCBI genetic code tables accepted by the BLAST `*_gencode` flags.
const CODON_TABLES: &[u8] = &[
    1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 15, 16, 21, 22, 23, 24, 25,
];

fn parse_codon_table(s: &str) -> Result<u8, String> {
    let id: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a genetic code table id", s))?;
    if CODON_TABLES.contains(&id) {
        Ok(id)
    } else {
        Err(format!(
            "table {} is not one of the NCBI genetic codes (1-6, 9-16, 21-25)",
            id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codon_table_accepts_ncbi_ids() {
        assert_eq!(parse_codon_table("1"), Ok(1));
        assert_eq!(parse_codon_table("11"), Ok(11));
        assert_eq!(parse_codon_table("25"), Ok(25));
    }

    #[test]
    fn codon_table_rejects_gaps_in_the_series() {
        assert!(parse_codon_table("7").is_err());
        assert!(parse_codon_table("8").is_err());
        assert!(parse_codon_table("17").is_err());
        assert!(parse_codon_table("26").is_err());
        assert!(parse_codon_table("0").is_err());
        assert!(parse_codon_table("banana").is_err());
    }

    #[test]
    fn cli_parses_the_full_flag_set() {
        let cli = Cli::parse_from([
            "parablast",
            "-q",
            "query.fasta",
            "-t",
            "target.fasta",
            "-f",
            "tblastx",
            "-o",
            "hits.tsv",
            "--threads",
            "4",
            "--strand",
            "plus",
            "--codon-table",
            "11",
        ]);
        assert_eq!(cli.function, BlastFunction::Tblastx);
        assert_eq!(cli.threads, 4);
        assert_eq!(cli.strand, Strand::Plus);
        assert_eq!(cli.codon_table, 11);
        assert!(cli.blastn.is_none());
    }
}
