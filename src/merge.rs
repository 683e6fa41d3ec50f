//! Ordered, header-once concatenation of per-shard results.

use crate::command::OUTPUT_COLUMNS;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Concatenate `outputs` into `final_path`, in list order, behind a single
/// tab-separated header line.
///
/// Each source file is streamed in bounded blocks and deleted immediately
/// after it has been fully consumed. Shard outputs carry no header of
/// their own (worker contract), so the result has exactly one.
pub fn merge_outputs(outputs: &[PathBuf], final_path: &Path) -> Result<()> {
    let file = File::create(final_path)
        .with_context(|| format!("failed to create {}", final_path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", OUTPUT_COLUMNS.join("\t"))
        .with_context(|| format!("failed to write header to {}", final_path.display()))?;

    for output in outputs {
        let mut source = File::open(output)
            .with_context(|| format!("failed to open shard output {}", output.display()))?;
        let bytes = io::copy(&mut source, &mut writer)
            .with_context(|| format!("failed to append {}", output.display()))?;
        drop(source);
        fs::remove_file(output)
            .with_context(|| format!("failed to remove shard output {}", output.display()))?;
        debug!(output = %output.display(), bytes, "merged shard output");
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", final_path.display()))?;
    Ok(())
}
