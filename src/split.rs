//! Record-boundary-safe sharding of FASTA files.
//!
//! A record starts at a line whose first byte is `>` and runs to the byte
//! before the next such line (or end of file). Shards are contiguous runs
//! of whole records, so every shard is itself a valid FASTA file.

use crate::workspace::ScratchSpace;
use crate::ParablastError;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Byte offsets of every record start, plus the file length as sentinel.
///
/// Single forward streaming scan; nothing is buffered beyond one line.
/// Bytes before the first `>` line belong to no record and are ignored by
/// the shard windows downstream.
pub fn scan_record_offsets(path: &Path) -> Result<Vec<u64>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut offsets = Vec::new();
    let mut position: u64 = 0;
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        if line.first() == Some(&b'>') {
            offsets.push(position);
        }
        position += n as u64;
    }
    offsets.push(position);

    Ok(offsets)
}

/// Lazy sequence of shard files covering `[offsets[i], offsets[i + step])`
/// windows of the input.
///
/// Single pass and not resumable: a failed `next` leaves the iterator in
/// an undefined position and the only recovery is to re-run the whole
/// split. Shards already written by then are the caller's to clean up.
pub struct ShardIter<'a> {
    input: File,
    input_path: PathBuf,
    offsets: Vec<u64>,
    step: usize,
    index: usize,
    scratch: &'a ScratchSpace,
}

impl ShardIter<'_> {
    fn write_shard(&mut self, start: u64, end: u64) -> Result<PathBuf> {
        let path = self.scratch.allocate()?;

        self.input
            .seek(SeekFrom::Start(start))
            .with_context(|| format!("failed to seek in {}", self.input_path.display()))?;
        let mut chunk = (&self.input).take(end - start);

        let mut shard = File::create(&path)
            .with_context(|| format!("failed to open shard {}", path.display()))?;
        let copied = io::copy(&mut chunk, &mut shard)
            .with_context(|| format!("failed to write shard {}", path.display()))?;
        if copied != end - start {
            return Err(ParablastError::InvalidInput(format!(
                "{} truncated while sharding (expected {} bytes, copied {})",
                self.input_path.display(),
                end - start,
                copied
            ))
            .into());
        }

        debug!(shard = %path.display(), start, end, "wrote shard");
        Ok(path)
    }
}

impl Iterator for ShardIter<'_> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        // A window needs at least two offsets to describe one record;
        // step == 0 means the input held no records at all.
        if self.step == 0 || self.index + 1 >= self.offsets.len() {
            return None;
        }
        let start = self.offsets[self.index];
        let end_index = (self.index + self.step).min(self.offsets.len() - 1);
        let end = self.offsets[end_index];
        self.index += self.step;

        Some(self.write_shard(start, end))
    }
}

/// Split `input` into at most `shard_count` record-aligned shard files.
///
/// Each shard holds `ceil(record_count / shard_count)` whole records except
/// possibly the last, which may be smaller but never empty. An input with
/// no records yields an empty iterator.
pub fn split_fasta<'a>(
    input: &Path,
    shard_count: usize,
    scratch: &'a ScratchSpace,
) -> Result<ShardIter<'a>> {
    if shard_count == 0 {
        return Err(
            ParablastError::InvalidInput("shard count must be at least 1".to_string()).into(),
        );
    }

    let offsets = scan_record_offsets(input)?;
    let records = offsets.len() - 1;
    let step = records.div_ceil(shard_count);
    debug!(records, shard_count, step, input = %input.display(), "computed shard layout");

    let file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    Ok(ShardIter {
        input: file,
        input_path: input.to_path_buf(),
        offsets,
        step,
        index: 0,
        scratch,
    })
}
