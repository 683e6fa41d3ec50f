#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "qseqid\tqstart\tqend\tqlen\tsseqid\tsstart\tsend\tslen\tpident\tscore";

pub fn parablast_cmd() -> Command {
    Command::cargo_bin("parablast").expect("binary should build")
}

/// Create a FASTA file with n two-line records.
pub fn create_fasta(dir: &Path, name: &str, records: usize) -> Result<PathBuf> {
    let mut content = String::new();
    for i in 0..records {
        content.push_str(&format!(">seq_{} test record {}\n", i, i));
        content.push_str("ATGATGATGATGATGATGATGATGATGATGATGATGATGATGATG\n");
    }
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// Stand-in aligner: copies its -query file to its -out file, sleeping on
/// the first shard so completion order differs from launch order.
pub fn write_copy_aligner(dir: &Path) -> Result<PathBuf> {
    write_stub(
        dir,
        "stub_aligner",
        r#"#!/bin/sh
query=""
out=""
while [ "$#" -gt 0 ]; do
    case "$1" in
        -query) query="$2"; shift 2 ;;
        -out) out="$2"; shift 2 ;;
        *) shift 1 ;;
    esac
done
if head -n 1 "$query" | grep -q '>seq_0 '; then
    sleep 1
fi
cat "$query" > "$out"
"#,
    )
}

/// Stand-in aligner that always fails.
pub fn write_failing_aligner(dir: &Path) -> Result<PathBuf> {
    write_stub(
        dir,
        "failing_aligner",
        "#!/bin/sh\necho 'worker exploded' >&2\nexit 7\n",
    )
}

/// Stand-in makeblastdb: touches the usual index file family under -out.
pub fn write_stub_makeblastdb(dir: &Path) -> Result<PathBuf> {
    write_stub(
        dir,
        "stub_makeblastdb",
        r#"#!/bin/sh
out=""
while [ "$#" -gt 0 ]; do
    case "$1" in
        -out) out="$2"; shift 2 ;;
        *) shift 1 ;;
    esac
done
for ext in nhr nin nsq nhd nhi; do
    : > "$out.$ext"
done
"#,
    )
}

fn write_stub(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, body)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
    }
    Ok(path)
}

/// Names of leftover scratch files in the working directory.
pub fn scratch_leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("parablast_"))
        .collect()
}
