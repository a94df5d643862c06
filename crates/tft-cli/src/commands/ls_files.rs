use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct LsFilesArgs {
    /// Show the mode, object id, stage and cached stat data of each entry
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: &LsFilesArgs) -> Result<i32> {
    let repo = open_repo()?;
    let index = repo.index()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.verbose {
        writeln!(
            out,
            "Index file format v{}, containing {} entries.",
            index.version(),
            index.len()
        )?;
    }
    for entry in index.iter() {
        writeln!(out, "{}", entry.path)?;
        if !args.verbose {
            continue;
        }
        let stat = &entry.stat;
        writeln!(out, "  mode: {:06o}  object: {}", entry.mode(), entry.oid)?;
        writeln!(
            out,
            "  created: {}.{}, modified: {}.{}",
            stat.ctime_secs, stat.ctime_nsecs, stat.mtime_secs, stat.mtime_nsecs
        )?;
        writeln!(out, "  device: {}, inode: {}", stat.dev, stat.ino)?;
        writeln!(out, "  user: {}  group: {}", stat.uid, stat.gid)?;
        writeln!(
            out,
            "  size: {}  stage: {}  assume-valid: {}",
            stat.size,
            entry.stage.as_u8(),
            entry.assume_valid
        )?;
    }
    Ok(0)
}
