use std::io::{self, Write};

use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use tft_object::ObjectKind;

use super::open_repo;

#[derive(Args)]
pub struct LogArgs {
    /// One line per commit: id and summary
    #[arg(long)]
    oneline: bool,

    /// Commit to start from
    #[arg(value_name = "commit", default_value = "HEAD")]
    commit: String,
}

pub fn run(args: &LogArgs) -> Result<i32> {
    let repo = open_repo()?;
    let start = repo.resolve_to(&args.commit, ObjectKind::Commit)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (i, (oid, commit)) in repo.history(start)?.iter().enumerate() {
        if args.oneline {
            writeln!(out, "{} {}", oid, commit.summary())?;
            continue;
        }
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "commit {oid}")?;
        if commit.parents().len() > 1 {
            let parents: Vec<String> = commit.parents().iter().map(|p| p.to_hex()).collect();
            writeln!(out, "Merge: {}", parents.join(" "))?;
        }
        if let Some(author) = commit.author()? {
            writeln!(out, "Author: {} <{}>", author.name, author.email)?;
            writeln!(out, "Date:   {}", author.format_date())?;
        }
        writeln!(out)?;
        for line in commit.message().lines() {
            writeln!(out, "    {}", line.as_bstr())?;
        }
    }
    Ok(0)
}
