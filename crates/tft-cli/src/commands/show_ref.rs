use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use tft_ref::RefName;

use super::open_repo;

#[derive(Args)]
pub struct ShowRefArgs {
    /// Show HEAD as well
    #[arg(long)]
    head: bool,

    /// Only show branches (refs/heads/)
    #[arg(long)]
    heads: bool,

    /// Only show tags (refs/tags/)
    #[arg(long)]
    tags: bool,
}

pub fn run(args: &ShowRefArgs) -> Result<i32> {
    let repo = open_repo()?;
    let refs = repo.refs();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut found_any = false;

    if args.head {
        if let Some(oid) = refs.resolve_to_oid(&RefName::head())? {
            writeln!(out, "{oid} HEAD")?;
            found_any = true;
        }
    }

    let prefix = if args.heads {
        "refs/heads/"
    } else if args.tags {
        "refs/tags/"
    } else {
        "refs/"
    };

    for reference in refs.iter(Some(prefix))? {
        let oid = match reference.target_oid() {
            Some(oid) => oid,
            // Dangling symbolic refs are not listed.
            None => match refs.resolve_to_oid(reference.name())? {
                Some(oid) => oid,
                None => continue,
            },
        };
        writeln!(out, "{} {}", oid, reference.name())?;
        found_any = true;
    }

    Ok(if found_any { 0 } else { 1 })
}
