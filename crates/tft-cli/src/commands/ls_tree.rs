use std::io::{self, Write};

use anyhow::Result;
use bstr::{BString, ByteSlice, ByteVec};
use clap::Args;
use tft_object::{ObjectKind, TreeEntry};

use super::open_repo;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into sub-trees
    #[arg(short = 'r')]
    recurse: bool,

    /// Tree-ish to list
    #[arg(value_name = "tree-ish")]
    tree_ish: String,
}

fn entry_kind(entry: &TreeEntry) -> ObjectKind {
    if entry.mode.is_tree() {
        ObjectKind::Tree
    } else if entry.mode.is_gitlink() {
        ObjectKind::Commit
    } else {
        ObjectKind::Blob
    }
}

pub fn run(args: &LsTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let root = repo.resolve_to(&args.tree_ish, ObjectKind::Tree)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Reversed onto a stack so entries print in tree order.
    let mut pending: Vec<(BString, TreeEntry)> = repo
        .read_tree(&root)?
        .iter()
        .rev()
        .map(|e| (e.name.clone(), e.clone()))
        .collect();

    while let Some((path, entry)) = pending.pop() {
        if args.recurse && entry.mode.is_tree() {
            let subtree = repo.read_tree(&entry.oid)?;
            for child in subtree.iter().rev() {
                let mut child_path = path.clone();
                child_path.push_byte(b'/');
                child_path.push_str(&child.name);
                pending.push((child_path, child.clone()));
            }
            continue;
        }
        writeln!(
            out,
            "{} {} {}\t{}",
            entry.mode,
            entry_kind(&entry),
            entry.oid,
            path.as_bstr()
        )?;
    }
    Ok(0)
}
