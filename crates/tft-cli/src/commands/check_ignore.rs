use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CheckIgnoreArgs {
    /// Paths to check, relative to the current directory
    #[arg(value_name = "pathname", required = true)]
    pathnames: Vec<String>,
}

/// `path` as a `/`-separated path relative to the worktree root. A trailing
/// `/` on the argument is kept so it still names a directory.
fn worktree_relative(work_tree: &Path, cwd: &Path, path: &str) -> Result<String> {
    let joined = if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    };
    let rel = match joined.strip_prefix(work_tree) {
        Ok(rel) => rel,
        Err(_) => bail!("'{}' is outside repository at '{}'", path, work_tree.display()),
    };
    let mut out = rel
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if path.ends_with('/') && !out.is_empty() {
        out.push('/');
    }
    Ok(out)
}

pub fn run(args: &CheckIgnoreArgs) -> Result<i32> {
    let repo = open_repo()?;
    let rules = repo.ignore_rules()?;
    let cwd = std::env::current_dir()?.canonicalize()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut found_ignored = false;
    for path in &args.pathnames {
        let rel = worktree_relative(repo.work_tree(), &cwd, path)?;
        if rules.is_ignored(&rel)? {
            writeln!(out, "{path}")?;
            found_ignored = true;
        }
    }

    Ok(if found_ignored { 0 } else { 1 })
}
