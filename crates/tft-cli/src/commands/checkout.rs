use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Commit or tree to check out
    #[arg(value_name = "commit")]
    commit: String,

    /// Directory to write into; must be empty or not yet exist
    #[arg(value_name = "directory")]
    directory: PathBuf,
}

pub fn run(args: &CheckoutArgs) -> Result<i32> {
    let repo = open_repo()?;
    let tree = repo.checkout(&args.commit, &args.directory)?;
    eprintln!("Checked out tree {} into '{}'", tree, args.directory.display());
    Ok(0)
}
