use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tft_repository::Repository;

#[derive(Args)]
pub struct InitArgs {
    /// Where to create the repository
    #[arg(value_name = "directory", default_value = ".")]
    path: PathBuf,
}

pub fn run(args: &InitArgs) -> Result<i32> {
    let repo = Repository::init(&args.path)?;
    println!(
        "Initialized empty tft repository in {}/",
        repo.git_dir().display()
    );
    Ok(0)
}
