pub mod cat_file;
pub mod check_ignore;
pub mod checkout;
pub mod hash_object;
pub mod init;
pub mod log;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
pub mod show_ref;
pub mod tag;

use anyhow::Result;
use clap::Subcommand;
use tft_repository::Repository;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository
    Init(init::InitArgs),
    /// Compute an object id and optionally store the object
    HashObject(hash_object::HashObjectArgs),
    /// Print the payload of an object
    CatFile(cat_file::CatFileArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Show the entries of the staging index
    LsFiles(ls_files::LsFilesArgs),
    /// Resolve a name to an object id
    RevParse(rev_parse::RevParseArgs),
    /// List references
    ShowRef(show_ref::ShowRefArgs),
    /// Write the tree of a commit into an empty directory
    Checkout(checkout::CheckoutArgs),
    /// Report which paths are ignored
    CheckIgnore(check_ignore::CheckIgnoreArgs),
    /// Show commit history
    Log(log::LogArgs),
    /// List or create tags
    Tag(tag::TagArgs),
}

/// The repository containing the current directory.
pub fn open_repo() -> Result<Repository> {
    let repo = Repository::discover(".")?;
    tracing::debug!(git_dir = %repo.git_dir().display(), "using repository");
    Ok(repo)
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args),
        Commands::HashObject(args) => hash_object::run(args),
        Commands::CatFile(args) => cat_file::run(args),
        Commands::LsTree(args) => ls_tree::run(args),
        Commands::LsFiles(args) => ls_files::run(args),
        Commands::RevParse(args) => rev_parse::run(args),
        Commands::ShowRef(args) => show_ref::run(args),
        Commands::Checkout(args) => checkout::run(args),
        Commands::CheckIgnore(args) => check_ignore::run(args),
        Commands::Log(args) => log::run(args),
        Commands::Tag(args) => tag::run(args),
    }
}
