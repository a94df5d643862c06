use std::fs;
use std::path::{Path, PathBuf};

use tft_config::ConfigFile;

use crate::{RepoError, GIT_DIR_NAME};

const DESCRIPTION: &str = "Unnamed repository; edit this file 'description' to name the repository.\n";
const EXCLUDE: &str = "# tft check-ignore consults this file for every path.\n\
# Lines that start with '#' are comments.\n";

/// Lay out a new repository at `path` and return the worktree root.
///
/// ```text
/// .git/
///   HEAD          ref: refs/heads/master
///   config        core.repositoryformatversion = 0, filemode, bare
///   description
///   branches/  objects/  refs/heads/  refs/tags/  info/exclude
/// ```
///
/// `path` is created if needed. It must not be a file, and any existing
/// `.git` there must be empty.
pub(crate) fn init_repository(path: &Path) -> Result<PathBuf, RepoError> {
    let work_tree = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };
    if work_tree.exists() && !work_tree.is_dir() {
        return Err(RepoError::InvalidGitDir {
            path: work_tree,
            reason: "not a directory".into(),
        });
    }

    let git_dir = work_tree.join(GIT_DIR_NAME);
    if git_dir.exists() {
        let occupied = !git_dir.is_dir() || fs::read_dir(&git_dir)?.next().is_some();
        if occupied {
            return Err(RepoError::AlreadyExists(work_tree));
        }
    }

    for dir in ["branches", "objects", "refs/heads", "refs/tags", "info"] {
        fs::create_dir_all(git_dir.join(dir))?;
    }
    fs::write(git_dir.join("description"), DESCRIPTION)?;
    fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n")?;
    fs::write(git_dir.join("info").join("exclude"), EXCLUDE)?;
    ConfigFile::default_repository().write_to(git_dir.join("config"))?;

    tracing::debug!(path = %git_dir.display(), "initialized repository");
    Ok(work_tree)
}
