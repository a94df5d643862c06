use std::env;
use std::path::{Path, PathBuf};

use crate::{RepoError, GIT_DIR_NAME};

/// A directory with the layout of a repository's metadata directory.
pub(crate) fn is_git_dir(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir() && path.join("refs").is_dir()
}

/// Walk up from `start` to the first directory containing a repository.
pub(crate) fn find_work_tree(start: &Path) -> Result<PathBuf, RepoError> {
    let start =
        std::fs::canonicalize(start).map_err(|_| RepoError::NotFound(start.to_path_buf()))?;
    let found = start
        .ancestors()
        .find(|dir| is_git_dir(&dir.join(GIT_DIR_NAME)))
        .map(Path::to_path_buf);
    tracing::trace!(start = %start.display(), found = ?found, "repository discovery");
    found.ok_or(RepoError::NotFound(start))
}

fn home() -> Option<PathBuf> {
    env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}

/// `$XDG_CONFIG_HOME/git/<file>`, falling back to `~/.config/git/<file>`.
pub(crate) fn xdg_git_path(file: &str) -> Option<PathBuf> {
    match env::var_os("XDG_CONFIG_HOME").filter(|x| !x.is_empty()) {
        Some(xdg) => Some(PathBuf::from(xdg).join("git").join(file)),
        None => home().map(|h| h.join(".config").join("git").join(file)),
    }
}

/// User-level config files in increasing precedence. `GIT_CONFIG_GLOBAL`
/// replaces them with a single file.
pub(crate) fn global_config_paths() -> Vec<PathBuf> {
    if let Some(global) = env::var_os("GIT_CONFIG_GLOBAL") {
        return vec![PathBuf::from(global)];
    }
    xdg_git_path("config")
        .into_iter()
        .chain(home().map(|h| h.join(".gitconfig")))
        .collect()
}
