use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use tft_index::{parse_rules, IgnoreRules};
use tft_object::ObjectKind;

use crate::discover::xdg_git_path;
use crate::{RepoError, Repository};

const GITIGNORE: &str = ".gitignore";

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, RepoError> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Repository {
    /// The user's global excludes file: `core.excludesFile`, else
    /// `$XDG_CONFIG_HOME/git/ignore` or `~/.config/git/ignore`.
    pub fn global_excludes_path(&self) -> Result<Option<PathBuf>, RepoError> {
        match self.config.get_path("core.excludesfile")? {
            Some(path) => Ok(Some(path)),
            None => Ok(xdg_git_path("ignore")),
        }
    }

    /// Assemble the ignore rules for this worktree.
    ///
    /// The absolute tier is the global excludes file followed by
    /// `info/exclude`. The scoped tier holds every `.gitignore` staged in
    /// the index, read from the object store (not the worktree) and scoped
    /// to the directory that holds it.
    pub fn ignore_rules(&self) -> Result<IgnoreRules, RepoError> {
        let mut rules = IgnoreRules::new();

        let global = self.global_excludes_path()?;
        let exclude = Some(self.git_dir.join("info").join("exclude"));
        for path in [global, exclude].into_iter().flatten() {
            if let Some(data) = read_if_exists(&path)? {
                let parsed = parse_rules(&data);
                tracing::debug!(path = %path.display(), rules = parsed.len(), "loaded ignore file");
                rules.add_absolute(parsed);
            }
        }

        for entry in self.index()?.iter() {
            let path = entry.path.to_str_lossy();
            let dir = match path.rsplit_once('/') {
                Some((dir, GITIGNORE)) => dir,
                None if path == GITIGNORE => "",
                _ => continue,
            };
            let (kind, data) = self.objects.read_raw(&entry.oid)?;
            if kind != ObjectKind::Blob {
                return Err(RepoError::UnexpectedKind {
                    oid: entry.oid,
                    expected: ObjectKind::Blob,
                    actual: kind,
                });
            }
            let parsed = parse_rules(&data);
            tracing::debug!(path = %path, rules = parsed.len(), "loaded staged ignore file");
            rules.add_scoped(dir, parsed);
        }

        Ok(rules)
    }
}
