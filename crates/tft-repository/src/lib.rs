//! A repository: the metadata directory plus the worktree it describes.
//!
//! [`Repository`] ties the object store, refs, index and config together
//! and hosts the operations that need more than one of them: resolving
//! user-supplied names, checking out trees, assembling ignore rules,
//! walking history and creating tags.

mod checkout;
mod discover;
mod error;
mod history;
mod ignore;
mod init;
mod resolve;
mod tag;

pub use error::RepoError;

use std::path::{Path, PathBuf};

use tft_config::ConfigFile;
use tft_hash::ObjectId;
use tft_index::Index;
use tft_object::{Commit, Object, ObjectKind, Tree};
use tft_ref::FilesRefStore;
use tft_store::ObjectStore;

/// Name of the metadata directory inside a worktree.
pub const GIT_DIR_NAME: &str = ".git";

pub struct Repository {
    git_dir: PathBuf,
    work_tree: PathBuf,
    objects: ObjectStore,
    refs: FilesRefStore,
    /// Global config files merged under the repository's own.
    config: ConfigFile,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("work_tree", &self.work_tree)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the repository whose worktree root is `path`. `path` may also
    /// name the metadata directory itself.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        if path.join(GIT_DIR_NAME).is_dir() {
            return Self::from_dirs(path.join(GIT_DIR_NAME), path.to_path_buf());
        }
        if discover::is_git_dir(path) {
            let work_tree = path.parent().map(Path::to_path_buf).unwrap_or_default();
            return Self::from_dirs(path.to_path_buf(), work_tree);
        }
        Err(RepoError::NotFound(path.to_path_buf()))
    }

    /// Find the repository containing `start`, walking up through parents.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let work_tree = discover::find_work_tree(start.as_ref())?;
        Self::open(work_tree)
    }

    /// Create a repository at `path` (created if missing) and open it.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let work_tree = init::init_repository(path.as_ref())?;
        Self::open(work_tree)
    }

    fn from_dirs(git_dir: PathBuf, work_tree: PathBuf) -> Result<Self, RepoError> {
        let repo_config = ConfigFile::load(git_dir.join("config")).map_err(|e| {
            RepoError::InvalidGitDir {
                path: git_dir.clone(),
                reason: format!("cannot read config: {e}"),
            }
        })?;
        let version = repo_config
            .get_int("core.repositoryformatversion")?
            .unwrap_or(0);
        if version != 0 {
            return Err(RepoError::UnsupportedFormatVersion(version));
        }

        let mut config = ConfigFile::new();
        for path in discover::global_config_paths() {
            config.merge(ConfigFile::load_if_exists(path)?);
        }
        config.merge(repo_config);

        let mut objects = ObjectStore::open(git_dir.join("objects"));
        if let Some(level) = config.get_int("core.compression")? {
            if let Ok(level) = u32::try_from(level) {
                objects.set_compression_level(level);
            }
        }
        let refs = FilesRefStore::new(&git_dir);

        tracing::debug!(git_dir = %git_dir.display(), "opened repository");
        Ok(Self {
            git_dir,
            work_tree,
            objects,
            refs,
            config,
        })
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn refs(&self) -> &FilesRefStore {
        &self.refs
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// The staging index, or an empty one if the repository has none yet.
    pub fn index(&self) -> Result<Index, RepoError> {
        let path = self.git_dir.join("index");
        if !path.exists() {
            return Ok(Index::default());
        }
        Ok(Index::read_from(path)?)
    }

    pub fn read_object(&self, oid: &ObjectId) -> Result<Object, RepoError> {
        Ok(self.objects.read(oid)?)
    }

    pub fn write_object(&self, object: &Object) -> Result<ObjectId, RepoError> {
        Ok(self.objects.write(object)?)
    }

    pub fn read_commit(&self, oid: &ObjectId) -> Result<Commit, RepoError> {
        match self.read_object(oid)? {
            Object::Commit(commit) => Ok(commit),
            other => Err(unexpected(oid, ObjectKind::Commit, &other)),
        }
    }

    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree, RepoError> {
        match self.read_object(oid)? {
            Object::Tree(tree) => Ok(tree),
            other => Err(unexpected(oid, ObjectKind::Tree, &other)),
        }
    }
}

fn unexpected(oid: &ObjectId, expected: ObjectKind, found: &Object) -> RepoError {
    RepoError::UnexpectedKind {
        oid: *oid,
        expected,
        actual: found.kind(),
    }
}
