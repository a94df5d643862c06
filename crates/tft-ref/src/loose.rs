//! Loose ref files: one file per ref under the repository directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tft_hash::ObjectId;
use tft_utils::lockfile::write_locked;

use crate::error::RefError;
use crate::name::RefName;
use crate::Reference;

const SYMREF_PREFIX: &str = "ref: ";

pub(crate) fn ref_path(git_dir: &Path, name: &RefName) -> PathBuf {
    git_dir.join(name.as_str())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> RefError + '_ {
    move |source| RefError::IoPath {
        path: path.to_path_buf(),
        source,
    }
}

/// Read one ref file. A missing file (or a directory of the same name) is
/// `Ok(None)`.
pub(crate) fn read_loose_ref(git_dir: &Path, name: &RefName) -> Result<Option<Reference>, RefError> {
    let path = ref_path(git_dir, name);
    if path.is_dir() {
        return Ok(None);
    }
    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(&path)(e)),
    };
    parse_ref_contents(name, &contents).map(Some)
}

pub(crate) fn parse_ref_contents(name: &RefName, contents: &str) -> Result<Reference, RefError> {
    let malformed = |reason: String| RefError::Malformed {
        name: name.to_string(),
        reason,
    };
    if let Some(target) = contents.strip_prefix(SYMREF_PREFIX) {
        let target = RefName::new(target.trim())
            .map_err(|e| malformed(format!("bad symbolic target: {e}")))?;
        return Ok(Reference::Symbolic {
            name: name.clone(),
            target,
        });
    }
    let hex = contents.trim();
    let target = ObjectId::from_hex(hex).map_err(|e| malformed(format!("{hex:?}: {e}")))?;
    Ok(Reference::Direct {
        name: name.clone(),
        target,
    })
}

pub(crate) fn write_loose_ref(git_dir: &Path, name: &RefName, oid: &ObjectId) -> Result<(), RefError> {
    write_contents(git_dir, name, format!("{}\n", oid.to_hex()))
}

pub(crate) fn write_symbolic_ref(
    git_dir: &Path,
    name: &RefName,
    target: &RefName,
) -> Result<(), RefError> {
    write_contents(git_dir, name, format!("{SYMREF_PREFIX}{target}\n"))
}

fn write_contents(git_dir: &Path, name: &RefName, contents: String) -> Result<(), RefError> {
    let path = ref_path(git_dir, name);
    check_dir_file_conflict(git_dir, name)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    write_locked(&path, contents.as_bytes())?;
    tracing::debug!(name = %name, value = contents.trim_end(), "wrote ref");
    Ok(())
}

/// `refs/heads/a` cannot be created while `refs/heads/a/b` exists, nor the
/// other way round.
fn check_dir_file_conflict(git_dir: &Path, name: &RefName) -> Result<(), RefError> {
    let target = ref_path(git_dir, name);
    if target.is_dir() {
        return Err(RefError::InvalidName(format!(
            "'{name}': a directory of that name exists"
        )));
    }
    let mut current = git_dir.to_path_buf();
    let components: Vec<&str> = name.as_str().split('/').collect();
    for component in &components[..components.len() - 1] {
        current.push(component);
        if current.is_file() {
            return Err(RefError::InvalidName(format!(
                "'{name}': '{}' exists as a ref",
                current.strip_prefix(git_dir).unwrap_or(&current).display()
            )));
        }
    }
    Ok(())
}

/// Every loose ref under `refs/`, as names, sorted. Lock files and entries
/// whose path is not a valid ref name are skipped.
pub(crate) fn enumerate_loose_refs(git_dir: &Path) -> Result<Vec<RefName>, RefError> {
    let mut names = Vec::new();
    let mut pending = vec![git_dir.join("refs")];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(io_err(&dir)(e)),
        };
        for entry in entries {
            let entry = entry.map_err(io_err(&dir))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(io_err(&path))?;
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            let Some(rel) = path.strip_prefix(git_dir).ok().and_then(Path::to_str) else {
                continue;
            };
            let rel = rel.replace(std::path::MAIN_SEPARATOR, "/");
            if rel.ends_with(".lock") {
                continue;
            }
            match RefName::new(rel) {
                Ok(name) => names.push(name),
                Err(e) => tracing::warn!("skipping ref file: {e}"),
            }
        }
    }

    names.sort();
    Ok(names)
}
