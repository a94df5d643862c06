use std::collections::HashSet;

use tft_hash::ObjectId;
use tft_object::Commit;

use crate::{RepoError, Repository};

impl Repository {
    /// Commits reachable from `start`, depth first along first parents,
    /// each reported once.
    pub fn history(&self, start: ObjectId) -> Result<Vec<(ObjectId, Commit)>, RepoError> {
        let mut visited = HashSet::new();
        let mut pending = vec![start];
        let mut commits = Vec::new();

        while let Some(oid) = pending.pop() {
            if !visited.insert(oid) {
                continue;
            }
            let commit = self.read_commit(&oid)?;
            // Reversed so the first parent is popped next.
            pending.extend(
                commit
                    .parents()
                    .iter()
                    .rev()
                    .filter(|p| !visited.contains(*p)),
            );
            commits.push((oid, commit));
        }

        tracing::debug!(start = %start, commits = commits.len(), "walked history");
        Ok(commits)
    }
}
