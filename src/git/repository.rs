use std::path::{Path, PathBuf};

use git2::Repository;
use log::debug;

/// A located repository for the active file.
///
/// Resolved once per editor event and never cached across files; holds the
/// workdir path and reopens the underlying repository on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    workdir: PathBuf,
}

/// Summary metadata for a single commit, used for tooltip content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub summary: String,
    pub author: String,
}

/// Walks upward from the file's directory to find the enclosing repository.
///
/// Every failure mode (no repository, bare repository, I/O error) collapses
/// to `None`; "not found" is a normal outcome here, never an error.
pub fn find_repo(file_path: &Path) -> Option<RepoHandle> {
    let start = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let repo = match Repository::discover(start) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("No repository found for {}: {e}", file_path.display());
            return None;
        }
    };

    let workdir = repo.workdir()?.to_path_buf();
    Some(RepoHandle { workdir })
}

impl RepoHandle {
    /// Creates a handle pointing at a known workdir without discovery.
    pub fn at(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Returns the repository's working directory.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn open(&self) -> Option<Repository> {
        match Repository::open(&self.workdir) {
            Ok(repo) => Some(repo),
            Err(e) => {
                debug!("Failed to reopen {}: {e}", self.workdir.display());
                None
            }
        }
    }

    /// Returns the URL of the `origin` remote, falling back to the first
    /// configured remote. `None` when the repository has no usable remote.
    pub fn remote_url(&self) -> Option<String> {
        let repo = self.open()?;

        if let Ok(origin) = repo.find_remote("origin") {
            if let Some(url) = origin.url() {
                return Some(url.to_string());
            }
        }

        let names = repo.remotes().ok()?;
        let first = names.iter().flatten().next()?;
        let url = repo.find_remote(first).ok()?.url()?.to_string();
        Some(url)
    }

    /// Looks up the first message line and author of a commit.
    ///
    /// Accepts short or full identifiers. Unknown revisions yield `None`.
    pub fn commit_summary(&self, rev: &str) -> Option<CommitSummary> {
        let repo = self.open()?;
        let object = repo.revparse_single(rev).ok()?;
        let commit = object.peel_to_commit().ok()?;

        Some(CommitSummary {
            summary: commit.summary().unwrap_or_default().to_string(),
            author: commit.author().name().unwrap_or_default().to_string(),
        })
    }
}
