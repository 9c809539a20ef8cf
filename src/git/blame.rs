use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::Repository;
use log::debug;
use serde::{Deserialize, Serialize};

use super::repository::RepoHandle;

/// Marker author value for a line that belongs to an uncommitted change.
pub const UNCOMMITTED_AUTHOR: &str = "Not Committed Yet";

/// Placeholder revision for uncommitted lines.
pub const UNCOMMITTED_REV: &str = "00000000";

/// Short commit identifiers are truncated to this many hex digits.
const SHORT_REV_LEN: usize = 8;

/// Per-line blame attribution as produced by the blame source.
///
/// All fields are strings, including the 1-based line number, matching the
/// shape handed over by command-line blame tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameRecord {
    pub author: String,
    pub date: String,
    pub line: String,
    pub rev: String,
}

impl BlameRecord {
    /// Whether this record points at a real commit rather than the
    /// uncommitted sentinel.
    pub fn is_committed(&self) -> bool {
        !self.author.trim().is_empty() && self.author != UNCOMMITTED_AUTHOR
    }

    fn uncommitted(line: usize) -> Self {
        Self {
            author: UNCOMMITTED_AUTHOR.to_string(),
            date: String::new(),
            line: line.to_string(),
            rev: UNCOMMITTED_REV.to_string(),
        }
    }
}

/// Source of per-line blame data, injected into the widget so tests can
/// substitute scripted records for the git-backed implementation.
pub trait BlameSource {
    /// Returns one record per line of the file, or `None` when the file has
    /// no blame data (untracked, newly created, or unreadable).
    fn blame_file(&self, file_path: &Path, repo: &RepoHandle) -> Option<Vec<BlameRecord>>;
}

/// Blame source backed by libgit2.
pub struct GitBlame;

impl BlameSource for GitBlame {
    fn blame_file(&self, file_path: &Path, repo: &RepoHandle) -> Option<Vec<BlameRecord>> {
        match blame_records(file_path, repo) {
            Ok(records) if records.is_empty() => None,
            Ok(records) => Some(records),
            Err(e) => {
                // Lookup errors are "no data", never fatal (untracked files
                // land here).
                debug!("No blame data for {}: {e:#}", file_path.display());
                None
            }
        }
    }
}

fn blame_records(file_path: &Path, handle: &RepoHandle) -> Result<Vec<BlameRecord>> {
    let repo = Repository::open(handle.workdir())
        .with_context(|| format!("opening repository at {}", handle.workdir().display()))?;
    let relative =
        relative_to_workdir(file_path, handle).context("file is outside the repository workdir")?;

    let blame = repo
        .blame_file(&relative, None)
        .with_context(|| format!("blaming {}", relative.display()))?;
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("reading {}", file_path.display()))?;

    let line_count = content.lines().count();
    let mut records = Vec::with_capacity(line_count);
    for line_number in 1..=line_count {
        let Some(hunk) = blame.get_line(line_number) else {
            // Lines past the blamed version are local, uncommitted edits.
            records.push(BlameRecord::uncommitted(line_number));
            continue;
        };

        let oid = hunk.final_commit_id();
        if oid.is_zero() {
            records.push(BlameRecord::uncommitted(line_number));
            continue;
        }

        let signature = hunk.final_signature();
        let author = signature.name().unwrap_or_default().to_string();
        let id = oid.to_string();
        records.push(BlameRecord {
            author,
            date: format_signature_time(signature.when()),
            line: line_number.to_string(),
            rev: id[..SHORT_REV_LEN.min(id.len())].to_string(),
        });
    }

    debug!("Blamed {} lines of {}", records.len(), file_path.display());
    Ok(records)
}

/// Resolves the file path relative to the repository workdir, falling back
/// to canonicalized paths when either side carries symlinks.
fn relative_to_workdir(file_path: &Path, handle: &RepoHandle) -> Option<std::path::PathBuf> {
    if let Ok(relative) = file_path.strip_prefix(handle.workdir()) {
        return Some(relative.to_path_buf());
    }
    let file = file_path.canonicalize().ok()?;
    let workdir = handle.workdir().canonicalize().ok()?;
    file.strip_prefix(&workdir)
        .ok()
        .map(std::path::Path::to_path_buf)
}

/// Formats a git signature timestamp as `YYYY-MM-DD HH:MM:SS +ZZZZ`,
/// preserving the author's UTC offset.
fn format_signature_time(when: git2::Time) -> String {
    let Some(offset) =
        FixedOffset::east_opt(when.offset_minutes() * 60).or_else(|| FixedOffset::east_opt(0))
    else {
        return String::new();
    };
    match DateTime::from_timestamp(when.seconds(), 0) {
        Some(utc) => utc
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S %z")
            .to_string(),
        None => String::new(),
    }
}
