// Git module providing repository discovery and per-line blame lookup

pub mod blame;
pub mod repository;

// Re-export primary types for public use
pub use blame::{BlameRecord, BlameSource, GitBlame, UNCOMMITTED_AUTHOR, UNCOMMITTED_REV};
pub use repository::{CommitSummary, RepoHandle, find_repo};
