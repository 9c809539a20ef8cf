// Remote module: maps repository remotes to browsable commit URLs

pub mod link;

pub use link::commit_link;
