pub mod config;
pub mod format;
pub mod git;
pub mod host;
pub mod remote;
pub mod widget;

// Re-export important structs and functions for easier embedding and testing
pub use config::Config;
pub use format::{Formatted, format_record, render_markup, render_text};
pub use git::{BlameRecord, BlameSource, GitBlame, RepoHandle, UNCOMMITTED_AUTHOR, find_repo};
pub use host::{Clipboard, HostFacilities, LinkOpener, Notifier};
pub use remote::commit_link;
pub use widget::{
    BlameWidget, CommitTooltip, ELEMENT_TAG, Event, FetchTicket, GitRepoLocator, Interaction,
    LinkResolver, RemoteLinkResolver, RenderState, RepoLocator, TooltipProvider,
    UNKNOWN_URL_MESSAGE,
};
