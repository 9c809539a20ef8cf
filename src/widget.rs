//! Status bar blame widget
//!
//! The composed view: on every active-file or cursor-line change it
//! re-resolves the repository, fetches blame for the current line, and
//! re-renders. Clicks open the commit in the browser, shift-clicks copy the
//! hash. All collaborators are injected at construction so hosts and tests
//! can substitute their own.

use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;

use crate::config::Config;
use crate::format::{self, Formatted};
use crate::git::blame::{BlameRecord, BlameSource, GitBlame, UNCOMMITTED_AUTHOR};
use crate::git::repository::{self, RepoHandle};
use crate::host::HostFacilities;
use crate::remote;

/// Tag/class identifier of the widget's status bar element, used by hosts
/// to mount it and by themes to style it.
pub const ELEMENT_TAG: &str = "status-bar-blame";

/// Notification shown when a commit has no resolvable URL.
pub const UNKNOWN_URL_MESSAGE: &str = "Unknown url. Shift-click to copy hash.";

/// Host UI events the widget reacts to. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ActiveFileChanged(Option<PathBuf>),
    CursorMoved(u32),
}

/// Explicit interaction intents, disambiguated from a single click event by
/// the modifier flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    ActivateLink,
    CopyHash,
}

impl Interaction {
    /// Maps a click with a shift-modifier flag to its intent.
    pub fn from_click(shift: bool) -> Self {
        if shift {
            Interaction::CopyHash
        } else {
            Interaction::ActivateLink
        }
    }
}

/// What the widget currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    /// No repository for the active file; the element stays empty.
    Hidden,
    /// Repository found but the line is uncommitted or has no blame data.
    Uncommitted,
    /// A committed line, rendered as a clickable anchor.
    Committed(Formatted),
}

/// Finds the repository enclosing a file. Injected so tests can pin one.
pub trait RepoLocator {
    fn find_repo(&self, file_path: &Path) -> Option<RepoHandle>;
}

/// Locator backed by upward git discovery.
pub struct GitRepoLocator;

impl RepoLocator for GitRepoLocator {
    fn find_repo(&self, file_path: &Path) -> Option<RepoHandle> {
        repository::find_repo(file_path)
    }
}

/// Resolves a commit identifier to a browsable URL. `None` is a normal
/// outcome for unrecognized remotes.
pub trait LinkResolver {
    fn resolve(&self, rev: &str, repo: &RepoHandle) -> Option<String>;
}

/// Resolver that matches the repository remote against known hosted
/// providers.
pub struct RemoteLinkResolver;

impl LinkResolver for RemoteLinkResolver {
    fn resolve(&self, rev: &str, repo: &RepoHandle) -> Option<String> {
        remote::commit_link(rev, repo.remote_url().as_deref())
    }
}

/// Produces tooltip content for a commit on demand. `None` means no
/// tooltip, which the widget tolerates.
pub trait TooltipProvider {
    fn tooltip(&self, rev: &str, repo: &RepoHandle) -> Option<String>;
}

/// Tooltip provider that shows the commit's first message line and author.
pub struct CommitTooltip;

impl TooltipProvider for CommitTooltip {
    fn tooltip(&self, rev: &str, repo: &RepoHandle) -> Option<String> {
        let commit = repo.commit_summary(rev)?;
        Some(format!("{}\n{}", commit.summary, commit.author))
    }
}

/// A completed refresh request. Results delivered with a ticket whose
/// sequence no longer matches the widget's are stale and get discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    file: Option<PathBuf>,
    line: u32,
}

/// The status bar blame widget.
///
/// Owns all of its render state exclusively; everything it displays is
/// recomputed from the latest fetched record, so re-rendering with an
/// unchanged record produces byte-identical markup.
pub struct BlameWidget {
    locator: Box<dyn RepoLocator>,
    source: Box<dyn BlameSource>,
    resolver: Box<dyn LinkResolver>,
    tooltips: Box<dyn TooltipProvider>,
    host: HostFacilities,
    config: Config,
    file: Option<PathBuf>,
    line: u32,
    repo: Option<RepoHandle>,
    record: Option<BlameRecord>,
    state: RenderState,
    seq: u64,
}

impl BlameWidget {
    /// Creates a widget with the git-backed collaborators.
    pub fn new(host: HostFacilities, config: Config) -> Self {
        Self::with_collaborators(
            host,
            config,
            Box::new(GitRepoLocator),
            Box::new(GitBlame),
            Box::new(RemoteLinkResolver),
            Box::new(CommitTooltip),
        )
    }

    /// Creates a widget with explicit collaborators, the seam tests use.
    pub fn with_collaborators(
        host: HostFacilities,
        config: Config,
        locator: Box<dyn RepoLocator>,
        source: Box<dyn BlameSource>,
        resolver: Box<dyn LinkResolver>,
        tooltips: Box<dyn TooltipProvider>,
    ) -> Self {
        Self {
            locator,
            source,
            resolver,
            tooltips,
            host,
            config,
            file: None,
            line: 1,
            repo: None,
            record: None,
            state: RenderState::Hidden,
            seq: 0,
        }
    }

    /// Handles a host UI event, driving the full locate, fetch, and render
    /// cycle synchronously.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::ActiveFileChanged(path) => {
                self.file = path;
                self.line = 1;
            }
            Event::CursorMoved(line) => {
                self.line = line.max(1);
            }
        }

        let ticket = self.begin_refresh();
        let records = self.fetch(&ticket);
        self.complete_fetch(&ticket, records);
    }

    /// Starts a refresh: re-resolves the repository for the active file and
    /// mints a ticket for the blame fetch. Each call supersedes all
    /// outstanding tickets.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.seq += 1;
        self.repo = self
            .file
            .as_deref()
            .and_then(|file| self.locator.find_repo(file));
        FetchTicket {
            seq: self.seq,
            file: self.file.clone(),
            line: self.line,
        }
    }

    /// Runs the blame lookup for a ticket. `None` means no data, which
    /// renders as the uncommitted literal.
    pub fn fetch(&self, ticket: &FetchTicket) -> Option<Vec<BlameRecord>> {
        let file = ticket.file.as_deref()?;
        let repo = self.repo.as_ref()?;
        self.source.blame_file(file, repo)
    }

    /// Applies a completed fetch. Stale tickets (a newer refresh has
    /// started since) are discarded without touching the render state.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, records: Option<Vec<BlameRecord>>) {
        if ticket.seq != self.seq {
            debug!(
                "Discarding stale blame result for {:?} line {}",
                ticket.file, ticket.line
            );
            return;
        }

        self.record = records.and_then(|records| pick_record(&records, ticket.line));
        self.render();
    }

    fn render(&mut self) {
        self.state = if self.repo.is_none() {
            RenderState::Hidden
        } else {
            match &self.record {
                None => RenderState::Uncommitted,
                Some(record) => {
                    let formatted =
                        format::format_record(record, Utc::now(), self.config.humanize_days);
                    if formatted.is_committed {
                        RenderState::Committed(formatted)
                    } else {
                        RenderState::Uncommitted
                    }
                }
            }
        };
    }

    /// The widget's current inner markup.
    pub fn markup(&self) -> String {
        match &self.state {
            RenderState::Hidden => String::new(),
            RenderState::Uncommitted => UNCOMMITTED_AUTHOR.to_string(),
            RenderState::Committed(formatted) => format::render_markup(formatted),
        }
    }

    /// Plain-text form of the current render, for markup-less hosts.
    pub fn text(&self) -> String {
        match &self.state {
            RenderState::Hidden => String::new(),
            RenderState::Uncommitted => UNCOMMITTED_AUTHOR.to_string(),
            RenderState::Committed(formatted) => format::render_text(formatted),
        }
    }

    /// The current render state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Handles a click, selecting the intent from the shift-modifier flag.
    pub fn click(&mut self, shift: bool) {
        self.interact(Interaction::from_click(shift));
    }

    /// Handles an interaction intent. Meaningful only for committed lines;
    /// a no-op in every other state.
    pub fn interact(&mut self, intent: Interaction) {
        let RenderState::Committed(_) = self.state else {
            return;
        };
        let Some(record) = self.record.clone() else {
            return;
        };

        match intent {
            Interaction::CopyHash => {
                self.host.clipboard.write(&record.rev);
            }
            Interaction::ActivateLink => {
                let link = self
                    .repo
                    .as_ref()
                    .and_then(|repo| self.resolver.resolve(&record.rev, repo));
                match link {
                    Some(url) => self.host.opener.open(&url),
                    None => self
                        .host
                        .notifier
                        .show(UNKNOWN_URL_MESSAGE, self.config.notification_ms),
                }
            }
        }
    }

    /// Computes tooltip content for the current line on demand.
    pub fn tooltip(&self) -> Option<String> {
        let RenderState::Committed(_) = self.state else {
            return None;
        };
        let record = self.record.as_ref()?;
        let repo = self.repo.as_ref()?;
        self.tooltips.tooltip(&record.rev, repo)
    }
}

/// Picks the record for a 1-based cursor line, matching on the record's own
/// line field first and falling back to positional order.
fn pick_record(records: &[BlameRecord], line: u32) -> Option<BlameRecord> {
    let wanted = line.to_string();
    if let Some(record) = records.iter().find(|record| record.line == wanted) {
        return Some(record.clone());
    }

    let index = usize::try_from(line).ok()?.checked_sub(1)?;
    records.get(index).cloned()
}
