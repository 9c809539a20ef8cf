//! Commit link resolution
//!
//! Derives a browsable commit URL from a repository remote. Only the hosted
//! providers with a known commit-URL pattern are supported; anything else
//! resolves to `None`, which callers treat as a normal outcome.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use url::Url;

/// SCP-style remote, e.g. `git@github.com:owner/repo.git`.
static SCP_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9._-]+@)?(?P<host>[A-Za-z0-9.-]+):(?P<path>[^:]+?)(?:\.git)?/?$")
        .expect("static remote pattern")
});

/// Computes the commit URL for `rev` on the given remote.
///
/// Returns `None` when the remote is missing, malformed, or hosted
/// somewhere without a recognized URL scheme.
pub fn commit_link(rev: &str, remote_url: Option<&str>) -> Option<String> {
    let remote = remote_url?.trim();
    if remote.is_empty() || rev.trim().is_empty() {
        return None;
    }

    let (host, path) = parse_remote(remote)?;
    let url = match host.as_str() {
        "github.com" => format!("https://github.com/{path}/commit/{rev}"),
        "gitlab.com" => format!("https://gitlab.com/{path}/-/commit/{rev}"),
        "bitbucket.org" => format!("https://bitbucket.org/{path}/commits/{rev}"),
        other => {
            debug!("No commit URL pattern for host {other}");
            return None;
        }
    };
    Some(url)
}

/// Splits a remote into host and `owner/repo` path (subgroups kept intact),
/// with any trailing `.git` stripped.
fn parse_remote(remote: &str) -> Option<(String, String)> {
    if remote.contains("://") {
        let url = Url::parse(remote).ok()?;
        let host = url.host_str()?.to_string();
        let path = url.path().trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        if path.split('/').filter(|s| !s.is_empty()).count() < 2 {
            return None;
        }
        return Some((host, path.to_string()));
    }

    let caps = SCP_REMOTE.captures(remote)?;
    let path = caps["path"].trim_matches('/');
    if path.split('/').filter(|s| !s.is_empty()).count() < 2 {
        return None;
    }
    Some((caps["host"].to_string(), path.to_string()))
}
