use anyhow::Result;
use git2::Config as GitConfig;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default humanization threshold: dates older than this render absolute.
pub const DEFAULT_HUMANIZE_DAYS: i64 = 30;

/// Default display time for transient notifications, in milliseconds.
pub const DEFAULT_NOTIFICATION_MS: u32 = 2000;

/// Get a configuration value with layered priority: env var > local git config > global git config
fn get_layered_value(
    key: &str,
    env_value: Option<String>,
    local_config: Option<&GitConfig>,
    global_config: Option<&GitConfig>,
) -> Option<String> {
    // First, check environment variable
    if let Some(val) = env_value {
        return Some(val);
    }

    // Then, check local git config
    if let Some(local) = local_config {
        if let Ok(val) = local.get_string(key) {
            return Some(val);
        }
    }

    // Finally, check global git config
    if let Some(global) = global_config {
        if let Ok(val) = global.get_string(key) {
            return Some(val);
        }
    }

    None
}

/// Configuration structure
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Dates within this many days of now render as relative phrases
    pub humanize_days: i64,
    /// Display duration for the unknown-url notification
    pub notification_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            humanize_days: DEFAULT_HUMANIZE_DAYS,
            notification_ms: DEFAULT_NOTIFICATION_MS,
        }
    }
}

impl Config {
    /// Load the configuration with layered priority: env > local git > global git
    ///
    /// Missing or unparseable values fall back to the defaults silently;
    /// configuration can degrade but never fail.
    pub fn load() -> Result<Self> {
        // Open git configs
        let global_config = GitConfig::open_default().ok();
        let local_config = git2::Repository::discover(".")
            .ok()
            .and_then(|repo| repo.config().ok());

        Ok(Self::from_sources(
            std::env::var("LINE_BLAME_HUMANIZE_DAYS").ok(),
            std::env::var("LINE_BLAME_NOTIFICATION_MS").ok(),
            local_config.as_ref(),
            global_config.as_ref(),
        ))
    }

    /// Resolves the layered values from explicit sources.
    fn from_sources(
        env_humanize_days: Option<String>,
        env_notification_ms: Option<String>,
        local_config: Option<&GitConfig>,
        global_config: Option<&GitConfig>,
    ) -> Self {
        let humanize_days = get_layered_value(
            "lineblame.humanizedays",
            env_humanize_days,
            local_config,
            global_config,
        )
        .and_then(|raw| parse_or_skip(&raw, "lineblame.humanizedays"))
        .unwrap_or(DEFAULT_HUMANIZE_DAYS);

        let notification_ms = get_layered_value(
            "lineblame.notificationms",
            env_notification_ms,
            local_config,
            global_config,
        )
        .and_then(|raw| parse_or_skip(&raw, "lineblame.notificationms"))
        .unwrap_or(DEFAULT_NOTIFICATION_MS);

        Self {
            humanize_days,
            notification_ms,
        }
    }
}

fn parse_or_skip<T: std::str::FromStr>(raw: &str, key: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring unparseable value for {key}: {raw:?}");
            None
        }
    }
}
