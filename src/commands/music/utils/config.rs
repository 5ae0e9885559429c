//! Playback configuration sourced from the environment (`.env` is loaded in
//! `main`). Every knob has a default; unset or garbage values fall back
//! with a warning instead of failing startup.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

/// How a resolved playlist URL is turned into queue entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistMode {
    /// Only the first playlist entry is queued.
    FirstOnly,
    /// The first `playlist_limit` entries are queued.
    Expand,
}

#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Consecutive whole-track failures before the engine gives up and
    /// stops (the circuit breaker).
    pub max_consecutive_failures: u32,
    /// Stream-open attempts per track across all fallback strategies.
    pub stream_attempts: u32,
    /// Wall-clock bound on a single stream-open attempt.
    pub attempt_timeout: Duration,
    pub playlist_mode: PlaylistMode,
    /// Cap on queued entries when `playlist_mode` is `Expand`.
    pub playlist_limit: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 5,
            stream_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            playlist_mode: PlaylistMode::FirstOnly,
            playlist_limit: 25,
        }
    }
}

impl PlaybackConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_parse::<u32>("MAX_CONSECUTIVE_FAILURES") {
            config.max_consecutive_failures = n.max(1);
        }
        if let Some(n) = env_parse::<u32>("STREAM_ATTEMPTS") {
            config.stream_attempts = n.max(1);
        }
        if let Some(secs) = env_parse::<u64>("STREAM_ATTEMPT_TIMEOUT_SECS") {
            config.attempt_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(n) = env_parse::<usize>("PLAYLIST_LIMIT") {
            config.playlist_limit = n.max(1);
        }

        match env::var("PLAYLIST_MODE") {
            Ok(mode) if mode.eq_ignore_ascii_case("expand") => {
                config.playlist_mode = PlaylistMode::Expand;
            }
            Ok(mode) if mode.eq_ignore_ascii_case("first") => {
                config.playlist_mode = PlaylistMode::FirstOnly;
            }
            Ok(other) => {
                warn!("Unrecognized PLAYLIST_MODE '{}', using 'first'", other);
            }
            Err(_) => {}
        }

        config
    }
}

/// Parse an env var, warning (rather than failing) on malformed values.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable value '{}' for {}", raw, key);
            None
        }
    }
}

/// Process-wide configuration, read once on first use.
pub static CONFIG: LazyLock<PlaybackConfig> = LazyLock::new(PlaybackConfig::from_env);
