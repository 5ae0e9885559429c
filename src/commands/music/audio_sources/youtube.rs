//! YouTube metadata access through the `yt-dlp` command-line tool: single
//! videos, text search, playlist expansion, and direct audio-stream URL
//! resolution for the stream fallback chain.

use std::env;
use std::process::Output;
use std::sync::LazyLock;

use regex::Regex;
use serenity::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::commands::music::utils::config::{PlaybackConfig, PlaylistMode, CONFIG};
use crate::commands::music::utils::playback_engine::MusicError;

use super::track::Track;
use super::{AudioApi, AudioSourceResult};

/// Regex to match and capture YouTube video URLs (various formats).
static YOUTUBE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:https?:)?//)?((?:www|m)\.)?((?:youtube\.com|youtu.be))(/(?:[\w\-]+\?v=|embed/|v/|playlist\?)?)([\w\-]+)(\S+)?$").unwrap()
});

/// The YouTube implementation of `AudioApi`, backed by `yt-dlp`.
#[derive(Default)]
pub struct YoutubeApi;

#[async_trait]
impl AudioApi for YoutubeApi {
    fn is_valid_url(&self, url: &str) -> bool {
        YoutubeApi::is_youtube_url(url)
    }

    /// Fetches metadata for a video or playlist URL. Playlists expand
    /// according to `PLAYLIST_MODE`: only the first entry, or the first
    /// `PLAYLIST_LIMIT` entries.
    async fn get_metadata(
        &self,
        url: &str,
        requested_by: Option<String>,
    ) -> AudioSourceResult<Vec<Track>> {
        if Self::is_playlist_url(url) {
            return Self::expand_playlist(url, requested_by, &CONFIG).await;
        }
        let track = Self::fetch_track(url, requested_by).await?;
        Ok(vec![track])
    }
}

impl YoutubeApi {
    /// Checks whether the input looks like a YouTube URL at all.
    pub fn is_youtube_url(query: &str) -> bool {
        YOUTUBE_REGEX.is_match(query)
    }

    /// Playlist URLs get expanded rather than probed as a single video.
    /// Watch URLs are canonicalized before resolution (the `list=` param is
    /// stripped), so what remains here is the dedicated playlist page.
    pub fn is_playlist_url(url: &str) -> bool {
        url.contains("/playlist") || url.contains("list=")
    }

    /// Extracts the video ID from various YouTube URL formats.
    pub fn extract_video_id(url: &str) -> AudioSourceResult<String> {
        YOUTUBE_REGEX
            .captures(url)
            .and_then(|captures| captures.get(5))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                MusicError::AudioSourceError("Could not extract video ID".to_string())
            })
    }

    /// Fetch metadata for a single video URL.
    pub async fn fetch_track(url: &str, requested_by: Option<String>) -> AudioSourceResult<Track> {
        info!("Fetching YouTube metadata for URL: {}", url);
        let output = Self::run_ytdlp(&["-j", "--no-playlist", url]).await?;
        let metadata_str = String::from_utf8_lossy(&output.stdout);
        let metadata_json: serde_json::Value =
            serde_json::from_str(metadata_str.trim()).map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to parse video metadata: {}", e))
            })?;
        Self::track_from_json(&metadata_json, requested_by)
    }

    /// Fetch metadata for the top YouTube search hit for a term.
    pub async fn from_search(
        search_term: &str,
        requested_by: Option<String>,
    ) -> AudioSourceResult<Track> {
        info!("Searching YouTube for: {}", search_term);
        let search_param = format!("ytsearch1:{}", search_term);
        // A search with no hits surfaces as "nothing found", not as an
        // internal error, whichever way yt-dlp reports it.
        let output = match Self::run_ytdlp(&["-j", "--no-playlist", &search_param]).await {
            Ok(output) => output,
            Err(e) => {
                warn!("search '{}' failed: {}", search_term, e);
                return Err(MusicError::NoResults(search_term.to_string()));
            }
        };

        let metadata_str = String::from_utf8_lossy(&output.stdout);
        let line = metadata_str
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| MusicError::NoResults(search_term.to_string()))?;

        let metadata_json: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            MusicError::AudioSourceError(format!("Failed to parse search metadata: {}", e))
        })?;
        Self::track_from_json(&metadata_json, requested_by)
    }

    /// Resolve the best audio-only representation of a video to a direct
    /// media URL. These URLs are signed and expire, so resolution happens
    /// right before streaming, never at queue time.
    pub async fn direct_audio_url(url: &str) -> AudioSourceResult<String> {
        debug!("Resolving direct audio stream for URL: {}", url);
        let output = Self::run_ytdlp(&["-f", "bestaudio", "-g", "--no-playlist", url]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .ok_or_else(|| {
                MusicError::AudioSourceError("yt-dlp returned no stream URL".to_string())
            })
    }

    /// Expand a playlist URL into tracks, one JSON object per line from
    /// `--flat-playlist`. Entries that fail to parse are skipped with a
    /// warning rather than sinking the whole playlist.
    async fn expand_playlist(
        url: &str,
        requested_by: Option<String>,
        config: &PlaybackConfig,
    ) -> AudioSourceResult<Vec<Track>> {
        let limit = match config.playlist_mode {
            PlaylistMode::FirstOnly => 1,
            PlaylistMode::Expand => config.playlist_limit.max(1),
        };
        info!("Expanding playlist (limit {}): {}", limit, url);

        let items = format!("1:{}", limit);
        let output =
            Self::run_ytdlp(&["-j", "--flat-playlist", "--playlist-items", &items, url]).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut tracks = Vec::new();
        for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
            match serde_json::from_str::<serde_json::Value>(line) {
                Ok(entry) => match Self::track_from_json(&entry, requested_by.clone()) {
                    Ok(track) => tracks.push(track),
                    Err(e) => warn!("Skipping playlist entry: {}", e),
                },
                Err(e) => warn!("Skipping unparseable playlist entry: {}", e),
            }
        }

        if tracks.is_empty() {
            Err(MusicError::NoResults(url.to_string()))
        } else {
            Ok(tracks)
        }
    }

    /// Convert one yt-dlp JSON object into a `Track`. Flat playlist
    /// entries carry the video URL (or just the ID) in `url` instead of
    /// `webpage_url`.
    fn track_from_json(
        value: &serde_json::Value,
        requested_by: Option<String>,
    ) -> AudioSourceResult<Track> {
        let locator = value["webpage_url"]
            .as_str()
            .or_else(|| value["url"].as_str())
            .map(|raw| {
                if raw.starts_with("http") {
                    raw.to_string()
                } else {
                    format!("https://www.youtube.com/watch?v={}", raw)
                }
            })
            .ok_or_else(|| {
                MusicError::AudioSourceError("Metadata is missing a playable URL".to_string())
            })?;

        let title = value["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        let duration = value["duration"]
            .as_f64()
            .map(std::time::Duration::from_secs_f64);

        let thumbnail = value["thumbnail"].as_str().map(|s| s.to_string());

        Ok(Track {
            title,
            url: locator,
            duration,
            thumbnail,
            requested_by,
            failure_count: 0,
        })
    }

    /// Run yt-dlp with the given arguments, forwarding the optional
    /// `YT_COOKIE` credential as a request header. A missing cookie just
    /// means fewer unlocked videos, never an error.
    async fn run_ytdlp(args: &[&str]) -> AudioSourceResult<Output> {
        let mut command = Command::new("yt-dlp");
        command.args(args);

        if let Ok(cookie) = env::var("YT_COOKIE") {
            let cookie = cookie.trim().to_string();
            if !cookie.is_empty() {
                command.args(["--add-header", &format!("Cookie: {}", cookie)]);
            }
        }

        let output = command.output().await.map_err(|e| {
            MusicError::AudioSourceError(format!("Failed to execute yt-dlp: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MusicError::AudioSourceError(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output)
    }
}
