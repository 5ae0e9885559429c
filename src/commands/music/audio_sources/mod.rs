//! Track resolution: turning user input (a URL or free text) into playable
//! track descriptors, plus the stream fallback chain that later converts a
//! descriptor into live audio.

/// Submodule implementing the stream-open fallback chain.
pub mod stream_provider;
/// Submodule defining the `Track` value type used across audio sources.
pub mod track;
/// Submodule implementing the `AudioApi` trait for YouTube.
pub mod youtube;

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serenity::async_trait;
use tracing::debug;
use url::Url;

use crate::commands::music::utils::playback_engine::MusicError;

use track::Track;
use youtube::YoutubeApi;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// Ordered list of available `AudioApi` implementations; URL resolution
/// walks this list until one claims the URL.
pub static AUDIO_APIS: LazyLock<[Box<dyn AudioApi>; 1]> =
    LazyLock::new(|| [Box::new(YoutubeApi)]);

/// Resolved tracks keyed by locator, so repeated requests for the same URL
/// skip the metadata probe.
static TRACK_CACHE: LazyLock<Arc<DashMap<String, Track>>> =
    LazyLock::new(|| Arc::new(DashMap::new()));

/// Common interface for audio source APIs.
#[async_trait]
pub trait AudioApi: Send + Sync {
    /// Whether this API recognizes the given URL.
    fn is_valid_url(&self, url: &str) -> bool;

    /// Fetch metadata for one or more tracks behind the URL (a playlist
    /// URL may expand to several).
    async fn get_metadata(
        &self,
        url: &str,
        requested_by: Option<String>,
    ) -> AudioSourceResult<Vec<Track>>;
}

/// General helpers for classifying and normalizing user input.
pub struct AudioSource;

impl AudioSource {
    /// Basic check whether the input parses as a URL at all.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok()
    }

    /// Canonicalize the YouTube URL shapes users paste into chat:
    /// `<...>` angle quoting, `youtu.be/ID`, `/shorts/ID`, and watch URLs
    /// with tracking params (only `v` and `t` are kept). Anything else is
    /// returned untouched.
    pub fn clean_youtube_url(raw: &str) -> String {
        let mut input = raw.trim();
        if input.starts_with('<') && input.ends_with('>') && input.len() >= 2 {
            input = &input[1..input.len() - 1];
        }

        let Ok(parsed) = Url::parse(input) else {
            return raw.trim().to_string();
        };
        let host = parsed.host_str().unwrap_or_default();

        if host == "youtu.be" {
            let id = parsed.path().trim_start_matches('/');
            if !id.is_empty() {
                return format!("https://www.youtube.com/watch?v={}", id);
            }
        }

        if host == "youtube.com" || host.ends_with(".youtube.com") {
            if let Some(rest) = parsed.path().strip_prefix("/shorts/") {
                let id = rest.split('/').next().unwrap_or(rest);
                if !id.is_empty() {
                    return format!("https://www.youtube.com/watch?v={}", id);
                }
            }

            if parsed.path() == "/watch" {
                let video = parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.to_string());
                if let Some(video) = video {
                    let mut cleaned = format!("https://www.youtube.com/watch?v={}", video);
                    if let Some((_, t)) = parsed.query_pairs().find(|(key, _)| key == "t") {
                        cleaned.push_str(&format!("&t={}", t));
                    }
                    return cleaned;
                }
            }
        }

        input.to_string()
    }
}

/// Resolve user input into one or more playable tracks.
///
/// URLs are canonicalized and dispatched to the matching `AudioApi`;
/// anything else becomes a YouTube text search taking the top hit.
/// `MusicError::NoResults` when nothing playable comes back.
pub async fn resolve(query: &str, requested_by: Option<String>) -> AudioSourceResult<Vec<Track>> {
    let query = query.trim();
    debug!("Resolving query: {}", query);

    if !AudioSource::is_url(query) {
        let track = YoutubeApi::from_search(query, requested_by).await?;
        TRACK_CACHE.insert(track.url.clone(), track.clone());
        return Ok(vec![track]);
    }

    let url = AudioSource::clean_youtube_url(query);

    if let Some(cached) = TRACK_CACHE.get(&url) {
        debug!("Track cache hit for {}", url);
        let mut track = cached.clone();
        track.requested_by = requested_by;
        track.failure_count = 0;
        return Ok(vec![track]);
    }

    for api in AUDIO_APIS.iter() {
        if api.is_valid_url(&url) {
            let tracks = api.get_metadata(&url, requested_by).await?;
            if tracks.is_empty() {
                return Err(MusicError::NoResults(query.to_string()));
            }
            for track in &tracks {
                TRACK_CACHE.insert(track.url.clone(), track.clone());
            }
            return Ok(tracks);
        }
    }

    Err(MusicError::AudioSourceError(format!(
        "Unable to resolve URL to a supported provider: {}",
        url
    )))
}
