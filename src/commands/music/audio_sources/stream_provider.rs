//! The stream-open fallback chain: an ordered list of strategies tried in
//! sequence under one shared attempt budget, each attempt bounded by a
//! wall-clock timeout. Remote failures here are routine (expired signed
//! URLs, rate limiting, region locks), so the chain trades cleverness for
//! predictability: every strategy runs at most once per call.

use std::time::Duration;

use serenity::async_trait;
use songbird::input::{HttpRequest, Input, YoutubeDl};
use tracing::{debug, info, warn};

use crate::commands::music::utils::config::PlaybackConfig;
use crate::commands::music::utils::playback_engine::{MusicError, MusicResult};
use crate::HTTP_CLIENT;

use super::track::Track;
use super::youtube::YoutubeApi;

/// Seam between the engine and stream acquisition; the engine only ever
/// sees this trait.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Obtain a live audio input for the track, or `Unplayable` carrying
    /// the last underlying cause once every fallback is spent.
    async fn open_stream(&self, track: &Track) -> MusicResult<Input>;
}

/// One rung of the fallback ladder.
#[async_trait]
pub trait StreamStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn open(&self, track: &Track) -> MusicResult<Input>;
}

/// Primary path: resolve the best audio-only representation to a direct
/// media URL and stream it over HTTP.
pub struct DirectFetch;

#[async_trait]
impl StreamStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn open(&self, track: &Track) -> MusicResult<Input> {
        let stream_url = YoutubeApi::direct_audio_url(&track.url).await?;
        Ok(HttpRequest::new(HTTP_CLIENT.clone(), stream_url).into())
    }
}

/// Second path: re-probe the video metadata and hand the fresh canonical
/// URL to yt-dlp's own streaming. Catches the case where a signed URL
/// obtained earlier has expired by the time we stream it.
pub struct RefreshedFetch;

#[async_trait]
impl StreamStrategy for RefreshedFetch {
    fn name(&self) -> &'static str {
        "refreshed"
    }

    async fn open(&self, track: &Track) -> MusicResult<Input> {
        let fresh = YoutubeApi::fetch_track(&track.url, None).await?;
        Ok(YoutubeDl::new(HTTP_CLIENT.clone(), fresh.url).into())
    }
}

/// Last resort: search for "`title` audio" and stream the top hit instead.
/// Exactly one substitution; the substitute goes through the direct path,
/// not back into the whole chain.
pub struct SearchSubstitution;

#[async_trait]
impl StreamStrategy for SearchSubstitution {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn open(&self, track: &Track) -> MusicResult<Input> {
        let query = format!("{} audio", track.title);
        let substitute = YoutubeApi::from_search(&query, None).await?;
        info!(
            "substituting '{}' with search hit '{}'",
            track.title, substitute.title
        );
        let stream_url = YoutubeApi::direct_audio_url(&substitute.url).await?;
        Ok(HttpRequest::new(HTTP_CLIENT.clone(), stream_url).into())
    }
}

pub struct FallbackStreamProvider {
    strategies: Vec<Box<dyn StreamStrategy>>,
    max_attempts: u32,
    attempt_timeout: Duration,
}

impl FallbackStreamProvider {
    pub fn new(
        strategies: Vec<Box<dyn StreamStrategy>>,
        max_attempts: u32,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            strategies,
            max_attempts: max_attempts.max(1),
            attempt_timeout,
        }
    }

    /// The production chain in order: direct fetch, refreshed metadata,
    /// search substitution.
    pub fn standard(config: &PlaybackConfig) -> Self {
        Self::new(
            vec![
                Box::new(DirectFetch),
                Box::new(RefreshedFetch),
                Box::new(SearchSubstitution),
            ],
            config.stream_attempts,
            config.attempt_timeout,
        )
    }

}

#[async_trait]
impl StreamProvider for FallbackStreamProvider {
    async fn open_stream(&self, track: &Track) -> MusicResult<Input> {
        let mut attempts = 0u32;
        let mut last_cause = "no stream strategies configured".to_string();

        for strategy in &self.strategies {
            if attempts >= self.max_attempts {
                break;
            }
            attempts += 1;
            debug!(
                "stream attempt {}/{} via '{}' for '{}'",
                attempts,
                self.max_attempts,
                strategy.name(),
                track.title
            );

            match tokio::time::timeout(self.attempt_timeout, strategy.open(track)).await {
                Ok(Ok(input)) => {
                    info!(
                        "opened stream for '{}' via '{}'",
                        track.title,
                        strategy.name()
                    );
                    return Ok(input);
                }
                Ok(Err(e)) => {
                    warn!(
                        "strategy '{}' failed for '{}': {}",
                        strategy.name(),
                        track.title,
                        e
                    );
                    last_cause = e.to_string();
                }
                Err(_) => {
                    warn!(
                        "strategy '{}' timed out after {:?} for '{}'",
                        strategy.name(),
                        self.attempt_timeout,
                        track.title
                    );
                    last_cause = format!(
                        "'{}' timed out after {:?}",
                        strategy.name(),
                        self.attempt_timeout
                    );
                }
            }
        }

        Err(MusicError::Unplayable(format!(
            "{}: {}",
            track.title, last_cause
        )))
    }
}
