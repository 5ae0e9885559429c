//! Per-guild playback engine: owns the queue and the voice sink, reacts to
//! "playback settled" signals from the driver, and enforces the
//! consecutive-failure circuit breaker.

use std::sync::Arc;

use serenity::model::id::{ChannelId, GuildId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::commands::music::audio_sources::stream_provider::StreamProvider;
use crate::commands::music::audio_sources::track::Track;

use super::announcer::{Announcement, Announcer};
use super::config::PlaybackConfig;
use super::playback_queue::{LoopMode, PlaybackQueue};
use super::voice_sink::AudioSink;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Nothing found for: {0}")]
    NoResults(String),

    #[error("Track is unplayable: {0}")]
    Unplayable(String),

    #[error("No track is currently playing")]
    NothingPlaying,

    #[error("Playback is not paused")]
    NotPaused,

    #[error("Track control error: {0}")]
    TrackControl(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Connecting,
    Playing,
    Paused,
}

/// What `add_and_play` did with the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    Queued,
}

/// Why the sink reported the current track as settled. The driver cannot
/// always tell a fatal decode error from a natural end, so both advance
/// the queue; the distinction only affects logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledOutcome {
    Finished,
    Errored,
}

pub struct PlaybackEngine {
    guild_id: GuildId,
    state: EngineState,
    queue: PlaybackQueue,
    /// Whole-track failures since the last successful playback start.
    consecutive_failures: u32,
    /// Bumped on every successful sink start; settled signals carrying an
    /// older generation are stale and dropped.
    generation: u64,
    sink: Box<dyn AudioSink>,
    provider: Arc<dyn StreamProvider>,
    config: PlaybackConfig,
    announcer: Option<Announcer>,
}

impl PlaybackEngine {
    pub fn new(
        guild_id: GuildId,
        sink: Box<dyn AudioSink>,
        provider: Arc<dyn StreamProvider>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            guild_id,
            state: EngineState::Idle,
            queue: PlaybackQueue::new(),
            consecutive_failures: 0,
            generation: 0,
            sink,
            provider,
            config,
            announcer: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_track(&self) -> Option<Track> {
        self.queue.current().cloned()
    }

    /// Swap the channel used for status messages. Called by the registry on
    /// every command so announcements follow the user; playback state is
    /// untouched.
    pub fn set_announcer(&mut self, announcer: Option<Announcer>) {
        self.announcer = announcer;
    }

    /// Push a track and start playback when nothing is selected. Rebinds
    /// the voice connection when the target channel differs from the bound
    /// one — at most one connection per guild.
    pub async fn add_and_play(
        &mut self,
        track: Track,
        voice_channel: ChannelId,
    ) -> MusicResult<PlayOutcome> {
        debug!(
            "add_and_play '{}' in guild {} (state {:?})",
            track.title, self.guild_id, self.state
        );
        self.queue.push(track);

        if self.state == EngineState::Idle && self.queue.current().is_none() {
            self.state = EngineState::Connecting;
            if let Err(e) = self.sink.bind(voice_channel).await {
                // Keep the pushed track so a retry can reuse it.
                self.state = EngineState::Idle;
                return Err(e);
            }
            self.queue.select_last();
            self.play_from_cursor().await;
            return Ok(PlayOutcome::Started);
        }

        if self.sink.bound_channel().is_some_and(|bound| bound != voice_channel) {
            self.sink.bind(voice_channel).await?;
        }
        Ok(PlayOutcome::Queued)
    }

    /// Stop the current track. Advancement happens when the sink reports
    /// the stop through the settled signal, same as a natural end.
    pub async fn skip(&mut self) -> Option<Track> {
        if !matches!(self.state, EngineState::Playing | EngineState::Paused) {
            return None;
        }
        let skipped = self.current_track()?;
        info!("skipping '{}' in guild {}", skipped.title, self.guild_id);
        self.sink.stop().await;
        Some(skipped)
    }

    pub async fn pause(&mut self) -> MusicResult<()> {
        if self.state != EngineState::Playing {
            return Err(MusicError::NothingPlaying);
        }
        self.sink.pause().await?;
        self.state = EngineState::Paused;
        Ok(())
    }

    pub async fn resume(&mut self) -> MusicResult<()> {
        if self.state != EngineState::Paused {
            return Err(MusicError::NotPaused);
        }
        self.sink.resume().await?;
        self.state = EngineState::Playing;
        Ok(())
    }

    /// Clear the queue, stop the sink, release the voice connection.
    pub async fn stop(&mut self) {
        info!("stopping playback and clearing queue for guild {}", self.guild_id);
        self.queue.clear();
        self.state = EngineState::Idle;
        self.sink.stop().await;
        self.sink.release().await;
    }

    pub fn shuffle(&mut self) {
        self.queue.shuffle();
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.queue.set_loop_mode(mode);
    }

    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        self.queue.remove(index)
    }

    /// Single entry point for "the sink is done with the current track",
    /// natural end, skip and decode error alike. Signals from before the
    /// latest playback start, or arriving after an explicit stop, are
    /// stale and ignored.
    pub async fn on_playback_settled(&mut self, outcome: SettledOutcome, generation: u64) {
        if generation != self.generation {
            debug!(
                "stale settled signal (gen {} != {}) for guild {}",
                generation, self.generation, self.guild_id
            );
            return;
        }
        if self.state == EngineState::Idle {
            debug!("settled signal while idle for guild {}", self.guild_id);
            return;
        }
        match outcome {
            SettledOutcome::Finished => debug!("track finished in guild {}", self.guild_id),
            SettledOutcome::Errored => {
                warn!("sink reported a playback error in guild {}", self.guild_id)
            }
        }
        if !self.queue.advance() {
            self.finish_queue().await;
            return;
        }
        self.play_from_cursor().await;
    }

    /// Try to play the track under the cursor, walking the queue forward
    /// past unplayable entries. One loop instead of the recursive
    /// play-current/advance pair so a long run of bad tracks cannot blow
    /// the stack, and so the circuit breaker has a single choke point.
    async fn play_from_cursor(&mut self) {
        loop {
            let Some(track) = self.queue.current().cloned() else {
                self.finish_queue().await;
                return;
            };

            match self.provider.open_stream(&track).await {
                Ok(input) => {
                    self.generation += 1;
                    match self.sink.play(input, self.generation).await {
                        Ok(()) => {
                            self.consecutive_failures = 0;
                            self.state = EngineState::Playing;
                            info!("now playing '{}' in guild {}", track.title, self.guild_id);
                            self.announce(Announcement::NowPlaying(track)).await;
                            return;
                        }
                        Err(e) => {
                            warn!("sink refused input for '{}': {}", track.title, e);
                        }
                    }
                }
                Err(e) => {
                    warn!("no stream for '{}' in guild {}: {}", track.title, self.guild_id, e);
                }
            }

            // Every fallback failed for this entry.
            if let Some(current) = self.queue.current_mut() {
                current.failure_count += 1;
            }
            self.consecutive_failures += 1;
            self.announce(Announcement::Skipping {
                title: track.title.clone(),
            })
            .await;

            if self.consecutive_failures >= self.config.max_consecutive_failures {
                warn!(
                    "circuit breaker tripped after {} consecutive failures in guild {}",
                    self.consecutive_failures, self.guild_id
                );
                self.announce(Announcement::GivingUp {
                    failures: self.consecutive_failures,
                })
                .await;
                self.stop().await;
                return;
            }

            if !self.queue.advance() {
                self.finish_queue().await;
                return;
            }
        }
    }

    /// Natural end of the queue: stop the sink and go idle, but keep the
    /// voice connection so the next `/play` starts without a re-join.
    async fn finish_queue(&mut self) {
        info!("queue exhausted for guild {}", self.guild_id);
        self.state = EngineState::Idle;
        self.sink.stop().await;
        self.announce(Announcement::QueueFinished).await;
    }

    /// Best-effort status message; delivery failures never reach playback.
    async fn announce(&self, announcement: Announcement) {
        if let Some(announcer) = &self.announcer {
            announcer.post(announcement).await;
        }
    }
}
