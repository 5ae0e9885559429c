//! The audio sink seam between the playback engine and Discord voice.
//! Production uses songbird; tests drive the engine through a scripted
//! implementation of the same trait.

use std::sync::Arc;

use serenity::async_trait;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, UserId};
use songbird::input::Input;
use songbird::tracks::TrackHandle;
use songbird::{Event, Songbird, TrackEvent};
use tracing::debug;

use super::event_handlers::TrackEndNotifier;
use super::playback_engine::{MusicError, MusicResult};

/// Voice-facing operations the engine needs. One sink per guild; `stop`
/// ends the current track (the settled signal follows asynchronously),
/// `release` drops the voice connection entirely.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Join `channel` (or move there when bound elsewhere).
    async fn bind(&mut self, channel: ChannelId) -> MusicResult<()>;

    fn bound_channel(&self) -> Option<ChannelId>;

    /// Start playing `input`. `generation` tags the settled signal this
    /// playback will eventually emit.
    async fn play(&mut self, input: Input, generation: u64) -> MusicResult<()>;

    async fn pause(&mut self) -> MusicResult<()>;

    async fn resume(&mut self) -> MusicResult<()>;

    async fn stop(&mut self);

    async fn release(&mut self);
}

/// The real sink: a songbird `Call` plus the handle of whatever is playing.
pub struct SongbirdSink {
    songbird: Arc<Songbird>,
    guild_id: GuildId,
    channel_id: Option<ChannelId>,
    handle: Option<TrackHandle>,
}

impl SongbirdSink {
    pub fn new(songbird: Arc<Songbird>, guild_id: GuildId) -> Self {
        Self {
            songbird,
            guild_id,
            channel_id: None,
            handle: None,
        }
    }
}

#[async_trait]
impl AudioSink for SongbirdSink {
    async fn bind(&mut self, channel: ChannelId) -> MusicResult<()> {
        if self.channel_id == Some(channel) && self.songbird.get(self.guild_id).is_some() {
            return Ok(());
        }
        debug!("binding voice to channel {} in guild {}", channel, self.guild_id);
        self.songbird
            .join(self.guild_id, channel)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;
        self.channel_id = Some(channel);
        Ok(())
    }

    fn bound_channel(&self) -> Option<ChannelId> {
        self.channel_id
    }

    async fn play(&mut self, input: Input, generation: u64) -> MusicResult<()> {
        let call = self
            .songbird
            .get(self.guild_id)
            .ok_or(MusicError::NotConnected)?;
        let mut call = call.lock().await;
        let handle = call.play_input(input);

        // End fires for natural completion and stop; Error for decode or
        // stream failures mid-track. Both land in the same settled path.
        let _ = handle.add_event(
            Event::Track(TrackEvent::End),
            TrackEndNotifier::new(self.guild_id, generation),
        );
        let _ = handle.add_event(
            Event::Track(TrackEvent::Error),
            TrackEndNotifier::new(self.guild_id, generation),
        );

        self.handle = Some(handle);
        Ok(())
    }

    async fn pause(&mut self) -> MusicResult<()> {
        let handle = self.handle.as_ref().ok_or(MusicError::NothingPlaying)?;
        handle
            .pause()
            .map_err(|e| MusicError::TrackControl(e.to_string()))
    }

    async fn resume(&mut self) -> MusicResult<()> {
        let handle = self.handle.as_ref().ok_or(MusicError::NothingPlaying)?;
        handle
            .play()
            .map_err(|e| MusicError::TrackControl(e.to_string()))
    }

    async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.stop();
        }
    }

    async fn release(&mut self) {
        self.stop().await;
        if self.songbird.get(self.guild_id).is_some() {
            let _ = self.songbird.remove(self.guild_id).await;
        }
        self.channel_id = None;
    }
}

/// Get the voice channel a user currently occupies, via the gateway cache.
pub fn user_voice_channel(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> MusicResult<ChannelId> {
    let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;
    guild
        .voice_states
        .get(&user_id)
        .and_then(|state| state.channel_id)
        .ok_or(MusicError::UserNotInVoiceChannel)
}
