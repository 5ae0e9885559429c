//! Process-wide map from guild to playback engine. Engines are created
//! lazily on first use and live for the lifetime of the process.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use serenity::model::id::{ChannelId, GuildId};
use songbird::Songbird;
use tokio::sync::Mutex;
use tracing::info;

use crate::commands::music::audio_sources::stream_provider::FallbackStreamProvider;

use super::announcer::Announcer;
use super::config::CONFIG;
use super::playback_engine::PlaybackEngine;
use super::voice_sink::SongbirdSink;

static ENGINES: LazyLock<DashMap<GuildId, Arc<Mutex<PlaybackEngine>>>> =
    LazyLock::new(DashMap::new);

/// Look up an existing engine (the settled-signal path).
pub fn get(guild_id: GuildId) -> Option<Arc<Mutex<PlaybackEngine>>> {
    ENGINES.get(&guild_id).map(|entry| Arc::clone(&entry))
}

/// Return the guild's engine, creating one on first use. Later calls
/// refresh the announcement channel so status messages follow the user,
/// without resetting playback state.
pub async fn get_or_create(
    songbird: Arc<Songbird>,
    http: Arc<serenity::Http>,
    guild_id: GuildId,
    text_channel: ChannelId,
) -> Arc<Mutex<PlaybackEngine>> {
    let engine = ENGINES
        .entry(guild_id)
        .or_insert_with(|| {
            info!("creating playback engine for guild {}", guild_id);
            let config = CONFIG.clone();
            let sink = Box::new(SongbirdSink::new(songbird, guild_id));
            let provider = Arc::new(FallbackStreamProvider::standard(&config));
            Arc::new(Mutex::new(PlaybackEngine::new(
                guild_id, sink, provider, config,
            )))
        })
        .clone();

    engine
        .lock()
        .await
        .set_announcer(Some(Announcer::new(http, text_channel)));

    engine
}
