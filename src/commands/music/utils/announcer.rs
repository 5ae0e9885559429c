//! Best-effort status messages from the engine to the guild's text
//! channel. Delivery failures are logged and swallowed; they must never
//! feed back into playback logic.

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use serenity::all::CreateMessage;
use serenity::model::id::ChannelId;
use tracing::warn;

use crate::commands::music::audio_sources::track::Track;

use super::embedded_messages;

/// Engine-originated status updates.
#[derive(Debug)]
pub enum Announcement {
    NowPlaying(Track),
    Skipping { title: String },
    GivingUp { failures: u32 },
    QueueFinished,
}

pub struct Announcer {
    http: Arc<serenity::Http>,
    channel_id: ChannelId,
}

impl Announcer {
    pub fn new(http: Arc<serenity::Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub async fn post(&self, announcement: Announcement) {
        let embed = match &announcement {
            Announcement::NowPlaying(track) => embedded_messages::now_playing(track),
            Announcement::Skipping { title } => embedded_messages::skipping_unplayable(title),
            Announcement::GivingUp { failures } => embedded_messages::giving_up(*failures),
            Announcement::QueueFinished => embedded_messages::queue_finished(),
        };

        let message = CreateMessage::new().embed(embed);
        if let Err(e) = self.channel_id.send_message(self.http.clone(), message).await {
            warn!(
                "failed to deliver status message to channel {}: {}",
                self.channel_id, e
            );
        }
    }
}
