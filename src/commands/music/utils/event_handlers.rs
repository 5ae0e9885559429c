//! Songbird track-event handler that feeds "playback settled" signals back
//! into the owning guild's engine.

use serenity::async_trait;
use serenity::model::id::GuildId;
use songbird::tracks::PlayMode;
use songbird::{Event, EventContext, EventHandler};
use tracing::debug;

use super::engine_registry;
use super::playback_engine::SettledOutcome;

/// Attached to every played track for `TrackEvent::End` and
/// `TrackEvent::Error`. Carries the playback generation so signals from an
/// already-replaced track are recognized as stale by the engine.
pub struct TrackEndNotifier {
    guild_id: GuildId,
    generation: u64,
}

impl TrackEndNotifier {
    pub fn new(guild_id: GuildId, generation: u64) -> Self {
        Self {
            guild_id,
            generation,
        }
    }
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(track_list) = ctx {
            let errored = track_list
                .iter()
                .any(|(state, _)| matches!(state.playing, PlayMode::Errored(_)));
            let outcome = if errored {
                SettledOutcome::Errored
            } else {
                SettledOutcome::Finished
            };

            match engine_registry::get(self.guild_id) {
                Some(engine) => {
                    engine
                        .lock()
                        .await
                        .on_playback_settled(outcome, self.generation)
                        .await;
                }
                None => {
                    debug!("settled signal for unknown guild {}", self.guild_id);
                }
            }
        }
        None
    }
}
