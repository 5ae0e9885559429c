use poise::CreateReply;
use tracing::info;

use crate::commands::music::audio_sources;
use crate::commands::music::utils::playback_engine::{MusicError, PlayOutcome};
use crate::commands::music::utils::{embedded_messages, engine_registry, voice_sink};
use crate::{CommandResult, Context};

/// Play a track from YouTube (URL, playlist URL, or search terms)
#[poise::command(slash_command, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    // The requester has to sit in a voice channel for us to know where to go
    let voice_channel = match voice_sink::user_voice_channel(
        ctx.serenity_context(),
        guild_id,
        ctx.author().id,
    ) {
        Ok(channel) => channel,
        Err(e) => {
            ctx.send(embedded_messages::error(format!(
                "You need to be in a voice channel: {}",
                e
            )))
            .await?;
            return Ok(());
        }
    };

    // Defer the response since resolution might take time
    ctx.defer().await?;

    let tracks = match audio_sources::resolve(&query, Some(ctx.author().name.clone())).await {
        Ok(tracks) => tracks,
        Err(MusicError::NoResults(q)) => {
            ctx.send(embedded_messages::error(format!(
                "Nothing found for `{}`",
                q
            )))
            .await?;
            return Ok(());
        }
        Err(e) => {
            ctx.send(embedded_messages::error(format!(
                "Failed to process audio source: {}",
                e
            )))
            .await?;
            return Ok(());
        }
    };

    let songbird = songbird::get(ctx.serenity_context())
        .await
        .ok_or(MusicError::NoVoiceManager)?;
    let engine = engine_registry::get_or_create(
        songbird,
        ctx.serenity_context().http.clone(),
        guild_id,
        ctx.channel_id(),
    )
    .await;
    let mut engine = engine.lock().await;

    let track_count = tracks.len();
    let first = tracks[0].clone();
    let mut first_outcome = None;

    for track in tracks {
        match engine.add_and_play(track, voice_channel).await {
            Ok(outcome) => {
                first_outcome.get_or_insert(outcome);
            }
            Err(e @ MusicError::JoinError(_)) => {
                ctx.send(embedded_messages::error(format!(
                    "Could not join voice channel: {}",
                    e
                )))
                .await?;
                return Ok(());
            }
            Err(e) => {
                ctx.send(embedded_messages::error(e.to_string())).await?;
                return Ok(());
            }
        }
    }

    let queue_len = engine.queue().len();
    drop(engine);

    let embed = match first_outcome {
        Some(PlayOutcome::Started) => {
            let mut embed = embedded_messages::now_playing(&first);
            if track_count > 1 {
                embed = embed.field("Queued", format!("`{} tracks`", track_count), true);
            }
            embed
        }
        Some(PlayOutcome::Queued) => {
            let position = queue_len.saturating_sub(track_count) + 1;
            embedded_messages::added_to_queue(&first, position)
        }
        // resolve() never returns an empty list, so at least one outcome exists
        None => return Ok(()),
    };

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}
