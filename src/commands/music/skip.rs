use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

/// Skip the currently playing track
#[poise::command(slash_command, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::nothing_playing()).await?;
        return Ok(());
    };

    // Stopping the sink triggers the same settled path as a natural end,
    // so the next track starts without further involvement here.
    let skipped = engine.lock().await.skip().await;

    match skipped {
        Some(track) => ctx.send(embedded_messages::skipped(&track)).await?,
        None => ctx.send(embedded_messages::nothing_playing()).await?,
    };

    Ok(())
}
