use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

/// Leave the voice channel, dropping whatever was queued
#[poise::command(slash_command, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::bot_not_connected()).await?;
        return Ok(());
    };

    engine.lock().await.stop().await;

    ctx.send(embedded_messages::left_voice_channel()).await?;

    Ok(())
}
