use poise::CreateReply;

use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

/// Show the current queue
#[poise::command(slash_command, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    };

    let engine = engine.lock().await;
    if engine.queue().is_empty() {
        drop(engine);
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    }

    let embed = embedded_messages::music_queue(engine.queue());
    drop(engine);

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}
