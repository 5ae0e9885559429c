use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

/// Shuffle the queue. The whole list is reshuffled, current track included.
#[poise::command(slash_command, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    };

    let mut engine = engine.lock().await;
    let count = engine.queue().len();
    if count < 2 {
        drop(engine);
        ctx.send(embedded_messages::nothing_to_shuffle()).await?;
        return Ok(());
    }

    engine.shuffle();
    drop(engine);

    ctx.send(embedded_messages::shuffled(count)).await?;

    Ok(())
}
