use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

/// Remove a track from the queue by its position
#[poise::command(slash_command, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position of the track to remove (1-based)"] position: usize,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    };

    // Convert to 0-based index
    let Some(index) = position.checked_sub(1) else {
        ctx.send(embedded_messages::error("Position must be at least 1"))
            .await?;
        return Ok(());
    };

    let mut engine = engine.lock().await;
    let len = engine.queue().len();

    if len == 0 {
        drop(engine);
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    }
    if index >= len {
        drop(engine);
        ctx.send(embedded_messages::invalid_queue_position(len)).await?;
        return Ok(());
    }
    if engine.queue().position() == Some(index) {
        drop(engine);
        ctx.send(embedded_messages::cannot_remove_current()).await?;
        return Ok(());
    }

    let removed = engine.remove_track(index);
    drop(engine);

    match removed {
        Some(track) => {
            ctx.send(embedded_messages::track_removed(&track, position))
                .await?
        }
        None => {
            ctx.send(embedded_messages::error("Failed to remove track"))
                .await?
        }
    };

    Ok(())
}
