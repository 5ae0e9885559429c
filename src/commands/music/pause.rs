use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

/// Pause the current track
#[poise::command(slash_command, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::nothing_playing()).await?;
        return Ok(());
    };

    let mut engine = engine.lock().await;
    let current = engine.current_track();

    match (engine.pause().await, current) {
        (Ok(()), Some(track)) => {
            drop(engine);
            ctx.send(embedded_messages::paused(&track)).await?;
        }
        (Ok(()), None) => {
            drop(engine);
            ctx.send(embedded_messages::nothing_playing()).await?;
        }
        (Err(MusicError::NothingPlaying), _) => {
            drop(engine);
            ctx.send(embedded_messages::nothing_playing()).await?;
        }
        (Err(e), _) => {
            drop(engine);
            ctx.send(embedded_messages::error(e.to_string())).await?;
        }
    }

    Ok(())
}
