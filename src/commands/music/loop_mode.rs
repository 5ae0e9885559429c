use crate::commands::music::utils::playback_engine::MusicError;
use crate::commands::music::utils::playback_queue::LoopMode;
use crate::commands::music::utils::{embedded_messages, engine_registry};
use crate::{CommandResult, Context};

#[derive(poise::ChoiceParameter)]
pub enum LoopChoice {
    #[name = "off"]
    Off,
    #[name = "track"]
    Track,
    #[name = "queue"]
    Queue,
}

/// Set the loop mode: off, track, or queue
#[poise::command(slash_command, rename = "loop", category = "Music")]
pub async fn loop_mode(
    ctx: Context<'_>,
    #[description = "off | track | queue"] mode: LoopChoice,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(engine) = engine_registry::get(guild_id) else {
        ctx.send(embedded_messages::nothing_playing()).await?;
        return Ok(());
    };

    let mode = match mode {
        LoopChoice::Off => LoopMode::Off,
        LoopChoice::Track => LoopMode::Track,
        LoopChoice::Queue => LoopMode::Queue,
    };

    engine.lock().await.set_loop_mode(mode);

    ctx.send(embedded_messages::loop_set(mode)).await?;

    Ok(())
}
