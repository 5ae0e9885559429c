use poise::{serenity_prelude as serenity, CreateReply};
use serenity::all::CreateEmbed;

use crate::commands::music::audio_sources::track::Track;
use crate::commands::music::utils::playback_queue::{LoopMode, PlaybackQueue};

use super::format_duration;

/// Parse the track fields shared by the now-playing and queued embeds
fn parse_track(track: &Track) -> (String, String, String) {
    let title = track.title.clone();
    let url = track.url.clone();
    let duration_str = track
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Unknown duration".to_string());

    (title, url, duration_str)
}

/// Create an embed for when a song is now playing
pub fn now_playing(track: &Track) -> CreateEmbed {
    let (title, url, duration_str) = parse_track(track);

    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(format!("[{}]({})", title, url))
        .field("Duration", format!("`{}`", duration_str), true)
        .color(0x00ff00);

    if let Some(requested_by) = &track.requested_by {
        embed = embed.field("Requested by", requested_by.clone(), true);
    }
    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail.clone());
    }

    embed
}

/// Create an embed for when a song is added to the queue
pub fn added_to_queue(track: &Track, position: usize) -> CreateEmbed {
    let (title, url, duration_str) = parse_track(track);

    let mut embed = CreateEmbed::new()
        .title("🎵 Added to Queue")
        .description(format!("[{}]({})", title, url))
        .field("Duration", format!("`{}`", duration_str), true)
        .field("Position", format!("`#{}`", position), true)
        .color(0x00ff00);

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail.clone());
    }

    embed
}

/// Engine announcement: a track could not be streamed and is being skipped
pub fn skipping_unplayable(title: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("⚠️ Skipping Track")
        .description(format!("Could not play **{}**, skipping", title))
        .color(0xffa500)
}

/// Engine announcement: the circuit breaker tripped
pub fn giving_up(failures: u32) -> CreateEmbed {
    CreateEmbed::new()
        .title("🚫 Stopping Playback")
        .description(format!(
            "Stopping: {} consecutive tracks failed to play",
            failures
        ))
        .color(0xff0000)
}

/// Engine announcement: the queue ran out naturally
pub fn queue_finished() -> CreateEmbed {
    CreateEmbed::new()
        .title("⏹️ Queue Finished")
        .description("Nothing left to play")
        .color(0x808080)
}

/// Create an embed for the music queue
pub fn music_queue(queue: &PlaybackQueue) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title("🎶 Queue").color(0x00ff00);

    match queue.current() {
        Some(track) => {
            let (title, url, duration_str) = parse_track(track);
            embed = embed.field(
                "Now Playing",
                format!("[{}]({}) `{}`", title, url, duration_str),
                false,
            );
        }
        None => {
            embed = embed.field("Now Playing", "Nothing", false);
        }
    }

    let upcoming: Vec<String> = queue
        .items()
        .iter()
        .enumerate()
        .skip(queue.position().map(|p| p + 1).unwrap_or(0))
        .take(10)
        .map(|(index, track)| format!("`#{}` [{}]({})", index + 1, track.title, track.url))
        .collect();

    if !upcoming.is_empty() {
        embed = embed.field("Up Next", upcoming.join("\n"), false);
    }

    if queue.loop_mode() != LoopMode::Off {
        embed = embed.field("Loop", format!("`{}`", queue.loop_mode()), true);
    }

    embed.field("Tracks", format!("`{}`", queue.len()), true)
}

/// Generic red error reply, ephemeral so it does not clutter the channel
pub fn error(description: impl Into<String>) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(description.into())
                .color(0xff0000),
        )
        .ephemeral(true)
}

pub fn bot_not_connected() -> CreateReply {
    error("Not connected to a voice channel")
}

pub fn nothing_playing() -> CreateReply {
    error("No track is currently playing")
}

pub fn queue_is_empty() -> CreateReply {
    error("The queue is empty")
}

pub fn invalid_queue_position(len: usize) -> CreateReply {
    error(format!("Invalid position, the queue has {} tracks", len))
}

pub fn cannot_remove_current() -> CreateReply {
    error("Cannot remove the track that is currently playing")
}

pub fn skipped(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏭️ Skipped")
            .description(format!("Skipped [{}]({})", track.title, track.url))
            .color(0x00ff00),
    )
}

pub fn paused(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏸️ Paused")
            .description(format!("Paused [{}]({})", track.title, track.url))
            .color(0x00ff00),
    )
}

pub fn resumed(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("▶️ Resumed")
            .description(format!("Resumed [{}]({})", track.title, track.url))
            .color(0x00ff00),
    )
}

pub fn stopped() -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("🛑 Stopped")
                .description("Stopped playback and cleared the queue")
                .color(0x00ff00),
        )
        .ephemeral(true)
}

pub fn left_voice_channel() -> CreateReply {
    CreateReply::default().content("👋 Left the voice channel")
}

pub fn shuffled(count: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🔀 Shuffled")
            .description(format!("Shuffled {} tracks", count))
            .color(0x00ff00),
    )
}

pub fn nothing_to_shuffle() -> CreateReply {
    error("Not enough tracks to shuffle")
}

pub fn loop_set(mode: LoopMode) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🔁 Loop")
            .description(format!("Loop mode set to **{}**", mode))
            .color(0x00ff00),
    )
}

pub fn track_removed(track: &Track, position: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🗑️ Removed")
            .description(format!(
                "Removed [{}]({}) from position `#{}`",
                track.title, track.url, position
            ))
            .color(0x00ff00),
    )
}
