//! Track fixtures for queue and engine tests.

use turntable::commands::music::audio_sources::track::Track;

/// A track whose locator is derived from its title, so tests can assert on
/// which locator reached the stream provider.
pub fn track(title: &str) -> Track {
    Track::new(title, url_for(title))
}

pub fn url_for(title: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", title)
}

pub fn tracks(titles: &[&str]) -> Vec<Track> {
    titles.iter().map(|title| track(title)).collect()
}
