pub mod leave;
pub mod loop_mode;
pub mod pause;
pub mod play;
pub mod queue;
pub mod remove;
pub mod resume;
pub mod shuffle;
pub mod skip;
pub mod stop;

pub mod audio_sources;
pub mod utils;
