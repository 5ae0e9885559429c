use std::sync::LazyLock;

pub mod commands;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

// User data, which is stored and accessible in all command invocations
pub struct Data {}

/// Shared HTTP client handed to songbird's lazy inputs and used for any
/// direct requests. Reqwest pools connections internally, so one instance
/// serves the whole process.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
