//! Secrets read from environment variables.
//!
//! Credentials never live in shop.toml; they come from the process environment
//! (optionally populated from `.env`).

use crate::errors::Result;

/// Reads the Discord bot token from `DISCORD_BOT_TOKEN`.
pub fn discord_token() -> Result<String> {
    Ok(std::env::var("DISCORD_BOT_TOKEN")?)
}

/// Reads the mail endpoint key from `MAIL_API_KEY`, if set and non-empty.
#[must_use]
pub fn mail_api_key() -> Option<String> {
    std::env::var("MAIL_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}
