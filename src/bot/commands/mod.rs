//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Customer management commands
pub mod customer;

/// Dashboard, report and notification feed commands
pub mod dashboard;

/// General utility commands
pub mod general;

/// Inspection commands
pub mod inspection;

/// Reminder mail and test email commands
pub mod outreach;

/// Sale commands
pub mod sale;

// Export commands
pub use customer::*;
pub use dashboard::*;
pub use general::*;
pub use inspection::*;
pub use outreach::*;
pub use sale::*;

use crate::{
    bot::BotData,
    errors::{Error, Result},
};

/// Answers operator mistakes inline with ❌ and hands every other error back
/// to the framework error handler.
pub(crate) async fn answer_user_error(
    ctx: poise::Context<'_, BotData, Error>,
    error: Error,
) -> Result<()> {
    if error.is_user_error() {
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

/// Discord messages are capped at 2000 characters; long lists are cut at this many lines.
pub(crate) const MAX_LIST_LINES: usize = 30;

/// Maps the "-" placeholder to an empty string, which clears a field on edit.
pub(crate) fn clearable(value: Option<String>) -> Option<String> {
    value.map(|v| if v.trim() == "-" { String::new() } else { v })
}
