//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and staff assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} Console Help**\n\n\
        **Customers**\n\
        • `/customer add|edit|info|list` - Register, edit and look up customers.\n\n\
        **Sales & Inspections**\n\
        • `/sale record <product> <price> [customer] [bike_model] ...` - Records a sale. Bike sales book the first inspection one year out.\n\
        • `/sale list|info` - Browse sales.\n\
        • `/inspection schedule|complete|edit|list|upcoming` - Manage inspections.\n\n\
        **Dashboard**\n\
        • `/dashboard` - Today's birthdays, upcoming inspections and headline numbers.\n\
        • `/report [year]` - Monthly inspections and revenue.\n\
        • `/notifications list|read|readall` - The notification feed.\n\n\
        **Mail**\n\
        • `/remind birthdays|inspections` - Mails today's reminders.\n\
        • `/test_email <to>` - Checks the mail setup.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.",
            ctx.data().shop.shop.name
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
