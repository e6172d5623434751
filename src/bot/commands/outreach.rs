//! Mail Discord commands - reminder batches and the test email.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::answer_user_error},
        core::{
            outreach::{self, OutreachSummary},
            window,
        },
        errors::{Error, Result},
        mail::{HttpMailer, MailError},
    };

    fn summary_text(what: &str, summary: OutreachSummary) -> String {
        if summary.total() == 0 {
            return format!("📭 No {what} to send today.");
        }
        format!(
            "📬 {what}: **{}** sent, {} without email, {} failed.",
            summary.sent, summary.skipped, summary.failed
        )
    }

    async fn require_mailer<'a>(
        ctx: poise::Context<'a, BotData, Error>,
    ) -> Result<Option<&'a HttpMailer>> {
        let mailer = ctx.data().mailer.as_ref();
        if mailer.is_none() {
            ctx.say(format!("❌ {}", MailError::NotConfigured)).await?;
        }
        Ok(mailer)
    }

    /// Parent command for reminder mail.
    #[poise::command(slash_command, subcommands("remind_birthdays", "remind_inspections"))]
    pub async fn remind(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Reminder mail command. Available subcommands:\n\
            `/remind birthdays` - Greet today's birthdays\n\
            `/remind inspections` - Remind customers of inspections due soon";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Mails a birthday greeting to every customer whose birthday is today.
    #[poise::command(slash_command, rename = "birthdays")]
    pub async fn remind_birthdays(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(mailer) = require_mailer(ctx).await? else {
            return Ok(());
        };
        ctx.defer().await?;

        let data = ctx.data();
        let summary =
            outreach::send_birthday_greetings(&data.database, mailer, &data.shop.shop, window::today())
                .await?;

        ctx.say(summary_text("Birthday greetings", summary)).await?;
        Ok(())
    }

    /// Mails a reminder for every open inspection due within the horizon.
    #[poise::command(slash_command, rename = "inspections")]
    pub async fn remind_inspections(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Days ahead to look (default from shop.toml)"] days: Option<u32>,
    ) -> Result<()> {
        let Some(mailer) = require_mailer(ctx).await? else {
            return Ok(());
        };
        ctx.defer().await?;

        let data = ctx.data();
        let horizon = days.unwrap_or(data.shop.reminders.horizon_days);
        let summary = outreach::send_inspection_reminders(
            &data.database,
            mailer,
            &data.shop.shop,
            window::today(),
            horizon,
        )
        .await?;

        ctx.say(summary_text("Inspection reminders", summary)).await?;
        Ok(())
    }

    /// Sends a test email to check the mail setup.
    #[poise::command(slash_command)]
    pub async fn test_email(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipient address"] to: String,
    ) -> Result<()> {
        let Some(mailer) = require_mailer(ctx).await? else {
            return Ok(());
        };
        ctx.defer().await?;

        let data = ctx.data();
        match outreach::send_test_email(&data.database, mailer, &to, &data.shop.shop.name).await {
            Ok(_) => {
                ctx.say(format!("✅ Test email sent to {}.", to.trim())).await?;
                Ok(())
            }
            Err(Error::Mail(e)) => {
                ctx.say(format!("❌ The mail endpoint did not accept the message: {e}"))
                    .await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
