//! Dashboard Discord commands - alerts, headline numbers, the monthly report
//! and the notification feed.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::answer_user_error},
        core::{
            notification::{self as notification_ops, DEFAULT_FEED_LIMIT},
            reminder,
            report::{self, format_bar, format_currency},
            window,
        },
        errors::{Error, Result},
    };
    use chrono::Datelike;
    use std::fmt::Write;

    /// Shows today's birthdays, upcoming inspections, headline numbers and unread notifications.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let today = window::today();
        let horizon = ctx.data().shop.reminders.horizon_days;

        let alerts = reminder::load_dashboard_alerts(db, today, horizon).await?;
        let stats = report::dashboard_stats(db, today.year()).await?;
        let unread = notification_ops::count_unread(db).await?;

        let mut text = format!("📋 **{} - {today}**\n\n", ctx.data().shop.shop.name);

        writeln!(
            text,
            "👥 Customers: **{}** · 🔧 Inspections: **{}** ({} completed, {} pending) · 🧾 Sales {}: **{}**",
            stats.customers,
            stats.inspections,
            stats.completed_inspections,
            stats.pending_inspections,
            today.year(),
            format_currency(stats.sales_total)
        )?;

        if alerts.is_empty() {
            writeln!(text, "\n✨ No alerts today.")?;
        }
        if !alerts.birthdays.is_empty() {
            writeln!(text, "\n🎂 **Birthdays today**")?;
            for customer in &alerts.birthdays {
                writeln!(text, "• {} (#{})", customer.name, customer.id)?;
            }
        }
        if !alerts.inspections.is_empty() {
            writeln!(text, "\n🔧 **Inspections due within {horizon} days**")?;
            for upcoming in &alerts.inspections {
                writeln!(
                    text,
                    "• {} - {} - {} ({})",
                    upcoming.customer_name,
                    upcoming.bike_model,
                    upcoming.inspection.next_inspection_date,
                    upcoming.window.label().unwrap_or_else(|| "later".to_string())
                )?;
            }
        }

        if unread > 0 {
            writeln!(text, "\n🔔 {unread} unread notifications (`/notifications list`)")?;
        }

        ctx.say(text).await?;
        Ok(())
    }

    /// Monthly inspections and revenue for a year.
    #[poise::command(slash_command, prefix_command)]
    pub async fn report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year (default current year)"] year: Option<i32>,
    ) -> Result<()> {
        let year = year.unwrap_or_else(|| window::today().year());
        let months = report::load_monthly_activity(&ctx.data().database, year).await?;

        let max_revenue = months
            .iter()
            .map(report::MonthlyActivity::total_revenue)
            .fold(0.0_f64, f64::max);

        let mut text = format!("📊 **Activity {year}**\n```\n");
        for month in &months {
            writeln!(
                text,
                "{} {} {:>3} insp  {:>10}",
                month.month,
                format_bar(month.total_revenue(), max_revenue, 10),
                month.inspections,
                format_currency(month.total_revenue())
            )?;
        }
        text.push_str("```");

        let inspections: u32 = months.iter().map(|m| m.inspections).sum();
        let inspection_revenue: f64 = months.iter().map(|m| m.inspection_revenue).sum();
        let sale_revenue: f64 = months.iter().map(|m| m.sale_revenue).sum();
        write!(
            text,
            "**Inspections:** {inspections} ({}) · **Sales:** {}",
            format_currency(inspection_revenue),
            format_currency(sale_revenue)
        )?;

        ctx.say(text).await?;
        Ok(())
    }

    /// Parent command for the notification feed.
    #[poise::command(
        slash_command,
        subcommands("notifications_list", "notifications_read", "notifications_readall")
    )]
    pub async fn notifications(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Notification command. Available subcommands:\n\
            `/notifications list` - Show the latest notifications\n\
            `/notifications read` - Mark one notification read\n\
            `/notifications readall` - Mark everything read";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the latest notifications, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn notifications_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many to show (default 10)"] limit: Option<u64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let feed =
            notification_ops::list_notifications(db, limit.unwrap_or(DEFAULT_FEED_LIMIT).min(25))
                .await?;

        if feed.is_empty() {
            ctx.say("🔔 No notifications.").await?;
            return Ok(());
        }

        let mut text = String::from("🔔 **Notifications**\n");
        for notification in &feed {
            let marker = if notification.read { "" } else { " 🆕" };
            writeln!(
                text,
                "{} #{} **{}**{marker} - {} _({})_",
                notification.kind.icon(),
                notification.id,
                notification.title,
                notification.message,
                notification.created_at.format("%Y-%m-%d %H:%M")
            )?;
        }

        ctx.say(text).await?;
        Ok(())
    }

    /// Marks one notification read.
    #[poise::command(slash_command, rename = "read")]
    pub async fn notifications_read(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Notification number"] id: i64,
    ) -> Result<()> {
        match notification_ops::mark_read(&ctx.data().database, id).await {
            Ok(_) => {
                ctx.say(format!("✅ Notification #{id} marked read.")).await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }

    /// Marks every notification read.
    #[poise::command(slash_command, rename = "readall")]
    pub async fn notifications_readall(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let count = notification_ops::mark_all_read(&ctx.data().database).await?;
        ctx.say(format!("✅ Marked {count} notifications read.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
