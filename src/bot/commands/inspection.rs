//! Inspection Discord commands - scheduling, completing and reviewing inspections.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{MAX_LIST_LINES, answer_user_error, clearable},
            handlers::autocomplete,
        },
        core::{
            inspection::{self as inspection_ops, BikeChoice, InspectionChanges, NewInspection},
            reminder,
            report::format_currency,
            sale::next_inspection_after,
            window,
        },
        entities::{InspectionStatus, inspection},
        errors::{Error, Result},
    };
    use chrono::NaiveDate;
    use std::fmt::Write;

    /// Inspection status as offered in Discord.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusChoice {
        Scheduled,
        Completed,
        Pending,
        Cancelled,
    }

    impl From<StatusChoice> for InspectionStatus {
        fn from(choice: StatusChoice) -> Self {
            match choice {
                StatusChoice::Scheduled => Self::Scheduled,
                StatusChoice::Completed => Self::Completed,
                StatusChoice::Pending => Self::Pending,
                StatusChoice::Cancelled => Self::Cancelled,
            }
        }
    }

    fn parse_optional_date(raw: Option<&str>) -> std::result::Result<Option<NaiveDate>, String> {
        raw.map_or(Ok(None), |raw| {
            window::parse_date(raw)
                .map(Some)
                .ok_or_else(|| format!("❌ '{raw}' is not a date. Use YYYY-MM-DD."))
        })
    }

    fn status_icon(status: InspectionStatus) -> &'static str {
        match status {
            InspectionStatus::Scheduled => "📅",
            InspectionStatus::Completed => "✅",
            InspectionStatus::Pending => "⏳",
            InspectionStatus::Cancelled => "🚫",
        }
    }

    fn inspection_line(inspection: &inspection::Model) -> String {
        format!(
            "{} #{} {} → next {} ({}, customer #{}, bike #{})",
            status_icon(inspection.status),
            inspection.id,
            inspection.date,
            inspection.next_inspection_date,
            inspection.status,
            inspection.customer_id,
            inspection.bike_id
        )
    }

    /// Parent command for inspections.
    #[poise::command(
        slash_command,
        subcommands(
            "inspection_schedule",
            "inspection_complete",
            "inspection_edit",
            "inspection_list",
            "inspection_upcoming"
        )
    )]
    pub async fn inspection(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Inspection command. Available subcommands:\n\
            `/inspection schedule` - Book an inspection\n\
            `/inspection complete` - Mark an inspection completed\n\
            `/inspection edit` - Change status, dates, fees or notes\n\
            `/inspection list` - List inspections\n\
            `/inspection upcoming` - Inspections due soon";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Books an inspection for an existing bike (`bike_id`) or a new one (`bike_model`).
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "schedule")]
    pub async fn inspection_schedule(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: String,
        #[description = "ID of one of the customer's bikes"] bike_id: Option<i64>,
        #[description = "Model of a bike to register"] bike_model: Option<String>,
        #[description = "Serial number of the new bike"] serial_number: Option<String>,
        #[description = "Inspection date YYYY-MM-DD (default today)"] date: Option<String>,
        #[description = "Next inspection date YYYY-MM-DD (default one year later)"]
        next_date: Option<String>,
        #[description = "Inspection fee"] inspection_fee: Option<f64>,
        #[description = "Labor fee"] labor_fee: Option<f64>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(found) = autocomplete::resolve_customer(db, &customer).await? else {
            ctx.say(format!("❌ Could not find a customer matching '{customer}'."))
                .await?;
            return Ok(());
        };

        let bike = match (bike_id, bike_model) {
            (Some(id), None) => BikeChoice::Existing(id),
            (None, Some(model)) => BikeChoice::New {
                model,
                serial_number,
            },
            _ => {
                ctx.say("❌ Give exactly one of `bike_id` or `bike_model`.")
                    .await?;
                return Ok(());
            }
        };

        let dates = parse_optional_date(date.as_deref())
            .and_then(|d| Ok((d, parse_optional_date(next_date.as_deref())?)));
        let (date, next_date) = match dates {
            Ok(dates) => dates,
            Err(message) => {
                ctx.say(message).await?;
                return Ok(());
            }
        };
        let date = date.unwrap_or_else(window::today);
        let Some(next_inspection_date) = next_date.or_else(|| next_inspection_after(date)) else {
            ctx.say("❌ Inspection date is out of range.").await?;
            return Ok(());
        };

        let today = window::today();
        let existing = inspection_ops::find_next_inspection_for_customer(db, found.id, today).await?;

        let input = NewInspection {
            notes,
            inspection_fee,
            labor_fee,
            ..NewInspection::scheduled(found.id, bike, date, next_inspection_date)
        };

        match inspection_ops::schedule_inspection(db, input).await {
            Ok(created) => {
                let mut text = format!(
                    "✅ Scheduled inspection #{} for **{}** on {} (next due {}).",
                    created.id, found.name, created.date, created.next_inspection_date
                );
                if let Some(existing) = existing {
                    write!(
                        text,
                        "\n⚠️ {} already had inspection #{} due {}.",
                        found.name, existing.id, existing.next_inspection_date
                    )?;
                }
                ctx.say(text).await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }

    /// Marks a scheduled or pending inspection completed.
    #[poise::command(slash_command, rename = "complete")]
    pub async fn inspection_complete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Inspection number"] id: i64,
    ) -> Result<()> {
        match inspection_ops::mark_completed(&ctx.data().database, id).await {
            Ok(inspection) => {
                ctx.say(format!(
                    "✅ Inspection #{} completed. Fees: {}.",
                    inspection.id,
                    format_currency(inspection.total_fee())
                ))
                .await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }

    /// Edits an inspection. Use "-" to clear notes or the invoice, a negative fee to clear a fee.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "edit")]
    pub async fn inspection_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Inspection number"] id: i64,
        #[description = "New status"] status: Option<StatusChoice>,
        #[description = "Inspection date YYYY-MM-DD"] date: Option<String>,
        #[description = "Next inspection date YYYY-MM-DD"] next_date: Option<String>,
        #[description = "Inspection fee (negative clears)"] inspection_fee: Option<f64>,
        #[description = "Labor fee (negative clears)"] labor_fee: Option<f64>,
        #[description = "Notes (\"-\" clears)"] notes: Option<String>,
        #[description = "Invoice file name or URL (\"-\" clears)"] invoice: Option<String>,
    ) -> Result<()> {
        let dates = parse_optional_date(date.as_deref())
            .and_then(|d| Ok((d, parse_optional_date(next_date.as_deref())?)));
        let (date, next_inspection_date) = match dates {
            Ok(dates) => dates,
            Err(message) => {
                ctx.say(message).await?;
                return Ok(());
            }
        };
        let fee = |value: Option<f64>| value.map(|v| (v >= 0.0).then_some(v));

        let changes = InspectionChanges {
            status: status.map(Into::into),
            date,
            next_inspection_date,
            notes: clearable(notes),
            inspection_fee: fee(inspection_fee),
            labor_fee: fee(labor_fee),
            invoice_file: clearable(invoice),
        };

        match inspection_ops::update_inspection(&ctx.data().database, id, changes).await {
            Ok(updated) => {
                ctx.say(format!("✅ Updated inspection.\n{}", inspection_line(&updated)))
                    .await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }

    /// Lists inspections, newest first, optionally for one customer.
    #[poise::command(slash_command, rename = "list")]
    pub async fn inspection_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this customer's inspections"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let inspections = match customer {
            Some(raw) => {
                let Some(found) = autocomplete::resolve_customer(db, &raw).await? else {
                    ctx.say(format!("❌ Could not find a customer matching '{raw}'."))
                        .await?;
                    return Ok(());
                };
                inspection_ops::list_inspections_for_customer(db, found.id).await?
            }
            None => inspection_ops::list_inspections(db).await?,
        };

        if inspections.is_empty() {
            ctx.say("🔧 No inspections found.").await?;
            return Ok(());
        }

        let mut text = format!("🔧 **Inspections ({})**\n", inspections.len());
        for inspection in inspections.iter().take(MAX_LIST_LINES) {
            writeln!(text, "{}", inspection_line(inspection))?;
        }
        if inspections.len() > MAX_LIST_LINES {
            writeln!(text, "…and {} more", inspections.len() - MAX_LIST_LINES)?;
        }

        ctx.say(text).await?;
        Ok(())
    }

    /// Open inspections due within the next few days.
    #[poise::command(slash_command, rename = "upcoming")]
    pub async fn inspection_upcoming(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Days ahead to look (default from shop.toml)"] days: Option<u32>,
    ) -> Result<()> {
        let horizon = days.unwrap_or(ctx.data().shop.reminders.horizon_days);
        let alerts =
            reminder::load_dashboard_alerts(&ctx.data().database, window::today(), horizon).await?;

        if alerts.inspections.is_empty() {
            ctx.say(format!("🔧 No inspections due in the next {horizon} days."))
                .await?;
            return Ok(());
        }

        let mut text = format!("🔧 **Due in the next {horizon} days**\n");
        for upcoming in &alerts.inspections {
            writeln!(
                text,
                "• #{} **{}** - {} - {} ({})",
                upcoming.inspection.id,
                upcoming.customer_name,
                upcoming.bike_model,
                upcoming.inspection.next_inspection_date,
                upcoming.window.label().unwrap_or_else(|| "later".to_string())
            )?;
        }

        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
