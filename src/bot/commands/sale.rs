//! Sale Discord commands - recording and browsing sales.
//!
//! `/sale record` runs the whole sale linker inside one database transaction, so
//! a failure part-way leaves nothing behind.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{MAX_LIST_LINES, answer_user_error},
            handlers::autocomplete,
        },
        core::{
            customer::NewCustomer,
            report::format_currency,
            sale::{self as sale_ops, CustomerRef, SaleInput},
            window,
        },
        errors::{Error, Result},
    };
    use sea_orm::TransactionTrait;
    use std::fmt::Write;

    /// Parent command for sales.
    #[poise::command(slash_command, subcommands("sale_record", "sale_list", "sale_info"))]
    pub async fn sale(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Sale command. Available subcommands:\n\
            `/sale record` - Record a sale (bike sales book the first inspection)\n\
            `/sale list` - List recent sales\n\
            `/sale info` - Show one sale";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records a sale. A bike model registers the bike and books its first inspection.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "record")]
    pub async fn sale_record(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What was sold"] product: String,
        #[description = "Price in euros"] price: f64,
        #[description = "Existing customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: Option<String>,
        #[description = "Name of a new customer to register with the sale"] new_customer: Option<
            String,
        >,
        #[description = "Email of the new customer"] new_customer_email: Option<String>,
        #[description = "Model of the sold bike"] bike_model: Option<String>,
        #[description = "Serial number of the sold bike"] serial_number: Option<String>,
        #[description = "Sale date YYYY-MM-DD (default today)"] date: Option<String>,
        #[description = "Notes"] notes: Option<String>,
        #[description = "Invoice file name or URL"] invoice: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let customer = match (customer, new_customer) {
            (Some(_), Some(_)) => {
                ctx.say("❌ Give either an existing customer or a new customer name, not both.")
                    .await?;
                return Ok(());
            }
            (Some(raw), None) => {
                let Some(found) = autocomplete::resolve_customer(db, &raw).await? else {
                    ctx.say(format!("❌ Could not find a customer matching '{raw}'."))
                        .await?;
                    return Ok(());
                };
                Some(CustomerRef::Existing(found.id))
            }
            (None, Some(name)) => Some(CustomerRef::New(NewCustomer {
                email: new_customer_email,
                ..NewCustomer::named(name)
            })),
            (None, None) => None,
        };

        let date = match date.as_deref().map(window::parse_date) {
            Some(Some(date)) => date,
            Some(None) => {
                ctx.say("❌ Invalid date. Use YYYY-MM-DD.").await?;
                return Ok(());
            }
            None => window::today(),
        };

        let input = SaleInput {
            customer,
            product_name: product,
            bike_model,
            bike_serial_number: serial_number,
            price,
            date,
            notes,
            invoice_file: invoice,
        };

        let txn = db.begin().await?;
        let outcome = match sale_ops::record_sale(&txn, input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                txn.rollback().await?;
                return answer_user_error(ctx, e).await;
            }
        };
        txn.commit().await?;

        let mut text = format!(
            "✅ Recorded sale #{}: **{}** for **{}** on {}.",
            outcome.sale.id,
            outcome.sale.product_name,
            format_currency(outcome.sale.price),
            outcome.sale.date
        );
        if let Some(bike) = &outcome.bike {
            write!(text, "\n🚲 Bike #{} {}", bike.id, bike.model)?;
        }
        if let Some(inspection) = &outcome.inspection {
            write!(
                text,
                "\n🔧 First inspection #{} due **{}**.",
                inspection.id, inspection.next_inspection_date
            )?;
        }

        ctx.say(text).await?;
        Ok(())
    }

    /// Lists sales, most recent first, optionally for one customer.
    #[poise::command(slash_command, rename = "list")]
    pub async fn sale_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this customer's sales"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let sales = match customer {
            Some(raw) => {
                let Some(found) = autocomplete::resolve_customer(db, &raw).await? else {
                    ctx.say(format!("❌ Could not find a customer matching '{raw}'."))
                        .await?;
                    return Ok(());
                };
                sale_ops::list_sales_for_customer(db, found.id).await?
            }
            None => sale_ops::list_sales(db).await?,
        };

        if sales.is_empty() {
            ctx.say("🧾 No sales recorded.").await?;
            return Ok(());
        }

        let total: f64 = sales.iter().map(|s| s.price).sum();
        let mut text = format!("🧾 **Sales ({}, {})**\n", sales.len(), format_currency(total));
        for sale in sales.iter().take(MAX_LIST_LINES) {
            write!(
                text,
                "• #{} {} - **{}** {}",
                sale.id,
                sale.date,
                sale.product_name,
                format_currency(sale.price)
            )?;
            if let Some(model) = &sale.bike_model {
                write!(text, " 🚲 {model}")?;
            }
            writeln!(text)?;
        }
        if sales.len() > MAX_LIST_LINES {
            writeln!(text, "…and {} more", sales.len() - MAX_LIST_LINES)?;
        }

        ctx.say(text).await?;
        Ok(())
    }

    /// Shows one sale.
    #[poise::command(slash_command, rename = "info")]
    pub async fn sale_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sale number"] id: i64,
    ) -> Result<()> {
        let sale = match sale_ops::get_sale(&ctx.data().database, id).await {
            Ok(sale) => sale,
            Err(e) => return answer_user_error(ctx, e).await,
        };

        let mut text = format!("🧾 **Sale #{}**\n", sale.id);
        writeln!(text, "**Product:** {}", sale.product_name)?;
        writeln!(text, "**Price:** {}", format_currency(sale.price))?;
        writeln!(text, "**Date:** {}", sale.date)?;
        if let Some(customer_id) = sale.customer_id {
            writeln!(text, "**Customer:** #{customer_id}")?;
        }
        if let Some(model) = &sale.bike_model {
            let serial = sale.bike_serial_number.as_deref().unwrap_or("no serial");
            writeln!(text, "**Bike:** {model} ({serial})")?;
        }
        if let Some(notes) = &sale.notes {
            writeln!(text, "**Notes:** {notes}")?;
        }
        if let Some(invoice) = &sale.invoice_file {
            writeln!(text, "**Invoice:** {invoice}")?;
        }

        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
