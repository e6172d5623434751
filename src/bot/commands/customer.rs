//! Customer Discord commands - registering, editing and looking up customers.

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
            bike as bike_ops,
            customer::{self as customer_ops, CustomerChanges, NewCustomer},
            inspection as inspection_ops, reminder, sale as sale_ops, window,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for customer management.
    #[poise::command(
        slash_command,
        subcommands("customer_add", "customer_edit", "customer_info", "customer_list")
    )]
    pub async fn customer(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Customer management command. Available subcommands:\n\
            `/customer add` - Register a new customer\n\
            `/customer edit` - Change a customer's details\n\
            `/customer info` - Show a customer with bikes, inspections and sales\n\
            `/customer list` - List all customers";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new customer.
    #[poise::command(slash_command, rename = "add")]
    pub async fn customer_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Email address"] email: Option<String>,
        #[description = "Phone number"] phone: Option<String>,
        #[description = "Birthdate (YYYY-MM-DD)"] birthdate: Option<String>,
        #[description = "Tax identification number"] tax_id: Option<String>,
        #[description = "Postal address"] address: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let birthdate = match birthdate.as_deref().map(customer_ops::parse_birthdate) {
            Some(Ok(date)) => Some(date),
            Some(Err(e)) => return answer_user_error(ctx, e).await,
            None => None,
        };

        let input = NewCustomer {
            name,
            tax_id,
            email,
            phone,
            birthdate,
            address,
            notes,
        };

        match customer_ops::create_customer(&ctx.data().database, input).await {
            Ok(customer) => {
                ctx.say(format!(
                    "✅ Registered customer **{}** (#{}).",
                    customer.name, customer.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }

    /// Changes a customer's details. Use "-" to clear an optional field.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn customer_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer to edit"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New email (\"-\" clears)"] email: Option<String>,
        #[description = "New phone (\"-\" clears)"] phone: Option<String>,
        #[description = "New birthdate YYYY-MM-DD (\"-\" clears)"] birthdate: Option<String>,
        #[description = "New tax ID (\"-\" clears)"] tax_id: Option<String>,
        #[description = "New address (\"-\" clears)"] address: Option<String>,
        #[description = "New notes (\"-\" clears)"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(existing) = autocomplete::resolve_customer(db, &customer).await? else {
            ctx.say(format!("❌ Could not find a customer matching '{customer}'."))
                .await?;
            return Ok(());
        };

        let birthdate = match clearable(birthdate).as_deref() {
            None => None,
            Some("") => Some(None),
            Some(raw) => match customer_ops::parse_birthdate(raw) {
                Ok(date) => Some(Some(date)),
                Err(e) => return answer_user_error(ctx, e).await,
            },
        };

        let changes = CustomerChanges {
            name,
            tax_id: clearable(tax_id),
            email: clearable(email),
            phone: clearable(phone),
            birthdate,
            address: clearable(address),
            notes: clearable(notes),
        };
        if changes.is_empty() {
            ctx.say("Nothing to change.").await?;
            return Ok(());
        }

        match customer_ops::update_customer(db, existing.id, changes).await {
            Ok(updated) => {
                ctx.say(format!("✅ Updated customer **{}**.", updated.name))
                    .await?;
                Ok(())
            }
            Err(e) => answer_user_error(ctx, e).await,
        }
    }

    /// Shows a customer with their bikes, inspections and sales.
    #[poise::command(slash_command, rename = "info")]
    pub async fn customer_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer to show"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(customer) = autocomplete::resolve_customer(db, &customer).await? else {
            ctx.say(format!("❌ Could not find a customer matching '{customer}'."))
                .await?;
            return Ok(());
        };
        let today = window::today();

        let mut text = format!("👤 **{}** (#{})\n", customer.name, customer.id);
        for (label, value) in [
            ("Email", &customer.email),
            ("Phone", &customer.phone),
            ("Tax ID", &customer.tax_id),
            ("Address", &customer.address),
            ("Notes", &customer.notes),
        ] {
            if let Some(value) = value {
                writeln!(text, "**{label}:** {value}")?;
            }
        }
        if let Some(birthdate) = customer.birthdate {
            let window = window::evaluate(birthdate, today);
            match window.label() {
                Some(label) => writeln!(text, "**Birthday:** {birthdate} 🎂 {label}")?,
                None => writeln!(text, "**Birthday:** {birthdate}")?,
            }
        }

        let bikes = bike_ops::list_bikes_for_customer(db, customer.id).await?;
        writeln!(text, "\n🚲 **Bikes ({})**", bikes.len())?;
        for bike in &bikes {
            match &bike.serial_number {
                Some(serial) => writeln!(text, "• #{} {} (serial {serial})", bike.id, bike.model)?,
                None => writeln!(text, "• #{} {}", bike.id, bike.model)?,
            }
        }

        if let Some(next) =
            inspection_ops::find_next_inspection_for_customer(db, customer.id, today).await?
        {
            writeln!(
                text,
                "\n🔧 **Next inspection:** {} (#{}, {})",
                next.next_inspection_date, next.id, next.status
            )?;
        }
        let inspections = inspection_ops::list_inspections_for_customer(db, customer.id).await?;
        writeln!(text, "🔧 **Inspections:** {}", inspections.len())?;

        let sales = sale_ops::list_sales_for_customer(db, customer.id).await?;
        let total: f64 = sales.iter().map(|s| s.price).sum();
        writeln!(
            text,
            "🧾 **Sales:** {} ({})",
            sales.len(),
            crate::core::report::format_currency(total)
        )?;

        ctx.say(text).await?;
        Ok(())
    }

    /// Lists customers alphabetically, flagging upcoming birthdays.
    #[poise::command(slash_command, rename = "list")]
    pub async fn customer_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let customers = customer_ops::list_customers(&ctx.data().database).await?;
        if customers.is_empty() {
            ctx.say("👥 No customers yet. Add one with `/customer add`.")
                .await?;
            return Ok(());
        }

        let birthdays = reminder::upcoming_birthdays(&customers, window::today());

        let mut text = format!("👥 **Customers ({})**\n", customers.len());
        for customer in customers.iter().take(MAX_LIST_LINES) {
            let badge = birthdays
                .iter()
                .find(|(c, _)| c.id == customer.id)
                .and_then(|(_, w)| w.label())
                .map(|label| format!(" 🎂 {label}"))
                .unwrap_or_default();
            let contact = customer
                .email
                .as_deref()
                .or(customer.phone.as_deref())
                .unwrap_or("-");
            writeln!(text, "• #{} **{}** - {contact}{badge}", customer.id, customer.name)?;
        }
        if customers.len() > MAX_LIST_LINES {
            writeln!(text, "…and {} more", customers.len() - MAX_LIST_LINES)?;
        }

        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
