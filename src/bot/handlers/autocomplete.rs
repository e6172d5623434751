//! Autocomplete handlers for Discord slash command parameters.
//!
//! Customer names are not unique, so suggestions carry the ID: `Ana Lopes (#12)`.
//! [`resolve_customer`] accepts that form, a bare ID, or an exact name.

use crate::{
    bot::BotData,
    core::customer,
    entities::customer::Model as Customer,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Formats a customer the way autocomplete suggests it.
#[must_use]
pub fn customer_label(customer: &Customer) -> String {
    format!("{} (#{})", customer.name, customer.id)
}

/// Extracts a customer ID from `Name (#12)`, `#12` or `12`.
#[must_use]
pub fn parse_customer_id(input: &str) -> Option<i64> {
    let input = input.trim();
    let tail = input
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once("(#"))
        .map_or(input, |(_, id)| id);
    tail.trim().trim_start_matches('#').parse().ok()
}

/// Finds the customer a command parameter refers to.
///
/// Returns `Ok(None)` when nothing matches or a bare name is ambiguous.
pub async fn resolve_customer(db: &DatabaseConnection, input: &str) -> Result<Option<Customer>> {
    if let Some(id) = parse_customer_id(input) {
        return customer::get_customer_by_id(db, id).await;
    }

    let name = input.trim();
    let mut matches: Vec<Customer> = customer::search_customers(db, name)
        .await?
        .into_iter()
        .filter(|c| c.name.eq_ignore_ascii_case(name))
        .collect();
    Ok(if matches.len() == 1 { matches.pop() } else { None })
}

/// Provides autocomplete suggestions for customers.
///
/// Up to 25 customers whose name contains the partial input, alphabetically.
pub async fn autocomplete_customer(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(customers) = customer::search_customers(db, partial.trim()).await else {
        return Vec::new();
    };

    customers.iter().map(customer_label).collect()
}
