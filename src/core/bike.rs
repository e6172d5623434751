//! Bike business logic - registering and resolving customers' bicycles.
//!
//! There is no uniqueness constraint on (customer, model, serial) in the store.
//! [`find_or_create_bike`] looks before it inserts, which prevents duplicates for
//! sequential calls; two concurrent calls can still both insert.

use crate::{
    core::clean,
    entities::{Bike, bike},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Normalizes a model name; blank models are rejected.
pub(crate) fn validate_model(model: &str) -> Result<String> {
    let trimmed = model.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("bike model", "Bike model cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Looks up a customer's bike by model and serial number.
///
/// A `None` serial matches only bikes stored without a serial number.
pub async fn find_bike<C>(
    conn: &C,
    customer_id: i64,
    model: &str,
    serial_number: Option<&str>,
) -> Result<Option<bike::Model>>
where
    C: ConnectionTrait,
{
    let query = Bike::find()
        .filter(bike::Column::CustomerId.eq(customer_id))
        .filter(bike::Column::Model.eq(model));

    let query = match serial_number {
        Some(serial) => query.filter(bike::Column::SerialNumber.eq(serial)),
        None => query.filter(bike::Column::SerialNumber.is_null()),
    };

    query
        .order_by_asc(bike::Column::Id)
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Registers a bike for a customer.
///
/// # Errors
/// Returns an error if the model is blank or the insert fails (including a
/// foreign-key failure for an unknown customer).
pub async fn create_bike<C>(
    conn: &C,
    customer_id: i64,
    model: &str,
    serial_number: Option<String>,
) -> Result<bike::Model>
where
    C: ConnectionTrait,
{
    let model = validate_model(model)?;
    let bike = bike::ActiveModel {
        customer_id: Set(customer_id),
        model: Set(model),
        serial_number: Set(clean(serial_number)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = bike.insert(conn).await?;
    info!(
        bike_id = created.id,
        customer_id, "Registered bike '{}'", created.model
    );
    Ok(created)
}

/// Returns the customer's bike matching (model, serial), creating it if absent.
///
/// The returned flag is `true` when a new record was inserted.
pub async fn find_or_create_bike<C>(
    conn: &C,
    customer_id: i64,
    model: &str,
    serial_number: Option<String>,
) -> Result<(bike::Model, bool)>
where
    C: ConnectionTrait,
{
    let model = validate_model(model)?;
    let serial_number = clean(serial_number);

    if let Some(existing) = find_bike(conn, customer_id, &model, serial_number.as_deref()).await? {
        debug!(bike_id = existing.id, "Reusing existing bike '{model}'");
        return Ok((existing, false));
    }

    let created = create_bike(conn, customer_id, &model, serial_number).await?;
    Ok((created, true))
}

/// Retrieves a bike by ID.
pub async fn get_bike_by_id<C>(conn: &C, bike_id: i64) -> Result<Option<bike::Model>>
where
    C: ConnectionTrait,
{
    Bike::find_by_id(bike_id).one(conn).await.map_err(Into::into)
}

/// Retrieves all bikes a customer owns, oldest first.
pub async fn list_bikes_for_customer(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Vec<bike::Model>> {
    Bike::find()
        .filter(bike::Column::CustomerId.eq(customer_id))
        .order_by_asc(bike::Column::CreatedAt)
        .order_by_asc(bike::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
