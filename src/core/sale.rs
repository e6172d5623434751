//! Sale business logic - recording sales and linking them to follow-up inspections.
//!
//! [`record_sale`] runs five steps in order:
//! 1. resolve the customer (inline-create a new one if asked to)
//! 2. find or create the sold bike, when a bike model is given
//! 3. insert the sale
//! 4. schedule the bike's first inspection one year after the sale
//! 5. post a "new sale" system notification
//!
//! A failing step stops the sequence and is reported as [`Error::SaleStep`].
//! Earlier steps are not undone unless the caller passes a transaction.

use crate::{
    core::{
        bike as bike_ops, clean, customer as customer_ops,
        customer::NewCustomer,
        inspection::{self as inspection_ops, BikeChoice, NewInspection},
        notification::{NewNotification, create_notification},
    },
    entities::{NotificationKind, Sale, bike, inspection, notification, sale},
    errors::{Error, Result, SaleStep},
};
use chrono::{Months, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Months between a bike sale and its first inspection.
pub const FOLLOW_UP_INTERVAL_MONTHS: u32 = 12;

/// The buyer of a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    /// An already registered customer
    Existing(i64),
    /// A customer to register as part of the sale
    New(NewCustomer),
}

/// Input for recording a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleInput {
    /// Buyer, if known
    pub customer: Option<CustomerRef>,
    /// What was sold
    pub product_name: String,
    /// Model of the sold bike; triggers bike linking and a follow-up inspection
    pub bike_model: Option<String>,
    /// Serial number of the sold bike
    pub bike_serial_number: Option<String>,
    /// Price, must be positive
    pub price: f64,
    /// Day of the sale
    pub date: NaiveDate,
    /// Free-text notes
    pub notes: Option<String>,
    /// Invoice attachment reference
    pub invoice_file: Option<String>,
}

/// Everything [`record_sale`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOutcome {
    pub sale: sale::Model,
    pub customer_id: Option<i64>,
    pub bike: Option<bike::Model>,
    pub inspection: Option<inspection::Model>,
    pub notification: notification::Model,
}

/// Due date of the first inspection for a bike sold on `sale_date`.
///
/// A Feb-29 sale is due on Feb-28 of the following year.
#[must_use]
pub fn next_inspection_after(sale_date: NaiveDate) -> Option<NaiveDate> {
    sale_date.checked_add_months(Months::new(FOLLOW_UP_INTERVAL_MONTHS))
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(())
}

fn validate_product_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("product name", "Product name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Records a sale and, for bike sales, registers the bike and books its first
/// inspection.
///
/// Pass a transaction as `conn` to make the whole sequence atomic.
///
/// # Errors
/// Validation errors ([`Error::InvalidAmount`], [`Error::Validation`],
/// [`Error::CustomerNotFound`]) are returned before anything is written. Any
/// failure after that is wrapped in [`Error::SaleStep`] naming the failed step.
#[instrument(skip(conn, input), fields(product = %input.product_name))]
pub async fn record_sale<C>(conn: &C, input: SaleInput) -> Result<SaleOutcome>
where
    C: ConnectionTrait,
{
    validate_price(input.price)?;
    let product_name = validate_product_name(&input.product_name)?;
    let bike_model = input
        .bike_model
        .as_deref()
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_string);
    let bike_serial_number = clean(input.bike_serial_number);
    let next_inspection_date = next_inspection_after(input.date).ok_or_else(|| {
        Error::validation("date", format!("{} is out of range", input.date))
    })?;

    match &input.customer {
        Some(CustomerRef::New(new_customer)) if new_customer.name.trim().is_empty() => {
            return Err(Error::validation("name", "Customer name cannot be empty"));
        }
        Some(CustomerRef::Existing(customer_id)) => {
            if customer_ops::get_customer_by_id(conn, *customer_id)
                .await?
                .is_none()
            {
                return Err(Error::CustomerNotFound { id: *customer_id });
            }
        }
        _ => {}
    }

    // Step 1
    let customer_id = match input.customer {
        Some(CustomerRef::Existing(customer_id)) => Some(customer_id),
        Some(CustomerRef::New(new_customer)) => Some(
            customer_ops::create_customer(conn, new_customer)
                .await
                .map_err(|e| e.at_step(SaleStep::CreateCustomer))?
                .id,
        ),
        None => None,
    };

    // Step 2: a bike can only be registered to a known customer
    let bike = match (customer_id, bike_model.as_deref()) {
        (Some(customer_id), Some(model)) => Some(
            bike_ops::find_or_create_bike(conn, customer_id, model, bike_serial_number.clone())
                .await
                .map_err(|e| e.at_step(SaleStep::ResolveBike))?
                .0,
        ),
        _ => None,
    };

    // Step 3
    let sale = sale::ActiveModel {
        customer_id: Set(customer_id),
        bike_id: Set(bike.as_ref().map(|b| b.id)),
        product_name: Set(product_name),
        bike_model: Set(bike_model),
        bike_serial_number: Set(bike_serial_number),
        price: Set(input.price),
        date: Set(input.date),
        notes: Set(clean(input.notes)),
        invoice_file: Set(clean(input.invoice_file)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| Error::from(e).at_step(SaleStep::InsertSale))?;

    // Step 4
    let inspection = match &bike {
        Some(bike) => {
            let follow_up = NewInspection {
                notes: Some(format!(
                    "First inspection of the {} sold on {}, scheduled automatically one year after the sale.",
                    bike.model, sale.date
                )),
                ..NewInspection::scheduled(
                    bike.customer_id,
                    BikeChoice::Existing(bike.id),
                    sale.date,
                    next_inspection_date,
                )
            };
            Some(
                inspection_ops::schedule_inspection(conn, follow_up)
                    .await
                    .map_err(|e| e.at_step(SaleStep::ScheduleInspection))?,
            )
        }
        None => None,
    };

    // Step 5
    let message = match &inspection {
        Some(inspection) => format!(
            "Sold {} for {:.2}. First inspection due {}.",
            sale.product_name, sale.price, inspection.next_inspection_date
        ),
        None => format!("Sold {} for {:.2}.", sale.product_name, sale.price),
    };
    let notification = create_notification(
        conn,
        NewNotification {
            title: "New sale".to_string(),
            message,
            kind: NotificationKind::System,
            customer_id,
        },
    )
    .await
    .map_err(|e| e.at_step(SaleStep::Notify))?;

    info!(
        sale_id = sale.id,
        bike_id = ?bike.as_ref().map(|b| b.id),
        inspection_id = ?inspection.as_ref().map(|i| i.id),
        "Recorded sale"
    );

    Ok(SaleOutcome {
        sale,
        customer_id,
        bike,
        inspection,
        notification,
    })
}

/// Retrieves a sale by ID.
///
/// # Errors
/// Returns [`Error::SaleNotFound`] if no sale has this ID.
pub async fn get_sale(db: &DatabaseConnection, sale_id: i64) -> Result<sale::Model> {
    Sale::find_by_id(sale_id)
        .one(db)
        .await?
        .ok_or(Error::SaleNotFound { id: sale_id })
}

/// Retrieves all sales, most recent first.
pub async fn list_sales(db: &DatabaseConnection) -> Result<Vec<sale::Model>> {
    Sale::find()
        .order_by_desc(sale::Column::Date)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a customer's sales, most recent first.
pub async fn list_sales_for_customer(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::CustomerId.eq(customer_id))
        .order_by_desc(sale::Column::Date)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
