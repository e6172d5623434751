//! Inspection business logic - scheduling, editing and completing inspections.

use crate::{
    core::{bike as bike_ops, clean, customer as customer_ops},
    entities::{Inspection, InspectionStatus, inspection},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Which bike an inspection is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BikeChoice {
    /// A bike already registered to the customer
    Existing(i64),
    /// A bike to register together with the inspection
    New {
        /// Bike model
        model: String,
        /// Optional serial number
        serial_number: Option<String>,
    },
}

/// Input for scheduling an inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInspection {
    pub customer_id: i64,
    pub bike: BikeChoice,
    pub date: NaiveDate,
    pub next_inspection_date: NaiveDate,
    pub status: InspectionStatus,
    pub notes: Option<String>,
    pub inspection_fee: Option<f64>,
    pub labor_fee: Option<f64>,
    pub invoice_file: Option<String>,
}

impl NewInspection {
    /// A scheduled inspection with no notes, fees or invoice.
    pub fn scheduled(
        customer_id: i64,
        bike: BikeChoice,
        date: NaiveDate,
        next_inspection_date: NaiveDate,
    ) -> Self {
        Self {
            customer_id,
            bike,
            date,
            next_inspection_date,
            status: InspectionStatus::Scheduled,
            notes: None,
            inspection_fee: None,
            labor_fee: None,
            invoice_file: None,
        }
    }
}

/// Edits to an existing inspection. `None` leaves a field untouched.
///
/// For the fee fields `Some(None)` clears the fee; for `notes` and
/// `invoice_file` an empty string clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectionChanges {
    pub status: Option<InspectionStatus>,
    pub date: Option<NaiveDate>,
    pub next_inspection_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub inspection_fee: Option<Option<f64>>,
    pub labor_fee: Option<Option<f64>>,
    pub invoice_file: Option<String>,
}

fn validate_dates(date: NaiveDate, next_inspection_date: NaiveDate) -> Result<()> {
    if next_inspection_date < date {
        return Err(Error::validation(
            "next inspection date",
            format!("{next_inspection_date} is before the inspection date {date}"),
        ));
    }
    Ok(())
}

fn validate_fee(field: &'static str, fee: Option<f64>) -> Result<()> {
    match fee {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(Error::validation(
            field,
            format!("{amount} is not a valid fee (must be zero or more)"),
        )),
        _ => Ok(()),
    }
}

/// Schedules an inspection for a customer's bike.
///
/// With [`BikeChoice::New`] a bike is always registered, even when the customer
/// already owns one with the same model.
///
/// # Errors
/// Returns an error if:
/// - The next inspection date is before the inspection date
/// - A fee is negative or not finite
/// - The customer does not exist
/// - An existing bike does not exist or belongs to another customer
/// - A new bike has a blank model
/// - A database operation fails
pub async fn schedule_inspection<C>(conn: &C, input: NewInspection) -> Result<inspection::Model>
where
    C: ConnectionTrait,
{
    validate_dates(input.date, input.next_inspection_date)?;
    validate_fee("inspection fee", input.inspection_fee)?;
    validate_fee("labor fee", input.labor_fee)?;

    if customer_ops::get_customer_by_id(conn, input.customer_id)
        .await?
        .is_none()
    {
        return Err(Error::CustomerNotFound {
            id: input.customer_id,
        });
    }

    let bike_id = match input.bike {
        BikeChoice::Existing(bike_id) => {
            let bike = bike_ops::get_bike_by_id(conn, bike_id)
                .await?
                .ok_or(Error::BikeNotFound { id: bike_id })?;
            if bike.customer_id != input.customer_id {
                return Err(Error::validation(
                    "bike",
                    format!("Bike {bike_id} does not belong to customer {}", input.customer_id),
                ));
            }
            bike.id
        }
        BikeChoice::New {
            model,
            serial_number,
        } => {
            bike_ops::create_bike(conn, input.customer_id, &model, serial_number)
                .await?
                .id
        }
    };

    let inspection = inspection::ActiveModel {
        customer_id: Set(input.customer_id),
        bike_id: Set(bike_id),
        date: Set(input.date),
        next_inspection_date: Set(input.next_inspection_date),
        status: Set(input.status),
        notes: Set(clean(input.notes)),
        inspection_fee: Set(input.inspection_fee),
        labor_fee: Set(input.labor_fee),
        invoice_file: Set(clean(input.invoice_file)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = inspection.insert(conn).await?;
    info!(
        inspection_id = created.id,
        customer_id = created.customer_id,
        bike_id = created.bike_id,
        "Scheduled inspection for {} (next due {})",
        created.date,
        created.next_inspection_date
    );
    Ok(created)
}

/// Applies edits to an inspection. Any status may be set here.
///
/// # Errors
/// Returns an error if the inspection does not exist, the resulting dates are
/// out of order, a fee is invalid, or the update fails.
pub async fn update_inspection(
    db: &DatabaseConnection,
    inspection_id: i64,
    changes: InspectionChanges,
) -> Result<inspection::Model> {
    let existing = get_inspection_by_id(db, inspection_id)
        .await?
        .ok_or(Error::InspectionNotFound { id: inspection_id })?;

    if changes == InspectionChanges::default() {
        return Ok(existing);
    }

    let date = changes.date.unwrap_or(existing.date);
    let next_inspection_date = changes
        .next_inspection_date
        .unwrap_or(existing.next_inspection_date);
    validate_dates(date, next_inspection_date)?;
    if let Some(fee) = changes.inspection_fee {
        validate_fee("inspection fee", fee)?;
    }
    if let Some(fee) = changes.labor_fee {
        validate_fee("labor fee", fee)?;
    }

    let mut active: inspection::ActiveModel = existing.into();
    active.date = Set(date);
    active.next_inspection_date = Set(next_inspection_date);
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(notes) = changes.notes {
        active.notes = Set(clean(Some(notes)));
    }
    if let Some(fee) = changes.inspection_fee {
        active.inspection_fee = Set(fee);
    }
    if let Some(fee) = changes.labor_fee {
        active.labor_fee = Set(fee);
    }
    if let Some(invoice_file) = changes.invoice_file {
        active.invoice_file = Set(clean(Some(invoice_file)));
    }

    let updated = active.update(db).await?;
    info!(inspection_id, status = %updated.status, "Updated inspection");
    Ok(updated)
}

/// Marks an inspection completed.
///
/// # Errors
/// Returns [`Error::InvalidStatusTransition`] unless the inspection is
/// `scheduled` or `pending`.
pub async fn mark_completed(db: &DatabaseConnection, inspection_id: i64) -> Result<inspection::Model> {
    let existing = get_inspection_by_id(db, inspection_id)
        .await?
        .ok_or(Error::InspectionNotFound { id: inspection_id })?;

    if !existing.status.can_complete() {
        return Err(Error::InvalidStatusTransition {
            from: existing.status,
            to: InspectionStatus::Completed,
        });
    }

    let mut active: inspection::ActiveModel = existing.into();
    active.status = Set(InspectionStatus::Completed);
    let updated = active.update(db).await?;
    info!(inspection_id, "Inspection marked completed");
    Ok(updated)
}

/// Finds the customer's earliest open inspection due on or after `today`.
///
/// Used to warn staff before scheduling a second inspection.
pub async fn find_next_inspection_for_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    today: NaiveDate,
) -> Result<Option<inspection::Model>> {
    let next = Inspection::find()
        .filter(inspection::Column::CustomerId.eq(customer_id))
        .filter(
            inspection::Column::Status
                .is_in([InspectionStatus::Scheduled, InspectionStatus::Pending]),
        )
        .filter(inspection::Column::NextInspectionDate.gte(today))
        .order_by_asc(inspection::Column::NextInspectionDate)
        .order_by_asc(inspection::Column::Id)
        .one(db)
        .await?;
    debug!(customer_id, found = next.is_some(), "Looked up next inspection");
    Ok(next)
}

/// Retrieves an inspection by ID.
pub async fn get_inspection_by_id(
    db: &DatabaseConnection,
    inspection_id: i64,
) -> Result<Option<inspection::Model>> {
    Inspection::find_by_id(inspection_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all inspections, newest inspection date first.
pub async fn list_inspections(db: &DatabaseConnection) -> Result<Vec<inspection::Model>> {
    Inspection::find()
        .order_by_desc(inspection::Column::Date)
        .order_by_desc(inspection::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a customer's inspections, newest inspection date first.
pub async fn list_inspections_for_customer(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Vec<inspection::Model>> {
    Inspection::find()
        .filter(inspection::Column::CustomerId.eq(customer_id))
        .order_by_desc(inspection::Column::Date)
        .order_by_desc(inspection::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_schedule_with_new_bike() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;

        let inspection = schedule_inspection(
            &db,
            NewInspection {
                notes: Some("  Brakes squeak ".to_string()),
                inspection_fee: Some(25.0),
                ..NewInspection::scheduled(
                    customer.id,
                    BikeChoice::New {
                        model: "Specialized Rockhopper".to_string(),
                        serial_number: Some("SR-778".to_string()),
                    },
                    date(2024, 5, 10),
                    date(2025, 5, 10),
                )
            },
        )
        .await?;

        assert_eq!(inspection.status, InspectionStatus::Scheduled);
        assert_eq!(inspection.notes.as_deref(), Some("Brakes squeak"));
        let bike = bike_ops::get_bike_by_id(&db, inspection.bike_id)
            .await?
            .unwrap();
        assert_eq!(bike.customer_id, customer.id);
        assert_eq!(bike.model, "Specialized Rockhopper");
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_rejects_foreign_bike() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let other = create_test_customer(&db, "Other Customer").await?;
        let bike = create_test_bike(&db, other.id, "Giant Talon").await?;

        let result = schedule_inspection(
            &db,
            NewInspection::scheduled(
                customer.id,
                BikeChoice::Existing(bike.id),
                date(2024, 5, 10),
                date(2025, 5, 10),
            ),
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { field: "bike", .. })));

        let result = schedule_inspection(
            &db,
            NewInspection::scheduled(
                customer.id,
                BikeChoice::Existing(999),
                date(2024, 5, 10),
                date(2025, 5, 10),
            ),
        )
        .await;
        assert!(matches!(result, Err(Error::BikeNotFound { id: 999 })));
        assert!(list_inspections(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_validation_happens_before_writes() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let new_bike = || BikeChoice::New {
            model: "Canyon Grail".to_string(),
            serial_number: None,
        };

        let result = schedule_inspection(
            &db,
            NewInspection::scheduled(customer.id, new_bike(), date(2024, 5, 10), date(2024, 5, 9)),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "next inspection date",
                ..
            })
        ));

        let result = schedule_inspection(
            &db,
            NewInspection {
                labor_fee: Some(-5.0),
                ..NewInspection::scheduled(
                    customer.id,
                    new_bike(),
                    date(2024, 5, 10),
                    date(2025, 5, 10),
                )
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { field: "labor fee", .. })));

        let result = schedule_inspection(
            &db,
            NewInspection::scheduled(999, new_bike(), date(2024, 5, 10), date(2025, 5, 10)),
        )
        .await;
        assert!(matches!(result, Err(Error::CustomerNotFound { id: 999 })));

        assert!(bike_ops::list_bikes_for_customer(&db, customer.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_completed_transitions() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let bike = create_test_bike(&db, customer.id, "Trek Marlin").await?;
        let inspection =
            create_test_inspection(&db, customer.id, bike.id, date(2024, 6, 1), date(2025, 6, 1))
                .await?;

        let completed = mark_completed(&db, inspection.id).await?;
        assert_eq!(completed.status, InspectionStatus::Completed);

        let result = mark_completed(&db, inspection.id).await;
        assert!(matches!(
            result,
            Err(Error::InvalidStatusTransition {
                from: InspectionStatus::Completed,
                to: InspectionStatus::Completed,
            })
        ));

        let cancelled = update_inspection(
            &db,
            inspection.id,
            InspectionChanges {
                status: Some(InspectionStatus::Cancelled),
                ..InspectionChanges::default()
            },
        )
        .await?;
        assert_eq!(cancelled.status, InspectionStatus::Cancelled);
        assert!(matches!(
            mark_completed(&db, inspection.id).await,
            Err(Error::InvalidStatusTransition { .. })
        ));

        let result = mark_completed(&db, 999).await;
        assert!(matches!(result, Err(Error::InspectionNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_inspection_fees_and_dates() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let bike = create_test_bike(&db, customer.id, "Trek Marlin").await?;
        let inspection =
            create_test_inspection(&db, customer.id, bike.id, date(2024, 6, 1), date(2025, 6, 1))
                .await?;

        let updated = update_inspection(
            &db,
            inspection.id,
            InspectionChanges {
                inspection_fee: Some(Some(30.0)),
                labor_fee: Some(Some(12.5)),
                invoice_file: Some("invoice-0042.pdf".to_string()),
                ..InspectionChanges::default()
            },
        )
        .await?;
        assert!((updated.total_fee() - 42.5).abs() < f64::EPSILON);
        assert_eq!(updated.invoice_file.as_deref(), Some("invoice-0042.pdf"));

        // Moving the inspection past its next date is rejected
        let result = update_inspection(
            &db,
            inspection.id,
            InspectionChanges {
                date: Some(date(2025, 7, 1)),
                ..InspectionChanges::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let cleared = update_inspection(
            &db,
            inspection.id,
            InspectionChanges {
                labor_fee: Some(None),
                ..InspectionChanges::default()
            },
        )
        .await?;
        assert_eq!(cleared.labor_fee, None);
        assert_eq!(cleared.inspection_fee, Some(30.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_next_inspection_for_customer() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let bike = create_test_bike(&db, customer.id, "Trek Marlin").await?;
        let today = date(2024, 6, 15);

        assert!(
            find_next_inspection_for_customer(&db, customer.id, today)
                .await?
                .is_none()
        );

        // Overdue: not "next"
        create_test_inspection(&db, customer.id, bike.id, date(2023, 6, 1), date(2024, 6, 1))
            .await?;
        let later =
            create_test_inspection(&db, customer.id, bike.id, date(2024, 6, 1), date(2025, 6, 1))
                .await?;
        let sooner =
            create_test_inspection(&db, customer.id, bike.id, date(2024, 6, 10), date(2024, 9, 1))
                .await?;
        mark_completed(&db, sooner.id).await?;

        let next = find_next_inspection_for_customer(&db, customer.id, today)
            .await?
            .unwrap();
        assert_eq!(next.id, later.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_inspections_newest_first() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let other = create_test_customer(&db, "Other Customer").await?;
        let bike = create_test_bike(&db, customer.id, "Trek Marlin").await?;
        let other_bike = create_test_bike(&db, other.id, "Cube Aim").await?;

        create_test_inspection(&db, customer.id, bike.id, date(2024, 1, 5), date(2025, 1, 5))
            .await?;
        create_test_inspection(&db, customer.id, bike.id, date(2024, 3, 5), date(2025, 3, 5))
            .await?;
        create_test_inspection(&db, other.id, other_bike.id, date(2024, 2, 5), date(2025, 2, 5))
            .await?;

        let all = list_inspections(&db).await?;
        let dates: Vec<_> = all.iter().map(|i| i.date).collect();
        assert_eq!(dates, [date(2024, 3, 5), date(2024, 2, 5), date(2024, 1, 5)]);

        let mine = list_inspections_for_customer(&db, customer.id).await?;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|i| i.customer_id == customer.id));
        Ok(())
    }
}
