//! Customer business logic - registering, editing and looking up customers.
//!
//! Customers are never deleted. Input is normalized on the way in: names and
//! optional fields are trimmed and blank optional fields are stored as NULL.

use crate::{
    core::{clean, window},
    entities::{Customer, customer},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, info};

/// Maximum number of matches returned by [`search_customers`] (Discord autocomplete limit).
pub const SEARCH_LIMIT: u64 = 25;

/// Input for registering a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    /// Full name (required)
    pub name: String,
    /// Tax identification number
    pub tax_id: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Birthdate
    pub birthdate: Option<NaiveDate>,
    /// Postal address
    pub address: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

impl NewCustomer {
    /// A customer with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Field edits for an existing customer. `None` leaves a field untouched; for the
/// optional text fields an empty string clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl CustomerChanges {
    /// Whether no field is being changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("name", "Customer name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: Option<String>) -> Result<Option<String>> {
    let email = clean(email);
    if let Some(ref address) = email {
        if !address.contains('@') {
            return Err(Error::validation(
                "email",
                format!("'{address}' is not an email address"),
            ));
        }
    }
    Ok(email)
}

/// Parses a birthdate typed by staff (`YYYY-MM-DD`).
///
/// # Errors
/// Returns a validation error for anything that is not a real calendar date,
/// e.g. `1990-02-29`.
pub fn parse_birthdate(raw: &str) -> Result<NaiveDate> {
    window::parse_date(raw).ok_or_else(|| {
        Error::validation(
            "birthdate",
            format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw.trim()),
        )
    })
}

/// Registers a new customer after validating the name and email.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The email does not look like an address
/// - The database insert fails
pub async fn create_customer<C>(conn: &C, input: NewCustomer) -> Result<customer::Model>
where
    C: ConnectionTrait,
{
    let name = validate_name(&input.name)?;
    let email = validate_email(input.email)?;

    let customer = customer::ActiveModel {
        name: Set(name),
        tax_id: Set(clean(input.tax_id)),
        email: Set(email),
        phone: Set(clean(input.phone)),
        birthdate: Set(input.birthdate),
        address: Set(clean(input.address)),
        notes: Set(clean(input.notes)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = customer.insert(conn).await?;
    info!(customer_id = created.id, "Registered customer '{}'", created.name);
    Ok(created)
}

/// Applies field edits to an existing customer.
///
/// # Errors
/// Returns an error if the customer does not exist, an edited name is empty, an
/// edited email is malformed, or the update fails.
pub async fn update_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    changes: CustomerChanges,
) -> Result<customer::Model> {
    let existing = get_customer_by_id(db, customer_id)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    if changes.is_empty() {
        return Ok(existing);
    }

    let mut active: customer::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(email) = changes.email {
        active.email = Set(validate_email(Some(email))?);
    }
    if let Some(tax_id) = changes.tax_id {
        active.tax_id = Set(clean(Some(tax_id)));
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(clean(Some(phone)));
    }
    if let Some(birthdate) = changes.birthdate {
        active.birthdate = Set(birthdate);
    }
    if let Some(address) = changes.address {
        active.address = Set(clean(Some(address)));
    }
    if let Some(notes) = changes.notes {
        active.notes = Set(clean(Some(notes)));
    }

    let updated = active.update(db).await?;
    info!(customer_id, "Updated customer '{}'", updated.name);
    Ok(updated)
}

/// Retrieves a customer by ID, returning `None` if it does not exist.
pub async fn get_customer_by_id<C>(conn: &C, customer_id: i64) -> Result<Option<customer::Model>>
where
    C: ConnectionTrait,
{
    Customer::find_by_id(customer_id)
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Retrieves all customers ordered alphabetically by name.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds customers whose name contains `partial`, ordered by name.
pub async fn search_customers(
    db: &DatabaseConnection,
    partial: &str,
) -> Result<Vec<customer::Model>> {
    let partial = partial.trim();
    let matches = Customer::find()
        .filter(customer::Column::Name.contains(partial))
        .order_by_asc(customer::Column::Name)
        .limit(SEARCH_LIMIT)
        .all(db)
        .await?;
    debug!("Customer search '{partial}' matched {}", matches.len());
    Ok(matches)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_customer_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_customer(&db, NewCustomer::named("")).await;
        assert!(matches!(result, Err(Error::Validation { field: "name", .. })));

        let result = create_customer(&db, NewCustomer::named("   ")).await;
        assert!(matches!(result, Err(Error::Validation { field: "name", .. })));

        let bad_email = NewCustomer {
            email: Some("joao.example.com".to_string()),
            ..NewCustomer::named("João Silva")
        };
        let result = create_customer(&db, bad_email).await;
        assert!(matches!(result, Err(Error::Validation { field: "email", .. })));

        // Nothing was written
        assert!(list_customers(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_customer_normalizes_input() -> Result<()> {
        let db = setup_test_db().await?;

        let customer = create_customer(
            &db,
            NewCustomer {
                name: "  Maria Costa ".to_string(),
                tax_id: Some("   ".to_string()),
                email: Some(" maria@example.com ".to_string()),
                phone: Some("912 345 678".to_string()),
                birthdate: Some(date(1988, 4, 2)),
                address: None,
                notes: Some(String::new()),
            },
        )
        .await?;

        assert_eq!(customer.name, "Maria Costa");
        assert_eq!(customer.tax_id, None);
        assert_eq!(customer.email.as_deref(), Some("maria@example.com"));
        assert_eq!(customer.phone.as_deref(), Some("912 345 678"));
        assert_eq!(customer.birthdate, Some(date(1988, 4, 2)));
        assert_eq!(customer.notes, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Rui Alves").await?;

        let updated = update_customer(
            &db,
            customer.id,
            CustomerChanges {
                phone: Some("934 000 111".to_string()),
                birthdate: Some(Some(date(1975, 12, 24))),
                notes: Some("Prefers morning slots".to_string()),
                ..CustomerChanges::default()
            },
        )
        .await?;
        assert_eq!(updated.name, "Rui Alves");
        assert_eq!(updated.phone.as_deref(), Some("934 000 111"));
        assert_eq!(updated.birthdate, Some(date(1975, 12, 24)));

        // Empty string clears an optional field
        let cleared = update_customer(
            &db,
            customer.id,
            CustomerChanges {
                notes: Some(String::new()),
                birthdate: Some(None),
                ..CustomerChanges::default()
            },
        )
        .await?;
        assert_eq!(cleared.notes, None);
        assert_eq!(cleared.birthdate, None);
        assert_eq!(cleared.phone.as_deref(), Some("934 000 111"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_customer_rejects_blank_name() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Rui Alves").await?;

        let result = update_customer(
            &db,
            customer.id,
            CustomerChanges {
                name: Some("  ".to_string()),
                ..CustomerChanges::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { field: "name", .. })));

        let unchanged = get_customer_by_id(&db, customer.id).await?.unwrap();
        assert_eq!(unchanged.name, "Rui Alves");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_customer(&db, 999, CustomerChanges::default()).await;
        assert!(matches!(result, Err(Error::CustomerNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_search_customers() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_customer(&db, "Zé Pedro").await?;
        create_test_customer(&db, "Ana Lopes").await?;
        create_test_customer(&db, "Bruno Lopes").await?;

        let all = list_customers(&db).await?;
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Ana Lopes", "Bruno Lopes", "Zé Pedro"]);

        let lopes = search_customers(&db, "lopes").await?;
        assert_eq!(lopes.len(), 2);
        assert_eq!(lopes[0].name, "Ana Lopes");

        assert!(search_customers(&db, "nobody").await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_birthdate() {
        assert_eq!(parse_birthdate("1992-02-29").unwrap(), date(1992, 2, 29));
        assert_eq!(parse_birthdate(" 1980-07-01 ").unwrap(), date(1980, 7, 1));
        assert!(matches!(
            parse_birthdate("1990-02-29"),
            Err(Error::Validation { field: "birthdate", .. })
        ));
        assert!(parse_birthdate("01/07/1980").is_err());
    }

    #[tokio::test]
    async fn test_leap_day_birthdate_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer_with_birthdate(&db, "Leo", date(1992, 2, 29)).await?;

        let stored = get_customer_by_id(&db, customer.id).await?.unwrap();
        let window = window::evaluate(stored.birthdate.unwrap(), date(2023, 2, 28));
        assert!(window.is_today);
        Ok(())
    }
}
