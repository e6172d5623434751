//! Outreach - mailing customers about birthdays and upcoming inspections.
//!
//! Each batch mails every reminder that has an email address and records a
//! notification for each mail sent. A failed send is logged and counted; it
//! never stops the rest of the batch.

use crate::{
    config::shop::ShopDetails,
    core::{
        notification::{NewNotification, create_notification},
        reminder,
    },
    entities::{Bike, Customer, Inspection, NotificationKind, customer, inspection, notification},
    errors::Result,
    mail::{self, BirthdayTemplate, InspectionTemplate, MailRequest, MailTemplate, Mailer},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;
use tracing::{info, warn};

/// What a mail batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutreachSummary {
    /// Mails accepted by the endpoint
    pub sent: usize,
    /// Reminders skipped because the customer has no email address
    pub skipped: usize,
    /// Mails the endpoint or network rejected
    pub failed: usize,
}

impl OutreachSummary {
    /// Total number of reminders considered.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.sent + self.skipped + self.failed
    }
}

/// A mail to send and the notification to record once it is sent.
struct Outgoing {
    request: MailRequest,
    notification: NewNotification,
}

async fn deliver<M: Mailer>(
    db: &DatabaseConnection,
    mailer: &M,
    batch: Vec<Outgoing>,
    mut summary: OutreachSummary,
) -> Result<OutreachSummary> {
    for outgoing in batch {
        match mailer.send(&outgoing.request).await {
            Ok(()) => {
                create_notification(db, outgoing.notification).await?;
                summary.sent += 1;
            }
            Err(e) => {
                warn!(to = outgoing.request.recipient(), error = %e, "Failed to send mail");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn email_of(customer: &customer::Model) -> Option<&str> {
    customer.email.as_deref().filter(|e| !e.trim().is_empty())
}

/// Sends a birthday greeting to every customer whose birthday is `today`.
pub async fn send_birthday_greetings<M: Mailer>(
    db: &DatabaseConnection,
    mailer: &M,
    shop: &ShopDetails,
    today: NaiveDate,
) -> Result<OutreachSummary> {
    let customers = Customer::find().all(db).await?;
    let mut summary = OutreachSummary::default();
    let mut batch = Vec::new();

    for customer in reminder::find_birthdays_today(&customers, today) {
        let Some(to) = email_of(customer) else {
            summary.skipped += 1;
            continue;
        };
        batch.push(Outgoing {
            request: MailRequest::Templated {
                to: to.to_string(),
                template: MailTemplate::Birthday(BirthdayTemplate {
                    customer_name: customer.name.clone(),
                    birthday_date: today.format("%d/%m/%Y").to_string(),
                    coupon_code: shop.birthday_coupon.clone(),
                }),
            },
            notification: NewNotification {
                title: "Birthday greeting sent".to_string(),
                message: format!("Sent a birthday greeting to {} ({to}).", customer.name),
                kind: NotificationKind::Birthday,
                customer_id: Some(customer.id),
            },
        });
    }

    let summary = deliver(db, mailer, batch, summary).await?;
    info!(
        sent = summary.sent,
        skipped = summary.skipped,
        failed = summary.failed,
        "Birthday greetings done"
    );
    Ok(summary)
}

/// Sends a reminder for every open inspection due within `horizon_days`.
pub async fn send_inspection_reminders<M: Mailer>(
    db: &DatabaseConnection,
    mailer: &M,
    shop: &ShopDetails,
    today: NaiveDate,
    horizon_days: u32,
) -> Result<OutreachSummary> {
    let inspections = Inspection::find()
        .order_by_asc(inspection::Column::NextInspectionDate)
        .all(db)
        .await?;
    let customers: HashMap<i64, customer::Model> = Customer::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let bikes: HashMap<i64, String> = Bike::find()
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.model))
        .collect();

    let mut summary = OutreachSummary::default();
    let mut batch = Vec::new();

    for inspection in reminder::find_upcoming_inspections(&inspections, horizon_days, today) {
        let Some((customer, to)) = customers
            .get(&inspection.customer_id)
            .and_then(|c| email_of(c).map(|to| (c, to)))
        else {
            summary.skipped += 1;
            continue;
        };
        let bike_model = bikes
            .get(&inspection.bike_id)
            .cloned()
            .unwrap_or_default();
        let due = inspection.next_inspection_date.format("%d/%m/%Y").to_string();

        batch.push(Outgoing {
            request: MailRequest::Templated {
                to: to.to_string(),
                template: MailTemplate::Inspection(InspectionTemplate {
                    customer_name: customer.name.clone(),
                    bike_model: bike_model.clone(),
                    inspection_date: due.clone(),
                    inspection_time: shop.inspection_time.clone(),
                    shop_address: shop.address.clone(),
                    contact_phone: shop.phone.clone(),
                }),
            },
            notification: NewNotification {
                title: "Inspection reminder sent".to_string(),
                message: format!(
                    "Reminded {} that the {bike_model} is due for inspection on {due}.",
                    customer.name
                ),
                kind: NotificationKind::Inspection,
                customer_id: Some(customer.id),
            },
        });
    }

    let summary = deliver(db, mailer, batch, summary).await?;
    info!(
        sent = summary.sent,
        skipped = summary.skipped,
        failed = summary.failed,
        "Inspection reminders done"
    );
    Ok(summary)
}

/// Sends the static test message and records an `email` notification.
///
/// # Errors
/// Returns [`crate::errors::Error::Mail`] if the send fails; nothing is recorded then.
pub async fn send_test_email<M: Mailer>(
    db: &DatabaseConnection,
    mailer: &M,
    to: &str,
    shop_name: &str,
) -> Result<notification::Model> {
    let to = to.trim();
    if !to.contains('@') {
        return Err(crate::errors::Error::validation(
            "email",
            format!("'{to}' is not an email address"),
        ));
    }

    mailer.send(&mail::test_email(to, shop_name)).await?;
    create_notification(
        db,
        NewNotification {
            title: "Test email sent".to_string(),
            message: format!("A test email was sent to {to}."),
            kind: NotificationKind::Email,
            customer_id: None,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{customer::{NewCustomer, create_customer}, notification::list_notifications},
        errors::Error,
        test_utils::*,
    };

    async fn customer_with_email(
        db: &DatabaseConnection,
        name: &str,
        email: Option<&str>,
        birthdate: Option<NaiveDate>,
    ) -> Result<customer::Model> {
        create_customer(
            db,
            NewCustomer {
                email: email.map(str::to_string),
                birthdate,
                ..NewCustomer::named(name)
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_birthday_greetings() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let today = date(2024, 5, 10);
        customer_with_email(&db, "Ana", Some("ana@example.com"), Some(date(1990, 5, 10))).await?;
        customer_with_email(&db, "Bia", None, Some(date(1991, 5, 10))).await?;
        customer_with_email(&db, "Caio", Some("caio@example.com"), Some(date(1991, 5, 11))).await?;

        let mailer = RecordingMailer::default();
        let summary = send_birthday_greetings(&db, &mailer, &test_shop(), today).await?;
        assert_eq!(summary, OutreachSummary { sent: 1, skipped: 1, failed: 0 });

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient(), "ana@example.com");
        assert!(matches!(
            &sent[0],
            MailRequest::Templated {
                template: MailTemplate::Birthday(BirthdayTemplate { coupon_code: Some(code), .. }),
                ..
            } if code == "BDAY10"
        ));

        let feed = list_notifications(&db, 10).await?;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::Birthday);
        Ok(())
    }

    #[tokio::test]
    async fn test_inspection_reminders_survive_failures() -> Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 6, 10);
        let rui = customer_with_email(&db, "Rui", Some("rui@example.com"), None).await?;
        let bike = create_test_bike(&db, rui.id, "Trek Marlin").await?;
        create_test_inspection(&db, rui.id, bike.id, date(2023, 6, 12), date(2024, 6, 12)).await?;
        create_test_inspection(&db, rui.id, bike.id, date(2023, 6, 14), date(2024, 6, 14)).await?;

        let mailer = RecordingMailer::failing();
        let summary = send_inspection_reminders(&db, &mailer, &test_shop(), today, 5).await?;
        assert_eq!(summary, OutreachSummary { sent: 0, skipped: 0, failed: 2 });
        assert!(list_notifications(&db, 10).await?.is_empty());

        let mailer = RecordingMailer::default();
        let summary = send_inspection_reminders(&db, &mailer, &test_shop(), today, 5).await?;
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.total(), 2);
        let sent = mailer.sent();
        let MailRequest::Templated {
            template: MailTemplate::Inspection(data),
            ..
        } = &sent[0]
        else {
            panic!("expected an inspection template");
        };
        assert_eq!(data.bike_model, "Trek Marlin");
        assert_eq!(data.inspection_date, "12/06/2024");
        assert_eq!(data.shop_address, test_shop().address);

        let feed = list_notifications(&db, 10).await?;
        assert!(feed.iter().all(|n| n.kind == NotificationKind::Inspection));
        Ok(())
    }

    #[tokio::test]
    async fn test_send_test_email() -> Result<()> {
        let db = setup_test_db().await?;

        let mailer = RecordingMailer::default();
        let notification = send_test_email(&db, &mailer, "staff@example.com", "Bike Shop").await?;
        assert_eq!(notification.kind, NotificationKind::Email);
        assert_eq!(mailer.sent().len(), 1);

        let failing = RecordingMailer::failing();
        let result = send_test_email(&db, &failing, "staff@example.com", "Bike Shop").await;
        assert!(matches!(result, Err(Error::Mail(_))));

        let result = send_test_email(&db, &mailer, "nope", "Bike Shop").await;
        assert!(matches!(result, Err(Error::Validation { field: "email", .. })));

        assert_eq!(list_notifications(&db, 10).await?.len(), 1);
        Ok(())
    }
}
