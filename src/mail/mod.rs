//! Transactional mail dispatch.
//!
//! The shop does not render mail itself. It posts a JSON request to a mail
//! endpoint which either forwards a ready-made message ([`MailRequest::Direct`])
//! or renders one of its templates ([`MailRequest::Templated`]).
//!
//! Wire format (camelCase):
//! ```json
//! {"to": "a@b.pt", "subject": "...", "htmlContent": "...", "textContent": "..."}
//! {"to": "a@b.pt", "template": "birthday", "templateData": {"customerName": "..."}}
//! ```

use serde::Serialize;
use std::{future::Future, time::Duration};
use tracing::{debug, warn};

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for mail dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The mail endpoint returned a non-2xx status code.
    #[error("Mail endpoint returned HTTP {0}")]
    HttpStatus(u16),

    /// No mail endpoint is configured.
    #[error("Mail is not configured (set [mail] endpoint in shop.toml and MAIL_API_KEY)")]
    NotConfigured,
}

/// Data for the birthday greeting template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayTemplate {
    pub customer_name: String,
    pub birthday_date: String,
    /// The endpoint falls back to its own coupon when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Data for the inspection reminder template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionTemplate {
    pub customer_name: String,
    pub bike_model: String,
    pub inspection_date: String,
    pub inspection_time: String,
    pub shop_address: String,
    pub contact_phone: String,
}

/// A template rendered by the mail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "template", content = "templateData", rename_all = "lowercase")]
pub enum MailTemplate {
    /// Birthday greeting with a discount coupon
    Birthday(BirthdayTemplate),
    /// Upcoming inspection reminder
    Inspection(InspectionTemplate),
}

/// A request to the mail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MailRequest {
    /// A message whose body is supplied by the caller
    #[serde(rename_all = "camelCase")]
    Direct {
        to: String,
        subject: String,
        html_content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text_content: Option<String>,
    },
    /// A message rendered by the endpoint from a template
    Templated {
        to: String,
        #[serde(flatten)]
        template: MailTemplate,
    },
}

impl MailRequest {
    /// Recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::Direct { to, .. } | Self::Templated { to, .. } => to,
        }
    }
}

/// Builds the static test message used to check the mail setup.
#[must_use]
pub fn test_email(to: &str, shop_name: &str) -> MailRequest {
    MailRequest::Direct {
        to: to.to_string(),
        subject: format!("{shop_name}: test email"),
        html_content: format!(
            "<h1>{shop_name}</h1>\
             <p>This is a test email. If you can read it, mail delivery is working.</p>"
        ),
        text_content: Some(format!(
            "{shop_name}\n\nThis is a test email. If you can read it, mail delivery is working."
        )),
    }
}

/// Something that can deliver a [`MailRequest`].
pub trait Mailer {
    /// Sends one request.
    fn send(&self, request: &MailRequest) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Posts mail requests to the configured HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    /// Creates a mailer for `endpoint`, authenticating with `api_key` if given.
    ///
    /// # Errors
    /// Returns [`MailError::Request`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// The endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, request: &MailRequest) -> Result<(), MailError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "Mail endpoint rejected request"
            );
            return Err(MailError::HttpStatus(status.as_u16()));
        }
        debug!(to = request.recipient(), "Mail accepted by endpoint");
        Ok(())
    }
}
