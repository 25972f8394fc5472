//! Contact-form intake for the public site.
//!
//! Validation happens locally before any network call; the gateway's
//! `contact-notification` function is only invoked with a payload that
//! already passed the same checks the function applies server-side.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::ports::{FunctionError, FunctionInvoker, Notification, Notifier};
use super::user::{Email, UserValidationError};

const CONTACT_FUNCTION: &str = "contact-notification";
const MESSAGE_MAX: usize = 4000;

/// Why a contact request was rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// The name field was blank.
    EmptyName,
    /// The email field failed address validation.
    InvalidEmail(UserValidationError),
    /// The message field was blank.
    EmptyMessage,
    /// The message exceeded the accepted length.
    MessageTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("name must not be blank"),
            Self::InvalidEmail(inner) => write!(f, "email is invalid: {inner}"),
            Self::EmptyMessage => f.write_str("message must not be blank"),
            Self::MessageTooLong { max } => {
                write!(f, "message must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ContactValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEmail(inner) => Some(inner),
            _ => None,
        }
    }
}

/// A validated contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    name: String,
    email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_interest: Option<String>,
    message: String,
}

/// Raw, unvalidated form fields as the form surface collects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender's name.
    pub name: String,
    /// Sender's reply address.
    pub email: String,
    /// Optional phone number, free-form.
    pub phone: String,
    /// Optional company name.
    pub company: String,
    /// Optional service the sender is asking about.
    pub service_interest: String,
    /// The enquiry body.
    pub message: String,
}

impl ContactRequest {
    /// Validate raw form fields into a submittable request.
    ///
    /// Blank optional fields become `None` so they are omitted from the
    /// payload entirely.
    pub fn from_form(form: &ContactForm) -> Result<Self, ContactValidationError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        let email =
            Email::new(form.email.trim()).map_err(ContactValidationError::InvalidEmail)?;
        let message = form.message.trim();
        if message.is_empty() {
            return Err(ContactValidationError::EmptyMessage);
        }
        if message.chars().count() > MESSAGE_MAX {
            return Err(ContactValidationError::MessageTooLong { max: MESSAGE_MAX });
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            phone: optional(&form.phone),
            company: optional(&form.company),
            service_interest: optional(&form.service_interest),
            message: message.to_owned(),
        })
    }

    /// Sender's reply address.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Submits validated contact requests through the function port.
pub struct ContactService {
    invoker: Arc<dyn FunctionInvoker>,
    notifier: Arc<dyn Notifier>,
}

impl ContactService {
    /// Create a service submitting through `invoker` and toasting on
    /// `notifier`.
    pub fn new(invoker: Arc<dyn FunctionInvoker>, notifier: Arc<dyn Notifier>) -> Self {
        Self { invoker, notifier }
    }

    /// Submit a validated request, raising exactly one toast either way.
    pub async fn submit(&self, request: &ContactRequest) -> Result<(), FunctionError> {
        let payload = json!(request);
        match self.invoker.invoke(CONTACT_FUNCTION, &payload).await {
            Ok(_) => {
                debug!("contact request submitted");
                self.notifier.notify(Notification::success(
                    "Message sent",
                    "Thanks for getting in touch. We'll reply within one business day.",
                ));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "contact submission failed");
                self.notifier.notify(Notification::destructive(
                    "Message not sent",
                    "Something went wrong sending your message. Please try again.",
                ));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockFunctionInvoker, RecordingNotifier, ToastVariant};
    use rstest::rstest;
    use serde_json::Value;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            message: "I would like a quote.".to_owned(),
            ..ContactForm::default()
        }
    }

    #[rstest]
    #[case::blank_name("", "ada@example.com", "hello", ContactValidationError::EmptyName)]
    #[case::blank_message("Ada", "ada@example.com", "   ", ContactValidationError::EmptyMessage)]
    fn rejects_incomplete_forms(
        #[case] name: &str,
        #[case] email: &str,
        #[case] message: &str,
        #[case] expected: ContactValidationError,
    ) {
        let form = ContactForm {
            name: name.to_owned(),
            email: email.to_owned(),
            message: message.to_owned(),
            ..ContactForm::default()
        };
        assert_eq!(ContactRequest::from_form(&form), Err(expected));
    }

    #[test]
    fn rejects_bad_addresses_before_any_network_call() {
        let form = ContactForm {
            email: "not-an-address".to_owned(),
            ..form()
        };
        assert!(matches!(
            ContactRequest::from_form(&form),
            Err(ContactValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn blank_optional_fields_are_omitted_from_the_payload() {
        let request = ContactRequest::from_form(&form()).expect("valid form");
        let payload = serde_json::to_value(&request).expect("serialisable");
        let object = payload.as_object().expect("object payload");
        assert!(!object.contains_key("phone"));
        assert!(!object.contains_key("company"));
        assert_eq!(object.get("name"), Some(&Value::from("Ada Lovelace")));
    }

    #[tokio::test]
    async fn successful_submission_toasts_success() {
        let mut invoker = MockFunctionInvoker::new();
        invoker
            .expect_invoke()
            .withf(|name, payload| {
                name == CONTACT_FUNCTION && payload.get("email").is_some()
            })
            .return_once(|_, _| Ok(Value::Null));
        let notifier = Arc::new(RecordingNotifier::new());
        let service = ContactService::new(Arc::new(invoker), notifier.clone());

        let request = ContactRequest::from_form(&form()).expect("valid form");
        service.submit(&request).await.expect("submission succeeds");

        let seen = notifier.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen.first().map(|n| n.variant), Some(ToastVariant::Success));
    }

    #[tokio::test]
    async fn failed_submission_toasts_destructive_and_surfaces_the_error() {
        let mut invoker = MockFunctionInvoker::new();
        invoker
            .expect_invoke()
            .return_once(|_, _| Err(FunctionError::rejected(500_u16, "smtp down")));
        let notifier = Arc::new(RecordingNotifier::new());
        let service = ContactService::new(Arc::new(invoker), notifier.clone());

        let request = ContactRequest::from_form(&form()).expect("valid form");
        let err = service.submit(&request).await.expect_err("should fail");

        assert!(matches!(err, FunctionError::Rejected { status: 500, .. }));
        let seen = notifier.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen.first().map(|n| n.variant),
            Some(ToastVariant::Destructive)
        );
    }
}
