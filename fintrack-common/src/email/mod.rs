//! Outbound mail for goal deadline reminders. The job scheduler picks a
//! sender at startup: a real SMTP relay, or a mock that prints to stdout
//! when email is disabled.

pub mod senders;
pub mod templates;

use async_trait::async_trait;
use lettre::message::Mailbox;
use std::fmt;

#[derive(Debug)]
pub enum EmailError {
    RelayUnavailable(String),
    InvalidRecipient(String),
    SendFailed(String),
}

impl std::error::Error for EmailError {}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailError::RelayUnavailable(e) => {
                write!(f, "EmailError: SMTP relay unavailable: {e}")
            }
            EmailError::InvalidRecipient(r) => {
                write!(f, "EmailError: Invalid recipient address: {r}")
            }
            EmailError::SendFailed(e) => write!(f, "EmailError: Failed to send: {e}"),
        }
    }
}

/// A rendered reminder ready to hand to a sender. Bodies come from
/// [`templates`] and are always HTML.
#[derive(Debug)]
pub struct EmailMessage<'a> {
    pub body: String,
    pub subject: &'a str,
    pub from: Mailbox,
    pub reply_to: Mailbox,
    pub destination: &'a str,
}

#[async_trait]
pub trait SendEmail: Send + Sync {
    async fn send<'a>(&self, message: EmailMessage<'a>) -> Result<(), EmailError>;
}

pub type EmailSender = Box<dyn SendEmail>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_error_messages_name_the_failure() {
        let relay = EmailError::RelayUnavailable(String::from("connection refused"));
        assert_eq!(
            relay.to_string(),
            "EmailError: SMTP relay unavailable: connection refused"
        );

        let recipient = EmailError::InvalidRecipient(String::from("not-an-address"));
        assert_eq!(
            recipient.to_string(),
            "EmailError: Invalid recipient address: not-an-address"
        );
    }
}
