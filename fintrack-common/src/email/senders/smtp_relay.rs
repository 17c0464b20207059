use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::email::{EmailError, EmailMessage, SendEmail};

/// Delivers reminders through an authenticated SMTP relay.
pub struct SmtpRelay {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    pub fn new(address: &str, username: String, password: String) -> Result<Self, EmailError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(address)
            .map_err(|e| EmailError::RelayUnavailable(e.to_string()))?
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl SendEmail for SmtpRelay {
    async fn send<'a>(&self, message: EmailMessage<'a>) -> Result<(), EmailError> {
        let destination = message
            .destination
            .parse()
            .map_err(|_| EmailError::InvalidRecipient(message.destination.to_string()))?;

        let email = Message::builder()
            .from(message.from)
            .reply_to(message.reply_to)
            .to(destination)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.body)
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
