use async_trait::async_trait;

use crate::email::{EmailError, EmailMessage, SendEmail};

/// Stand-in sender used when email is disabled. Reminders are printed to
/// stdout instead of being delivered.
#[derive(Default)]
pub struct MockSender {}

impl MockSender {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl SendEmail for MockSender {
    async fn send<'a>(&self, message: EmailMessage<'a>) -> Result<(), EmailError> {
        println!(
            "\nWould send \"{}\" to {}:\n{}\n",
            message.subject, message.destination, message.body
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lettre::message::Mailbox;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_mock_sender_accepts_any_message() {
        let sender = MockSender::new();
        let mailbox = Mailbox::from_str("FinTrack <no-reply@localhost>").unwrap();

        let message = EmailMessage {
            body: String::from("<html><body>Reminder</body></html>"),
            subject: "Reminder: Financial Goal - Emergency fund",
            from: mailbox.clone(),
            reply_to: mailbox,
            destination: "user@example.com",
        };

        sender.send(message).await.unwrap();
    }
}
