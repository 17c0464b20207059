use fintrack_common::db::{self, DbThreadPool};
use fintrack_common::email::templates::GoalDeadlineReminder;
use fintrack_common::email::{EmailMessage, EmailSender};

use async_trait::async_trait;
use chrono::{Days, Utc};
use lettre::message::Mailbox;
use std::sync::Arc;

use crate::jobs::{Job, JobError};

/// Emails users whose unfinished savings goals have a deadline within the
/// reminder window.
pub struct GoalDeadlineRemindersJob {
    reminder_window_days: u64,
    email_from: Mailbox,
    email_reply_to: Mailbox,
    db_thread_pool: DbThreadPool,
    email_sender: Arc<EmailSender>,
    is_running: bool,
}

impl GoalDeadlineRemindersJob {
    pub fn new(
        reminder_window_days: u64,
        email_from: Mailbox,
        email_reply_to: Mailbox,
        db_thread_pool: DbThreadPool,
        email_sender: Arc<EmailSender>,
    ) -> Self {
        Self {
            reminder_window_days,
            email_from,
            email_reply_to,
            db_thread_pool,
            email_sender,
            is_running: false,
        }
    }
}

#[async_trait]
impl Job for GoalDeadlineRemindersJob {
    fn name(&self) -> &'static str {
        "Goal Deadline Reminders"
    }

    fn is_ready(&self) -> bool {
        !self.is_running
    }

    async fn execute(&mut self) -> Result<(), JobError> {
        self.is_running = true;

        let today = Utc::now().date_naive();
        let cutoff = today
            .checked_add_days(Days::new(self.reminder_window_days))
            .unwrap_or(today);

        let db_thread_pool = self.db_thread_pool.clone();
        let goals = tokio::task::spawn_blocking(move || {
            let mut goal_dao = db::goal::Dao::new(&db_thread_pool);
            goal_dao.get_goals_with_deadline_before(cutoff)
        })
        .await??;

        for goal in goals {
            let subject = format!("Reminder: Financial Goal - {}", goal.title);

            let message = EmailMessage {
                body: GoalDeadlineReminder::generate(
                    &goal.title,
                    goal.deadline,
                    goal.saved_amount_cents,
                    goal.target_amount_cents,
                ),
                subject: &subject,
                from: self.email_from.clone(),
                reply_to: self.email_reply_to.clone(),
                destination: &goal.user_email,
            };

            if let Err(e) = self.email_sender.send(message).await {
                log::error!(
                    "Failed to send deadline reminder for goal \"{}\" to {}: {}",
                    goal.title,
                    goal.user_email,
                    e
                );
            }
        }

        self.is_running = false;
        Ok(())
    }
}
