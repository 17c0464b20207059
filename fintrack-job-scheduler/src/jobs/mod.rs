mod goal_deadline_reminders;

pub use goal_deadline_reminders::GoalDeadlineRemindersJob;

use fintrack_common::db::DaoError;
use fintrack_common::email::EmailError;

use async_trait::async_trait;
use std::fmt;
use tokio::task::JoinError;

#[derive(Debug)]
pub enum JobError {
    DaoFailure(DaoError),
    EmailFailure(EmailError),
    ConcurrencyError(JoinError),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::DaoFailure(e) => {
                write!(f, "JobError: {e}")
            }
            JobError::EmailFailure(e) => {
                write!(f, "JobError: {e}")
            }
            JobError::ConcurrencyError(e) => {
                write!(f, "JobError: ConcurrencyError: {e}")
            }
        }
    }
}

impl From<DaoError> for JobError {
    fn from(e: DaoError) -> Self {
        JobError::DaoFailure(e)
    }
}

impl From<EmailError> for JobError {
    fn from(e: EmailError) -> Self {
        JobError::EmailFailure(e)
    }
}

impl From<JoinError> for JobError {
    fn from(e: JoinError) -> Self {
        JobError::ConcurrencyError(e)
    }
}

#[async_trait]
pub trait Job: Send {
    fn name(&self) -> &'static str;
    fn is_ready(&self) -> bool;
    async fn execute(&mut self) -> Result<(), JobError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    pub struct MockJob {
        pub is_running: bool,
        pub runs: Arc<Mutex<usize>>,
    }

    impl MockJob {
        pub fn new() -> Self {
            Self {
                is_running: false,
                runs: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl Job for MockJob {
        fn name(&self) -> &'static str {
            "Mock"
        }

        fn is_ready(&self) -> bool {
            !self.is_running
        }

        async fn execute(&mut self) -> Result<(), JobError> {
            *self.runs.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_job_execute() {
        let mut job = MockJob::new();
        let job_run_count = Arc::clone(&job.runs);
        assert_eq!(*job_run_count.lock().unwrap(), 0);

        assert!(job.is_ready());
        job.execute().await.unwrap();

        assert_eq!(*job_run_count.lock().unwrap(), 1);
    }
}
