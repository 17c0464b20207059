use futures::future;
use std::time::{Duration, Instant, SystemTime};
use tokio::time;

use crate::jobs::Job;

struct JobContainer {
    job: Box<dyn Job>,
    run_frequency: Duration,
    last_run_time: SystemTime,
}

pub struct JobRunner {
    jobs: Vec<JobContainer>,
    update_frequency: Duration,
}

impl JobRunner {
    pub fn new(update_frequency: Duration) -> Self {
        Self {
            jobs: Vec::new(),
            update_frequency,
        }
    }

    pub fn register(&mut self, job: Box<dyn Job>, run_frequency: Duration) {
        log::info!(
            "Registered job \"{}\" to run every {} seconds",
            job.name(),
            run_frequency.as_secs()
        );

        self.jobs.push(JobContainer {
            job,
            run_frequency,
            last_run_time: SystemTime::now(),
        });
    }

    pub async fn start(&mut self) -> ! {
        loop {
            let before = Instant::now();

            let mut job_names = Vec::with_capacity(self.jobs.len());
            let mut job_futures = Vec::with_capacity(self.jobs.len());

            for job_container in &mut self.jobs {
                let time_elapsed_since_last_run = SystemTime::now()
                    .duration_since(job_container.last_run_time)
                    .unwrap_or(Duration::from_nanos(0));
                let is_time_to_run = time_elapsed_since_last_run >= job_container.run_frequency;

                if is_time_to_run && job_container.job.is_ready() {
                    let name_ref = job_container.job.name();
                    log::info!("Executing job \"{}\"", name_ref);

                    job_container.last_run_time = SystemTime::now();

                    job_names.push(name_ref);
                    job_futures.push(job_container.job.execute());
                }
            }

            let results = future::join_all(job_futures).await;

            for (i, result) in results.into_iter().enumerate() {
                if let Err(e) = result {
                    log::error!("{}", e);
                } else {
                    log::info!("Job \"{}\" finished successfully", job_names[i]);
                }
            }

            let after = Instant::now();
            let delta = after - before;

            if delta < self.update_frequency {
                time::sleep(self.update_frequency - delta).await;
            }
        }
    }
}
