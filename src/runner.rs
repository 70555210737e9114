//! Sequential job execution with per-job fault isolation.

use crate::config::Config;
use crate::job::{Job, Target};
use crate::joblog::{JobLog, LogStatus};
use crate::pipeline::CapturePipeline;
use crate::session::SessionProvider;
use crate::sink::OutputSink;
use crate::utils::TIMESTAMP_FORMAT;
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Iterates an ordered target list, invoking the capture pipeline, the
/// output sink, and the job log for each target in turn.
///
/// Jobs run strictly sequentially and never share browser state; a failure
/// in one job does not prevent subsequent jobs from running. No aggregate
/// result is computed; each job's outcome lives in its log record and its
/// directory state.
pub struct JobRunner {
    config: Config,
    pipeline: CapturePipeline,
    sink: OutputSink,
    log: JobLog,
}

impl JobRunner {
    pub fn new(config: Config, provider: Arc<dyn SessionProvider>) -> Self {
        let pipeline = CapturePipeline::new(config.clone(), provider);
        let sink = OutputSink::new();
        let log = JobLog::new(&config.outputs_root);
        Self {
            config,
            pipeline,
            sink,
            log,
        }
    }

    pub async fn run(&self, targets: &[Target]) {
        info!("starting run with {} target(s)", targets.len());
        for target in targets {
            self.run_job(target.clone()).await;
        }
    }

    async fn run_job(&self, target: Target) {
        let started_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut job = Job::new(target, started_at, &self.config.outputs_root);

        info!(url = %job.target.url, "starting capture job");

        match self.pipeline.run(&mut job).await {
            Ok(result) => match self.sink.write(&job.output_dir, &result).await {
                Ok(()) => {
                    job.succeed();
                    info!(
                        url = %job.target.url,
                        dir = %job.output_dir.display(),
                        links = result.links.len(),
                        "capture job complete"
                    );
                    let message =
                        format!("capture complete | HTTP status: {}", job.http_status_label());
                    self.log_outcome(&job, LogStatus::Ok, &message).await;
                }
                Err(e) => {
                    // The sink already removed the job directory.
                    job.fail(&e);
                    warn!(url = %job.target.url, error = %e, "artifact persistence failed");
                    let message = format!("{e} | HTTP status: {}", job.http_status_label());
                    self.log_outcome(&job, LogStatus::Err, &message).await;
                }
            },
            Err(e) => {
                self.sink.cleanup(&job.output_dir).await;
                job.fail(&e);
                warn!(url = %job.target.url, error = %e, "capture job failed");
                let message = format!("{e} | HTTP status: {}", job.http_status_label());
                self.log_outcome(&job, LogStatus::Err, &message).await;
            }
        }
    }

    async fn log_outcome(&self, job: &Job, status: LogStatus, message: &str) {
        if let Err(e) = self
            .log
            .append(status, &job.started_at, &job.target.url, message)
            .await
        {
            error!(url = %job.target.url, error = %e, "failed to record job outcome");
        }
    }
}
