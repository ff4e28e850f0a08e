use log::{debug, error};

use super::error::ExecError;
use super::{pipeline, single};
use crate::shell::job_manager::{Job, JobManager};
use crate::shell::parser::CommandLine;
use crate::shell::reaper::{ExitState, Reaper};

#[derive(Debug)]
pub enum Outcome {
    /// The line had no stages.
    Nothing,
    /// Every stage has terminated; the state is the last stage's.
    Foreground(ExitState),
    /// The stages were registered as a job and are still running.
    Background(Job),
}

/// Runs parsed command lines as child processes.
///
/// One stage goes through the single-command path, more than one through
/// the pipeline path. Both honour the background flag of the line the same
/// way: foreground lines are waited for, background lines become jobs that
/// are reported once launched and collected later by [`Executor::reap_background`].
#[derive(Debug, Default)]
pub struct Executor {
    reaper: Reaper,
    jobs: JobManager,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        self.jobs.get_jobs()
    }

    pub fn execute(&mut self, line: &CommandLine) -> Result<Outcome, ExecError> {
        if line.is_empty() {
            return Ok(Outcome::Nothing);
        }
        debug!("executing `{}`", line);

        let mut pids = Vec::with_capacity(line.stages.len());
        let spawned = if line.is_pipeline() {
            pipeline::spawn(line, &mut self.reaper, &mut pids)
        } else {
            single::spawn(line, &mut pids)
        };

        if let Err(e) = spawned {
            error!("failed to launch `{}`: {}", line, e);
            if !pids.is_empty() {
                if line.background {
                    self.jobs.add_job(pids, line.to_string());
                } else {
                    self.reaper.wait_for(&pids);
                }
            }
            return Err(e);
        }

        if line.background {
            let job = self.jobs.add_job(pids, line.to_string());
            println!("{}", job.launch_report());
            return Ok(Outcome::Background(job.clone()));
        }

        let state = self.reaper.wait_for(&pids);
        debug!("`{}` finished: {:?}", line, state);
        Ok(Outcome::Foreground(state))
    }

    /// Collects terminated children without blocking and returns the
    /// background jobs that are now complete.
    pub fn reap_background(&mut self) -> Vec<Job> {
        self.reaper.drain();
        self.jobs.collect_finished(&mut self.reaper)
    }
}
