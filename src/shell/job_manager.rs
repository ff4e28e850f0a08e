use std::fmt;

use log::debug;
use nix::unistd::Pid;

use super::reaper::{ExitState, Reaper};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Finished(ExitState),
}

/// A command line launched in the background.
#[derive(Debug, Clone)]
pub struct Job {
    pub index: usize,
    pub pids: Vec<Pid>,
    pub command: String,
    pub status: JobStatus,
    remaining: Vec<Pid>,
    last_state: Option<ExitState>,
}

impl Job {
    fn new(index: usize, pids: Vec<Pid>, command: String) -> Self {
        Self {
            index,
            remaining: pids.clone(),
            pids,
            command,
            status: JobStatus::Running,
            last_state: None,
        }
    }

    /// Pid of the last stage, the one reported at launch.
    pub fn leader(&self) -> Option<Pid> {
        self.pids.last().copied()
    }

    /// The `(<counter>)+ <pid>` line printed once per launch.
    pub fn launch_report(&self) -> String {
        match self.leader() {
            Some(pid) => format!("({})+ {}", self.index, pid),
            None => format!("({})+", self.index),
        }
    }

    fn collect(&mut self, reaper: &mut Reaper) {
        let last = self.leader();
        self.remaining.retain(|&pid| match reaper.take(pid) {
            Some(state) => {
                if Some(pid) == last {
                    self.last_state = Some(state);
                }
                false
            }
            None => true,
        });
        if self.remaining.is_empty() {
            self.status = JobStatus::Finished(self.last_state.unwrap_or(ExitState::Unknown));
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            JobStatus::Running => write!(f, "[{}] running {}", self.index, self.command),
            JobStatus::Finished(state) => write!(f, "[{}] {} {}", self.index, state, self.command),
        }
    }
}

/// Background jobs that have not been reported as finished yet.
#[derive(Debug, Default)]
pub struct JobManager {
    jobs: Vec<Job>,
}

impl JobManager {
    pub fn get_jobs(&self) -> &[Job] {
        &self.jobs
    }

    fn find_available_index(&self) -> usize {
        let mut index = 1;
        while self.jobs.iter().any(|job| job.index == index) {
            index += 1;
        }
        index
    }

    pub fn add_job(&mut self, pids: Vec<Pid>, command: String) -> &Job {
        let index = self.find_available_index();
        debug!("background job [{}] {:?}: {}", index, pids, command);
        self.jobs.push(Job::new(index, pids, command));
        &self.jobs[self.jobs.len() - 1]
    }

    /// Hands collected statuses to their jobs and removes the jobs whose
    /// stages have all terminated, oldest first.
    pub fn collect_finished(&mut self, reaper: &mut Reaper) -> Vec<Job> {
        for job in self.jobs.iter_mut() {
            job.collect(reaper);
        }
        let (finished, running): (Vec<Job>, Vec<Job>) = self
            .jobs
            .drain(..)
            .partition(|job| matches!(job.status, JobStatus::Finished(_)));
        self.jobs = running;
        finished
    }
}
