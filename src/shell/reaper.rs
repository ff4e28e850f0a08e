use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Exited(i32),
    Signaled(Signal),
    /// The child was collected elsewhere and its status is lost.
    Unknown,
}

impl ExitState {
    pub fn code(&self) -> i32 {
        match self {
            ExitState::Exited(code) => *code,
            ExitState::Signaled(sig) => 128 + *sig as i32,
            ExitState::Unknown => 0,
        }
    }

    pub fn success(&self) -> bool {
        self.code() == 0
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Exited(0) | ExitState::Unknown => write!(f, "done"),
            ExitState::Exited(code) => write!(f, "exit {}", code),
            ExitState::Signaled(sig) => write!(f, "killed ({})", sig),
        }
    }
}

/// Collects terminated children without blocking.
///
/// The interpreter is single threaded, so instead of reaping from a signal
/// handler the reaper is polled at fixed points: before each stage is
/// forked, after a foreground wait and before each prompt. Statuses that no
/// caller has asked for yet are kept until [`Reaper::take`] claims them.
#[derive(Debug, Default)]
pub struct Reaper {
    collected: HashMap<Pid, ExitState>,
}

impl Reaper {
    /// Reaps every child that has already terminated and returns how many
    /// were collected. Never blocks; a failing `waitpid` simply ends the
    /// drain.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    debug!("reaped {} (exit {})", pid, code);
                    self.collected.insert(pid, ExitState::Exited(code));
                    count += 1;
                }
                Ok(WaitStatus::Signaled(pid, sig, _core_dumped)) => {
                    debug!("reaped {} (signal {})", pid, sig);
                    self.collected.insert(pid, ExitState::Signaled(sig));
                    count += 1;
                }
                Ok(WaitStatus::StillAlive) => break,
                Ok(other) => debug!("ignoring wait status {:?}", other),
                Err(Errno::EINTR) => continue,
                Err(Errno::ECHILD) => break,
                Err(e) => {
                    warn!("waitpid failed while reaping: {}", e);
                    break;
                }
            }
        }
        count
    }

    /// Claims the status of an already collected child.
    pub fn take(&mut self, pid: Pid) -> Option<ExitState> {
        self.collected.remove(&pid)
    }

    /// Blocks until every pid in `pids` has terminated and returns the state
    /// of the last one.
    pub fn wait_for(&mut self, pids: &[Pid]) -> ExitState {
        let mut last = ExitState::Unknown;
        for &pid in pids {
            last = match self.take(pid) {
                Some(state) => state,
                None => wait_blocking(pid),
            };
        }
        self.drain();
        last
    }
}

fn wait_blocking(pid: Pid) -> ExitState {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                debug!("waited {} (exit {})", pid, code);
                return ExitState::Exited(code);
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                debug!("waited {} (signal {})", pid, sig);
                return ExitState::Signaled(sig);
            }
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(e) => {
                warn!("waitpid({}) failed: {}", pid, e);
                return ExitState::Unknown;
            }
        }
    }
}
