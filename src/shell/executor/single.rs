use log::debug;
use nix::unistd::{fork, ForkResult, Pid};

use super::child::{self, Endpoint, StageImage};
use super::error::ExecError;
use crate::shell::parser::CommandLine;

/// Forks the only stage of `line`, applying both redirects to it.
///
/// The pid of the child is pushed onto `pids`; waiting is left to the caller.
pub(super) fn spawn(line: &CommandLine, pids: &mut Vec<Pid>) -> Result<(), ExecError> {
    let Some(stage) = line.stages.first() else {
        return Ok(());
    };
    let image = StageImage::new(stage)?;
    let input = child::c_path(line.input.as_deref())?;
    let output = child::c_path(line.output.as_deref())?;

    // SAFETY: the child only runs `child::exec_stage`, which does not allocate.
    match unsafe { fork() }.map_err(ExecError::Fork)? {
        ForkResult::Child => {
            let stdin = input.as_deref().map_or(Endpoint::Inherit, Endpoint::ReadFile);
            let stdout = output.as_deref().map_or(Endpoint::Inherit, Endpoint::WriteFile);
            child::exec_stage(stdin, stdout, &image)
        }
        ForkResult::Parent { child: pid } => {
            debug!("forked {} for `{}`", pid, stage);
            pids.push(pid);
            Ok(())
        }
    }
}
