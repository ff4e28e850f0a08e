use std::os::fd::OwnedFd;

use log::debug;
use nix::unistd::{fork, pipe, ForkResult, Pid};

use super::child::{self, Endpoint, StageImage};
use super::error::ExecError;
use crate::shell::parser::CommandLine;
use crate::shell::reaper::Reaper;

/// Forks every stage of `line` left to right, connecting neighbours with
/// pipes.
///
/// Between forks the parent holds at most one descriptor: the read end the
/// next stage will take as its standard input. A write end is closed in the
/// parent as soon as the stage that writes to it has been forked, so each
/// reader sees end-of-file once its writer exits. Pids are pushed onto `pids`
/// as stages are forked, so the caller can still wait for them when a later
/// stage fails to launch.
pub(super) fn spawn(
    line: &CommandLine,
    reaper: &mut Reaper,
    pids: &mut Vec<Pid>,
) -> Result<(), ExecError> {
    let images = line
        .stages
        .iter()
        .map(StageImage::new)
        .collect::<Result<Vec<_>, _>>()?;
    let input = child::c_path(line.input.as_deref())?;
    let output = child::c_path(line.output.as_deref())?;
    let last = images.len().saturating_sub(1);

    let mut previous: Option<OwnedFd> = None;
    for (i, (image, stage)) in images.iter().zip(&line.stages).enumerate() {
        // Stages that already failed must not linger as zombies while the
        // rest of the pipeline is being forked.
        reaper.drain();

        let next = if i < last {
            Some(pipe().map_err(ExecError::Pipe)?)
        } else {
            None
        };

        // SAFETY: the child only runs `child::exec_stage`, which does not allocate.
        match unsafe { fork() }.map_err(ExecError::Fork)? {
            ForkResult::Child => {
                let stdin = match previous.take() {
                    Some(read) => Endpoint::Pipe(read),
                    None if i == 0 => input.as_deref().map_or(Endpoint::Inherit, Endpoint::ReadFile),
                    None => Endpoint::Inherit,
                };
                let stdout = match next {
                    Some((read, write)) => {
                        drop(read);
                        Endpoint::Pipe(write)
                    }
                    None => output.as_deref().map_or(Endpoint::Inherit, Endpoint::WriteFile),
                };
                child::exec_stage(stdin, stdout, image)
            }
            ForkResult::Parent { child: pid } => {
                debug!("forked {} for stage {} `{}`", pid, i, stage);
                pids.push(pid);
                drop(previous.take());
                previous = next.map(|(read, write)| {
                    drop(write);
                    read
                });
            }
        }
    }
    Ok(())
}
