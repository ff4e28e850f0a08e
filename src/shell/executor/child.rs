//! Code that runs in a forked child between `fork` and `exec`.
//!
//! Everything the child needs is prepared by the parent beforehand; the
//! child itself only opens, duplicates and closes descriptors, writes
//! fixed messages and replaces its image. No allocation happens here.

use std::ffi::{CStr, CString};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

use nix::fcntl::{open, OFlag};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{dup2, write};

use super::error::ExecError;
use crate::shell::parser::Stage;

/// Exit status for redirect and descriptor failures.
pub(super) const EXIT_FAILURE: i32 = 1;
/// Exit status when the program cannot be executed.
pub(super) const EXIT_NOT_FOUND: i32 = 127;

/// Argument vector of a stage, NUL-terminated and ready for `execvp`.
pub(super) struct StageImage {
    argv: Vec<CString>,
    argv_ptrs: Vec<*const libc::c_char>,
}

impl StageImage {
    pub(super) fn new(stage: &Stage) -> Result<Self, ExecError> {
        let argv = stage
            .argv()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?;
        let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());
        Ok(Self { argv, argv_ptrs })
    }

    fn program(&self) -> &[u8] {
        self.argv
            .first()
            .map(|program| program.to_bytes())
            .unwrap_or_default()
    }

    fn exec(&self) -> ! {
        if let Some(&program) = self.argv_ptrs.first().filter(|ptr| !ptr.is_null()) {
            // SAFETY: both pointers come from `self.argv`, which outlives the
            // call, and the vector is NULL-terminated.
            unsafe { libc::execvp(program, self.argv_ptrs.as_ptr()) };
        }
        report(&[b"minish: ", self.program(), b": command not found\n"]);
        exit(EXIT_NOT_FOUND)
    }
}

/// Where a standard stream of the child comes from or goes to.
pub(super) enum Endpoint<'a> {
    Inherit,
    Pipe(OwnedFd),
    ReadFile(&'a CStr),
    WriteFile(&'a CStr),
}

/// Converts a redirect target into the form `open` takes.
pub(super) fn c_path(path: Option<&str>) -> Result<Option<CString>, ExecError> {
    Ok(path.map(CString::new).transpose()?)
}

/// Wires standard input and output, then replaces the process image.
///
/// Any descriptor the stage does not use must already be closed by the
/// caller; the endpoints themselves are closed once duplicated. SIGPIPE is
/// ignored in the interpreter and an ignored signal survives `exec`, so it
/// is put back to its default action here.
pub(super) fn exec_stage(stdin: Endpoint<'_>, stdout: Endpoint<'_>, image: &StageImage) -> ! {
    // SAFETY: restoring the default action installs no handler code.
    if let Err(e) = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) } {
        report(&[b"minish: cannot reset SIGPIPE: ", e.desc().as_bytes(), b"\n"]);
        exit(EXIT_FAILURE);
    }
    if let Err(code) = attach(stdin, libc::STDIN_FILENO) {
        exit(code);
    }
    if let Err(code) = attach(stdout, libc::STDOUT_FILENO) {
        exit(code);
    }
    image.exec()
}

fn attach(endpoint: Endpoint<'_>, target: RawFd) -> Result<(), i32> {
    let fd = match endpoint {
        Endpoint::Inherit => return Ok(()),
        Endpoint::Pipe(fd) => fd,
        Endpoint::ReadFile(path) => open_file(path, OFlag::O_RDONLY, Mode::empty())?,
        Endpoint::WriteFile(path) => open_file(
            path,
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            Mode::S_IRWXU,
        )?,
    };

    if fd.as_raw_fd() == target {
        // Already in place, keep it open.
        let _ = fd.into_raw_fd();
        return Ok(());
    }
    if let Err(e) = dup2(fd.as_raw_fd(), target) {
        report(&[b"minish: cannot redirect: ", e.desc().as_bytes(), b"\n"]);
        return Err(EXIT_FAILURE);
    }
    Ok(())
}

fn open_file(path: &CStr, flags: OFlag, mode: Mode) -> Result<OwnedFd, i32> {
    match open(path, flags, mode) {
        // SAFETY: `open` just returned this descriptor and nothing else owns it.
        Ok(fd) => Ok(unsafe { OwnedFd::from_raw_fd(fd) }),
        Err(e) => {
            report(&[b"minish: ", path.to_bytes(), b": ", e.desc().as_bytes(), b"\n"]);
            Err(EXIT_FAILURE)
        }
    }
}

fn report(parts: &[&[u8]]) {
    let stderr = io::stderr();
    for part in parts {
        let _ = write(&stderr, part);
    }
}

fn exit(code: i32) -> ! {
    // SAFETY: `_exit` skips atexit handlers and stdio flushing, which belong
    // to the parent's copy of the process state.
    unsafe { libc::_exit(code) }
}
