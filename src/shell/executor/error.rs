use std::ffi::NulError;

use nix::errno::Errno;
use thiserror::Error;

/// Failures of the interpreter process itself while launching a command.
///
/// Anything that goes wrong inside a forked child is reported by the child
/// and surfaces only as its exit status.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("word contains a NUL byte: {0}")]
    NulByte(#[from] NulError),
    #[error("cannot create pipe: {0}")]
    Pipe(#[source] Errno),
    #[error("cannot fork: {0}")]
    Fork(#[source] Errno),
}
