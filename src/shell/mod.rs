pub mod executor;
pub mod job_manager;
pub mod parser;
pub mod reader;
pub mod reaper;
pub mod readline;
mod shell;

pub use shell::Shell;
