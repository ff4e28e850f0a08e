mod child;
mod error;
mod executor;
mod pipeline;
mod single;

pub use error::ExecError;
pub use executor::{Executor, Outcome};
