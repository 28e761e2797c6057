//! # FMA Core Kernel
//!
//! Process-wide constants and the aggregated error type of `fma-core`.
//!
//! - **Constants**: format versions, well-known identifiers and default
//!   locations, in the `constants` submodule.
//! - **Error Handling**: [`Error`](error::Error) wraps every subsystem error
//!   and [`Result`](error::Result) is the crate-wide alias.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
