//! # FMA Core I/O
//!
//! Item-level providers and the registry routing reads, writes and deletes
//! to them.
pub mod registry;
pub mod traits;

pub use registry::{LoadedItems, ProviderRegistry};
pub use traits::IoProvider;
