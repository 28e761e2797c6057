//! # FMA Core Object
//!
//! Editable objects (menus, actions, profiles) stored in an arena.
//!
//! - [`store`] - the [`ObjectStore`] arena and generational [`ObjectId`]s
//! - [`kind`] - [`ObjectKind`] and the [`FactoryKind`] hook trait
//! - `factory` - the generic get/set/copy/compare/validate engine
//! - `tree` - ordered parent/child relations
//! - `duplicable` - origin tracking and the modified/valid flags
pub mod duplicable;
pub mod error;
pub mod factory;
pub mod kind;
pub mod store;
pub mod tree;

pub use duplicable::Status;
pub use error::TreeError;
pub use kind::{FactoryKind, ObjectKind};
pub use store::{FactoryObject, ObjectId, ObjectStore};
pub use tree::ItemCounts;

// Test module declaration
#[cfg(test)]
mod tests;
