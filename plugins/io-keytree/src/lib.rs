//! # FMA Key-Tree I/O Provider
//!
//! Stores menus and actions in a hierarchical preference tree:
//!
//! ```text
//! /apps/fma/items/<item>/type               = "Action"
//! /apps/fma/items/<item>/<key>              = typed entry
//! /apps/fma/items/<action>/<profile>/<key>  = typed entry
//! ```
//!
//! The whole tree is persisted as a single JSON document through a
//! [`StorageProvider`](fma_core::StorageProvider). Items without a `version`
//! key are read as version 1, which brings in the pre-profile fields.
pub mod provider;
pub mod tree;

pub use provider::KeyTreeProvider;
pub use tree::{Entry, KeyTree};
