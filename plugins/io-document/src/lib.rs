//! # FMA Document I/O Provider
//!
//! One `<id>.<ext>` document per menu or action, in any
//! [`ConfigFormat`](fma_core::ConfigFormat):
//!
//! ```json
//! {
//!   "type": "Action",
//!   "label": "Open terminal",
//!   "version": "3.0",
//!   "profiles": [
//!     { "id": "profile-1", "path": "/usr/bin/xterm" }
//!   ]
//! }
//! ```
//!
//! Keys are the fields' tree keys. Values keep their native document type;
//! strings are also accepted for any field and parsed.
pub mod provider;
pub mod value;

pub use provider::DocumentProvider;
