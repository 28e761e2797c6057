//! # FMA Desktop-Entry I/O Provider
//!
//! One `<id>.desktop` key file per menu or action. The item's own fields go
//! in the `[Desktop Entry]` group, each profile in an
//! `[X-Action-Profile <id>]` group listed by the `Profiles` key.
pub mod keyfile;
pub mod provider;

pub use keyfile::{KeyFile, KeyFileError};
pub use provider::DesktopProvider;
