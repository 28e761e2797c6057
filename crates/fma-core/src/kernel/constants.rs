/// Application name
pub const APP_NAME: &str = "FileManager-Actions";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current internal version of the action format.
///
/// Version 1 actions carried their command and conditions inline; version 2
/// introduced profiles; version 3 added item-level conditions and menus.
pub const CURRENT_VERSION: u32 = 3;

/// String form written to the `version` field of an upgraded action
pub const CURRENT_VERSION_STR: &str = "3.0";

/// Identifier of the profile synthesized when migrating a pre-v2 action
pub const LEGACY_PROFILE_ID: &str = "profile-pre-v2";

/// Label of the profile synthesized when migrating a pre-v2 action
pub const LEGACY_PROFILE_LABEL: &str = "Default profile";

/// Prefix used when allocating new profile identifiers
pub const PROFILE_ID_PREFIX: &str = "profile-";

/// Default separator for flat string forms of list values
pub const LIST_SEPARATOR: &str = ";";

/// Root of the item hierarchy in a key-tree store
pub const KEYTREE_ROOT: &str = "/apps/fma/items";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "fma";

/// Default directory for desktop-entry items
pub const DEFAULT_ACTIONS_DIR: &str = "actions";
