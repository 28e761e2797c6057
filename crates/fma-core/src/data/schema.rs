//! Static schema tables.
//!
//! Field ids are part of the public contract: append new rows with new ids,
//! never renumber or rename existing ones. The same logical field may appear
//! in several groups as separate rows so that kinds evolve independently.
use crate::data::def::{FieldDescriptor, SchemaGroup};
use crate::data::types::BoxedType::*;

/// Identity of every object
pub static IDENTITY_GROUP: SchemaGroup = SchemaGroup {
    name: "identity",
    fields: &[
        FieldDescriptor::new(1, "id", String)
            .label("Identifier")
            .mandatory()
            .not_serializable(),
        FieldDescriptor::new(2, "label", LocaleString)
            .label("Label")
            .tree("label")
            .desktop("Name")
            .localizable(),
    ],
    since: 1,
    until: None,
};

/// Fields common to menus and actions
pub static ITEM_GROUP: SchemaGroup = SchemaGroup {
    name: "item",
    fields: &[
        FieldDescriptor::new(10, "tooltip", LocaleString)
            .label("Tooltip")
            .tree("tooltip")
            .desktop("Tooltip")
            .localizable(),
        FieldDescriptor::new(11, "icon", LocaleString)
            .label("Icon")
            .tree("icon")
            .desktop("Icon")
            .localizable(),
        FieldDescriptor::new(12, "description", LocaleString)
            .label("Description")
            .tree("description")
            .desktop("Description")
            .localizable(),
        FieldDescriptor::new(13, "subitems", Pointer)
            .label("Children")
            .runtime(),
        FieldDescriptor::new(14, "items-list", StringList)
            .label("Ordered children identifiers")
            .tree("items")
            .desktop("ItemsList")
            .not_comparable(),
        FieldDescriptor::new(15, "enabled", Bool)
            .label("Enabled")
            .default("true")
            .tree("enabled")
            .desktop("Enabled"),
        FieldDescriptor::new(16, "readonly", Bool)
            .label("Read-only")
            .default("false")
            .runtime(),
        FieldDescriptor::new(17, "provider", String)
            .label("I/O provider")
            .runtime(),
        FieldDescriptor::new(18, "shortcut", String)
            .label("Keyboard shortcut")
            .tree("shortcut")
            .desktop("Shortcut"),
    ],
    since: 1,
    until: None,
};

/// Action-specific fields
pub static ACTION_GROUP: SchemaGroup = SchemaGroup {
    name: "action",
    fields: &[
        FieldDescriptor::new(30, "version", String)
            .label("Format version")
            .default("3.0")
            .tree("version")
            .desktop("X-FMA-Version"),
        FieldDescriptor::new(31, "iversion", UInt)
            .label("Internal version")
            .default("3")
            .tree("iversion")
            .desktop("X-FMA-IVersion"),
        FieldDescriptor::new(32, "target-selection", Bool)
            .label("Targets the selection context menu")
            .default("true")
            .tree("target-selection")
            .desktop("TargetContext"),
        FieldDescriptor::new(33, "target-location", Bool)
            .label("Targets the location context menu")
            .default("false")
            .tree("target-location")
            .desktop("TargetLocation"),
        FieldDescriptor::new(34, "target-toolbar", Bool)
            .label("Targets the toolbar")
            .default("false")
            .tree("target-toolbar")
            .desktop("TargetToolbar"),
        FieldDescriptor::new(35, "toolbar-label", LocaleString)
            .label("Toolbar label")
            .tree("toolbar-label")
            .desktop("ToolbarLabel")
            .localizable(),
        FieldDescriptor::new(36, "toolbar-same-label", Bool)
            .label("Toolbar uses the main label")
            .default("true")
            .tree("toolbar-same-label")
            .desktop("X-FMA-ToolbarSameLabel"),
        FieldDescriptor::new(37, "last-allocated", UInt)
            .label("Last allocated profile number")
            .default("0")
            .runtime(),
    ],
    since: 1,
    until: None,
};

/// Pre-v2 action fields, carried inline before profiles existed
pub static ACTION_V1_GROUP: SchemaGroup = SchemaGroup {
    name: "action-v1",
    fields: &[
        FieldDescriptor::new(50, "v1-path", String)
            .label("Command path (v1)")
            .tree("path")
            .obsoleted("path"),
        FieldDescriptor::new(51, "v1-parameters", String)
            .label("Command parameters (v1)")
            .tree("parameters")
            .obsoleted("parameters"),
        FieldDescriptor::new(52, "v1-basenames", StringList)
            .label("Basenames (v1)")
            .tree("basenames")
            .obsoleted("basenames"),
        FieldDescriptor::new(53, "v1-matchcase", Bool)
            .label("Case sensitive (v1)")
            .default("true")
            .tree("matchcase")
            .obsoleted("matchcase"),
        FieldDescriptor::new(54, "v1-mimetypes", StringList)
            .label("Mimetypes (v1)")
            .tree("mimetypes")
            .obsoleted("mimetypes"),
        FieldDescriptor::new(55, "v1-schemes", StringList)
            .label("Schemes (v1)")
            .tree("schemes")
            .obsoleted("schemes"),
        FieldDescriptor::new(56, "v1-accept-multiple", Bool)
            .label("Accept multiple files (v1)")
            .default("false")
            .tree("accept-multiple-files")
            .obsoleted("accept-multiple"),
    ],
    since: 1,
    until: Some(2),
};

/// Menus have no specific field yet
pub static MENU_GROUP: SchemaGroup = SchemaGroup {
    name: "menu",
    fields: &[],
    since: 1,
    until: None,
};

/// Profile-specific fields: how the command runs
pub static PROFILE_GROUP: SchemaGroup = SchemaGroup {
    name: "profile",
    fields: &[
        FieldDescriptor::new(70, "path", String)
            .label("Command path")
            .mandatory()
            .tree("path")
            .desktop("Path"),
        FieldDescriptor::new(71, "parameters", String)
            .label("Command parameters")
            .tree("parameters")
            .desktop("Parameters"),
        FieldDescriptor::new(72, "working-dir", String)
            .label("Working directory")
            .default("%d")
            .tree("working-dir")
            .desktop("WorkingDirectory"),
        FieldDescriptor::new(73, "execution-mode", String)
            .label("Execution mode")
            .default("Normal")
            .tree("execution-mode")
            .desktop("ExecutionMode"),
        FieldDescriptor::new(74, "startup-notify", Bool)
            .label("Startup notification")
            .default("false")
            .tree("startup-notify")
            .desktop("StartupNotify"),
        FieldDescriptor::new(75, "startup-class", String)
            .label("Startup WM class")
            .tree("startup-class")
            .desktop("StartupWMClass"),
        FieldDescriptor::new(76, "execute-as", String)
            .label("Execute as user")
            .tree("execute-as")
            .desktop("ExecuteAs"),
    ],
    since: 1,
    until: None,
};

/// Display conditions, consumed by context matching
pub static CONDITIONS_GROUP: SchemaGroup = SchemaGroup {
    name: "conditions",
    fields: &[
        FieldDescriptor::new(90, "basenames", StringList)
            .label("Basenames")
            .default("*")
            .tree("basenames")
            .desktop("Basenames"),
        FieldDescriptor::new(91, "matchcase", Bool)
            .label("Case sensitive basenames")
            .default("true")
            .tree("matchcase")
            .desktop("Matchcase"),
        FieldDescriptor::new(92, "mimetypes", StringList)
            .label("Mimetypes")
            .default("*")
            .tree("mimetypes")
            .desktop("MimeTypes"),
        FieldDescriptor::new(93, "folders", StringList)
            .label("Folders")
            .default("/")
            .tree("folders")
            .desktop("Folders"),
        FieldDescriptor::new(94, "schemes", StringList)
            .label("Schemes")
            .default("file")
            .tree("schemes")
            .desktop("Schemes"),
        FieldDescriptor::new(95, "accept-multiple", Bool)
            .label("Accept a multiple selection")
            .default("false")
            .tree("accept-multiple")
            .desktop("X-FMA-AcceptMultiple"),
        FieldDescriptor::new(96, "only-show-in", StringList)
            .label("Only show in desktop environments")
            .tree("only-show-in")
            .desktop("OnlyShowIn"),
        FieldDescriptor::new(97, "not-show-in", StringList)
            .label("Do not show in desktop environments")
            .tree("not-show-in")
            .desktop("NotShowIn"),
        FieldDescriptor::new(98, "try-exec", String)
            .label("Executable which must exist")
            .tree("try-exec")
            .desktop("TryExec"),
        FieldDescriptor::new(99, "show-if-registered", String)
            .label("D-Bus name which must be registered")
            .tree("show-if-registered")
            .desktop("ShowIfRegistered"),
        FieldDescriptor::new(100, "show-if-true", String)
            .label("Command which must print 'true'")
            .tree("show-if-true")
            .desktop("ShowIfTrue"),
        FieldDescriptor::new(101, "show-if-running", String)
            .label("Process which must be running")
            .tree("show-if-running")
            .desktop("ShowIfRunning"),
        FieldDescriptor::new(102, "capabilities", StringList)
            .label("Required capabilities")
            .tree("capabilities")
            .desktop("Capabilities"),
        FieldDescriptor::new(103, "selection-counts", UIntList)
            .label("Accepted selection sizes")
            .tree("selection-counts")
            .desktop("X-FMA-SelectionCounts"),
    ],
    since: 2,
    until: None,
};

/// Schema of a menu
pub static MENU_SCHEMA: [&SchemaGroup; 4] = [&IDENTITY_GROUP, &ITEM_GROUP, &MENU_GROUP, &CONDITIONS_GROUP];

/// Schema of an action
pub static ACTION_SCHEMA: [&SchemaGroup; 5] = [
    &IDENTITY_GROUP,
    &ITEM_GROUP,
    &ACTION_GROUP,
    &ACTION_V1_GROUP,
    &CONDITIONS_GROUP,
];

/// Schema of a profile
pub static PROFILE_SCHEMA: [&SchemaGroup; 3] = [&IDENTITY_GROUP, &PROFILE_GROUP, &CONDITIONS_GROUP];

/// Every group, for dumps and registry checks
pub static ALL_GROUPS: [&SchemaGroup; 7] = [
    &IDENTITY_GROUP,
    &ITEM_GROUP,
    &ACTION_GROUP,
    &ACTION_V1_GROUP,
    &MENU_GROUP,
    &PROFILE_GROUP,
    &CONDITIONS_GROUP,
];
