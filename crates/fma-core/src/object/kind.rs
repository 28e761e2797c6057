//! Object kinds and their lifecycle hooks.
//!
//! A kind is an ordered concatenation of schema groups plus a set of
//! optional hooks. Every hook of [`FactoryKind`] has a default body, so a
//! kind only overrides what it needs.
use std::fmt;

use log::{debug, warn};

use crate::data::def::{FieldDescriptor, SchemaGroup, lookup};
use crate::data::schema::{ACTION_SCHEMA, MENU_SCHEMA, PROFILE_SCHEMA};
use crate::data::BoxedData;
use crate::kernel::constants::{CURRENT_VERSION, CURRENT_VERSION_STR, LEGACY_PROFILE_ID, PROFILE_ID_PREFIX};
use crate::object::store::{ObjectId, ObjectStore};
use crate::provider::status::ProviderStatus;

/// The kinds of editable objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Menu,
    Action,
    Profile,
}

impl ObjectKind {
    /// Hook implementation of this kind
    pub fn hooks(&self) -> &'static dyn FactoryKind {
        match self {
            ObjectKind::Menu => &MenuKind,
            ObjectKind::Action => &ActionKind,
            ObjectKind::Profile => &ProfileKind,
        }
    }

    pub fn name(&self) -> &'static str {
        self.hooks().name()
    }

    pub fn schema_groups(&self) -> &'static [&'static SchemaGroup] {
        self.hooks().schema_groups()
    }

    /// Find a field of this kind by name
    pub fn lookup(&self, name: &str) -> Option<&'static FieldDescriptor> {
        lookup(self.schema_groups(), name)
    }

    /// Menus and actions hold children, profiles do not
    pub fn is_container(&self) -> bool {
        matches!(self, ObjectKind::Menu | ObjectKind::Action)
    }

    /// Name used as the `Type` of an item in storage
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Menu => "Menu",
            ObjectKind::Action => "Action",
            ObjectKind::Profile => "Profile",
        }
    }

    /// Parse a storage `Type` value
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Menu" => Some(ObjectKind::Menu),
            "Action" => Some(ObjectKind::Action),
            "Profile" => Some(ObjectKind::Profile),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind-specific behaviour plugged into the generic engine and driver
pub trait FactoryKind: Sync {
    fn name(&self) -> &'static str;

    fn schema_groups(&self) -> &'static [&'static SchemaGroup];

    /// Format version of the object, `None` when it does not state one
    fn get_version(&self, _store: &ObjectStore, _id: ObjectId) -> Option<u32> {
        Some(CURRENT_VERSION)
    }

    /// Whether an object of kind `child` may be a child of this kind
    fn allowed_child(&self, _child: ObjectKind) -> bool {
        false
    }

    /// Kind and identifier of the child synthesized to receive obsoleted fields
    fn legacy_child(&self) -> Option<(ObjectKind, &'static str)> {
        None
    }

    fn post_copy(&self, _store: &mut ObjectStore, _target: ObjectId, _source: ObjectId) {}

    /// Structural comparison run after every comparable field matched
    fn post_compare(&self, _store: &ObjectStore, _a: ObjectId, _b: ObjectId) -> bool {
        true
    }

    /// Kind-specific validity rules, run after every mandatory field passed
    fn is_valid(&self, _store: &ObjectStore, _id: ObjectId) -> bool {
        true
    }

    fn read_done(&self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) {}

    fn write_start(&self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        ProviderStatus::Ok
    }

    fn write_done(&self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        ProviderStatus::Ok
    }
}

/// Menus: identity + item + menu + conditions
pub struct MenuKind;

/// Actions: identity + item + action + action-v1 + conditions
pub struct ActionKind;

/// Profiles: identity + profile + conditions
pub struct ProfileKind;

impl FactoryKind for MenuKind {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn schema_groups(&self) -> &'static [&'static SchemaGroup] {
        &MENU_SCHEMA
    }

    fn allowed_child(&self, child: ObjectKind) -> bool {
        matches!(child, ObjectKind::Menu | ObjectKind::Action)
    }

    fn post_compare(&self, store: &ObjectStore, a: ObjectId, b: ObjectId) -> bool {
        children_are_equal(store, a, b)
    }

    fn is_valid(&self, store: &ObjectStore, id: ObjectId) -> bool {
        if store.string(id, "label").trim().is_empty() {
            debug!("menu {} is invalid: empty label", store.identifier(id));
            return false;
        }
        has_valid_child(store, id)
    }

    fn write_start(&self, store: &mut ObjectStore, id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        rebuild_items_list(store, id)
    }
}

impl FactoryKind for ActionKind {
    fn name(&self) -> &'static str {
        "action"
    }

    fn schema_groups(&self) -> &'static [&'static SchemaGroup] {
        &ACTION_SCHEMA
    }

    /// Major number of the `version` field ("2.0" is 2, "1" is 1)
    fn get_version(&self, store: &ObjectStore, id: ObjectId) -> Option<u32> {
        let value = store.get(id, "version")?;
        let text = value.data().as_str()?;
        text.trim().split('.').next()?.parse::<u32>().ok()
    }

    fn allowed_child(&self, child: ObjectKind) -> bool {
        child == ObjectKind::Profile
    }

    fn legacy_child(&self) -> Option<(ObjectKind, &'static str)> {
        Some((ObjectKind::Profile, LEGACY_PROFILE_ID))
    }

    // The allocation counter is runtime-only, but a copy must not hand out
    // profile ids its source already used.
    fn post_copy(&self, store: &mut ObjectStore, target: ObjectId, source: ObjectId) {
        let last = store.uint(source, "last-allocated");
        if let Err(e) = store.set(target, "last-allocated", BoxedData::UInt(last)) {
            debug!("unable to carry last-allocated over: {}", e);
        }
    }

    fn post_compare(&self, store: &ObjectStore, a: ObjectId, b: ObjectId) -> bool {
        children_are_equal(store, a, b)
    }

    fn is_valid(&self, store: &ObjectStore, id: ObjectId) -> bool {
        let label = store.string(id, "label");
        let targets_menu = store.boolean(id, "target-selection") || store.boolean(id, "target-location");
        if targets_menu && label.trim().is_empty() {
            debug!("action {} is invalid: empty label for a context menu target", store.identifier(id));
            return false;
        }
        if store.boolean(id, "target-toolbar") {
            let toolbar_label = if store.boolean(id, "toolbar-same-label") {
                label
            } else {
                store.string(id, "toolbar-label")
            };
            if toolbar_label.trim().is_empty() {
                debug!("action {} is invalid: empty toolbar label", store.identifier(id));
                return false;
            }
        }
        has_valid_child(store, id)
    }

    // Profiles named by the allocator must keep the counter ahead of them.
    fn read_done(&self, store: &mut ObjectStore, id: ObjectId, _messages: &mut Vec<String>) {
        let highest = store
            .children(id)
            .iter()
            .filter_map(|child| {
                store
                    .identifier(*child)
                    .strip_prefix(PROFILE_ID_PREFIX)
                    .and_then(|n| n.parse::<u32>().ok())
            })
            .max()
            .unwrap_or(0);
        if highest > store.uint(id, "last-allocated") {
            if let Err(e) = store.set(id, "last-allocated", BoxedData::UInt(highest)) {
                warn!("unable to record last-allocated on {}: {}", store.identifier(id), e);
            }
        }
    }

    fn write_start(&self, store: &mut ObjectStore, id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        if self.get_version(store, id).is_none_or(|version| version < CURRENT_VERSION) {
            let upgraded = store
                .set(id, "version", BoxedData::String(CURRENT_VERSION_STR.to_string()))
                .and_then(|_| store.set(id, "iversion", BoxedData::UInt(CURRENT_VERSION)));
            if upgraded.is_err() {
                return ProviderStatus::ProgramError;
            }
        }
        rebuild_items_list(store, id)
    }
}

impl FactoryKind for ProfileKind {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn schema_groups(&self) -> &'static [&'static SchemaGroup] {
        &PROFILE_SCHEMA
    }
}

/// Children compared positionally and recursively; order matters
fn children_are_equal(store: &ObjectStore, a: ObjectId, b: ObjectId) -> bool {
    let left = store.children(a);
    let right = store.children(b);
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(x, y)| store.are_equal(*x, *y))
}

/// An empty container is useless: at least one child must be valid
fn has_valid_child(store: &ObjectStore, id: ObjectId) -> bool {
    let valid = store.children(id).iter().any(|child| store.is_valid(*child));
    if !valid {
        debug!(
            "{} {} is invalid: no valid child",
            store.kind(id).map(|k| k.name()).unwrap_or("object"),
            store.identifier(id)
        );
    }
    valid
}

/// Refresh the serializable `items-list` from the live children
fn rebuild_items_list(store: &mut ObjectStore, id: ObjectId) -> ProviderStatus {
    let ids: Vec<String> = store
        .children(id)
        .iter()
        .map(|child| store.identifier(*child))
        .collect();
    match store.set(id, "items-list", BoxedData::StringList(ids)) {
        Ok(()) => ProviderStatus::Ok,
        Err(_) => ProviderStatus::ProgramError,
    }
}
