//! Field descriptors and schema groups.
//!
//! Descriptors are immutable `'static` rows. Once published, a descriptor's
//! `id` and `name` never change: new fields get new rows with new ids.
use log::debug;

use crate::data::boxed::BoxedData;
use crate::data::types::{BoxedType, PropertySpec, type_info};
use crate::kernel::constants::LIST_SEPARATOR;

/// Schema entry describing one named field
#[derive(Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Stable numeric key
    pub id: u32,
    /// Canonical name, the public get/set handle
    pub name: &'static str,
    pub kind: BoxedType,
    /// Short human readable label
    pub label: &'static str,
    /// Default in string form, parsed lazily
    pub default: Option<&'static str>,
    pub serializable: bool,
    pub copyable: bool,
    pub comparable: bool,
    pub mandatory: bool,
    pub localizable: bool,
    pub obsoleted: bool,
    /// Key in key-tree and document backends; `None` when not representable
    pub tree_key: Option<&'static str>,
    /// Key in desktop-entry backends; `None` when not representable
    pub desktop_key: Option<&'static str>,
    /// For an obsoleted field, the current field receiving its value
    pub counterpart: Option<&'static str>,
}

impl FieldDescriptor {
    /// A serializable, copyable, comparable field with no storage key yet
    pub const fn new(id: u32, name: &'static str, kind: BoxedType) -> Self {
        Self {
            id,
            name,
            kind,
            label: name,
            default: None,
            serializable: true,
            copyable: true,
            comparable: true,
            mandatory: false,
            localizable: false,
            obsoleted: false,
            tree_key: None,
            desktop_key: None,
            counterpart: None,
        }
    }

    pub const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub const fn default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn tree(mut self, key: &'static str) -> Self {
        self.tree_key = Some(key);
        self
    }

    pub const fn desktop(mut self, key: &'static str) -> Self {
        self.desktop_key = Some(key);
        self
    }

    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub const fn localizable(mut self) -> Self {
        self.localizable = true;
        self
    }

    /// Runtime-only field: never serialized, copied or compared
    pub const fn runtime(mut self) -> Self {
        self.serializable = false;
        self.copyable = false;
        self.comparable = false;
        self
    }

    pub const fn not_serializable(mut self) -> Self {
        self.serializable = false;
        self
    }

    pub const fn not_comparable(mut self) -> Self {
        self.comparable = false;
        self
    }

    /// Field retired at this level, whose value moves to `counterpart`
    pub const fn obsoleted(mut self, counterpart: &'static str) -> Self {
        self.obsoleted = true;
        self.counterpart = Some(counterpart);
        self
    }

    /// Parsed default value.
    ///
    /// Pointers have no default. Other types without an explicit default
    /// default to their empty value.
    pub fn default_data(&self) -> Option<BoxedData> {
        let info = type_info(self.kind)?;
        if !info.has_default {
            return None;
        }
        match self.default {
            Some(text) => BoxedData::from_string(self.kind, text, LIST_SEPARATOR),
            None => Some((info.empty)()),
        }
    }

    /// Property description for UI binding and dumps
    pub fn property_spec(&'static self) -> Option<PropertySpec> {
        type_info(self.kind).map(|info| (info.spec)(self))
    }
}

/// Named, ordered set of field descriptors shared by one or more kinds
#[derive(Debug)]
pub struct SchemaGroup {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
    /// First object version this group applies to
    pub since: u32,
    /// First object version this group no longer applies to
    pub until: Option<u32>,
}

impl SchemaGroup {
    /// Whether the group applies to an object of the given version
    pub fn applies_to(&self, version: u32) -> bool {
        version >= self.since && self.until.is_none_or(|until| version < until)
    }

    /// Find a field of this group by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|def| def.name == name)
    }
}

/// Find a field by name in an ordered list of groups
pub fn lookup(groups: &[&'static SchemaGroup], name: &str) -> Option<&'static FieldDescriptor> {
    let found = groups.iter().find_map(|group| group.field(name));
    if found.is_none() {
        debug!("Field '{}' not found in groups {:?}", name, group_names(groups));
    }
    found
}

/// Position of a field in the concatenation of the groups
pub fn position(groups: &[&'static SchemaGroup], name: &str) -> Option<usize> {
    groups
        .iter()
        .flat_map(|group| group.fields.iter())
        .position(|def| def.name == name)
}

/// Iterate every field of the groups in order
pub fn all_fields<'a>(groups: &'a [&'static SchemaGroup]) -> impl Iterator<Item = &'static FieldDescriptor> + 'a {
    groups.iter().flat_map(|group| group.fields.iter())
}

fn group_names(groups: &[&'static SchemaGroup]) -> Vec<&'static str> {
    groups.iter().map(|group| group.name).collect()
}
