//! Elementary boxed types and their behaviour table.
//!
//! Every component above this module is type-agnostic: whenever it needs to
//! parse, print, compare or test a value it goes through [`type_info`].
//! Adding a new elementary type means adding a [`BoxedType`] variant, a
//! [`BoxedData`] variant and one row in [`TYPE_TABLE`].
use std::cmp::Ordering;
use std::fmt;

use log::error;

use crate::data::boxed::BoxedData;
use crate::data::def::FieldDescriptor;
use crate::data::error::DataError;

/// Elementary type of a boxed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxedType {
    /// Plain UTF-8 string
    String,
    /// String which a backend may store per locale
    LocaleString,
    /// Boolean flag
    Bool,
    /// Ordered list of strings
    StringList,
    /// Non-owning handles to other objects
    Pointer,
    /// Unsigned integer
    UInt,
    /// Ordered list of unsigned integers
    UIntList,
}

impl BoxedType {
    /// Canonical name of the type, as used in dumps and documents
    pub fn name(&self) -> &'static str {
        type_info(*self).map(|info| info.name).unwrap_or("unknown")
    }

    /// Resolve a canonical type name
    pub fn from_name(name: &str) -> Result<Self, DataError> {
        TYPE_TABLE
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.kind)
            .ok_or_else(|| {
                error!("Unknown boxed type name: {}", name);
                DataError::UnknownType(name.to_string())
            })
    }

    /// Whether the type holds a list
    pub fn is_list(&self) -> bool {
        matches!(self, BoxedType::StringList | BoxedType::UIntList)
    }
}

impl fmt::Display for BoxedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Property description derived from a field descriptor, for UI binding and
/// schema dumps
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub label: &'static str,
    pub type_name: &'static str,
    pub default: Option<BoxedData>,
    pub writable: bool,
}

/// One row of the behaviour table
pub struct TypeInfo {
    pub kind: BoxedType,
    pub name: &'static str,
    /// Whether a value of this type can be deep-copied generically
    pub copyable: bool,
    /// Whether a default value is meaningful for this type
    pub has_default: bool,
    pub empty: fn() -> BoxedData,
    pub parse: fn(&str, &str) -> Option<BoxedData>,
    pub format: fn(&BoxedData, &str) -> String,
    pub compare: fn(&BoxedData, &BoxedData) -> Ordering,
    pub is_empty: fn(&BoxedData) -> bool,
    pub spec: fn(&'static FieldDescriptor) -> PropertySpec,
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

/// The behaviour table, one row per elementary type
pub static TYPE_TABLE: &[TypeInfo] = &[
    TypeInfo {
        kind: BoxedType::String,
        name: "string",
        copyable: true,
        has_default: true,
        empty: || BoxedData::String(String::new()),
        parse: |text, _| Some(BoxedData::String(text.to_string())),
        format: format_value,
        compare: compare_same,
        is_empty: is_empty_value,
        spec: default_spec,
    },
    TypeInfo {
        kind: BoxedType::LocaleString,
        name: "locale",
        copyable: true,
        has_default: true,
        empty: || BoxedData::LocaleString(String::new()),
        parse: |text, _| Some(BoxedData::LocaleString(text.to_string())),
        format: format_value,
        compare: compare_same,
        is_empty: is_empty_value,
        spec: default_spec,
    },
    TypeInfo {
        kind: BoxedType::Bool,
        name: "bool",
        copyable: true,
        has_default: true,
        empty: || BoxedData::Bool(false),
        parse: |text, _| parse_bool(text).map(BoxedData::Bool),
        format: format_value,
        compare: compare_same,
        is_empty: |_| false,
        spec: default_spec,
    },
    TypeInfo {
        kind: BoxedType::StringList,
        name: "string-list",
        copyable: true,
        has_default: true,
        empty: || BoxedData::StringList(Vec::new()),
        parse: |text, sep| {
            Some(BoxedData::StringList(
                split_list(text, sep).into_iter().map(str::to_string).collect(),
            ))
        },
        format: format_value,
        compare: compare_same,
        is_empty: is_empty_value,
        spec: default_spec,
    },
    TypeInfo {
        kind: BoxedType::Pointer,
        name: "pointer",
        copyable: false,
        has_default: false,
        empty: || BoxedData::Pointer(Vec::new()),
        parse: |_, _| None,
        format: format_value,
        compare: compare_same,
        is_empty: is_empty_value,
        spec: |def| PropertySpec {
            name: def.name,
            label: def.label,
            type_name: "pointer",
            default: None,
            writable: false,
        },
    },
    TypeInfo {
        kind: BoxedType::UInt,
        name: "uint",
        copyable: true,
        has_default: true,
        empty: || BoxedData::UInt(0),
        parse: |text, _| text.trim().parse::<u32>().ok().map(BoxedData::UInt),
        format: format_value,
        compare: compare_same,
        is_empty: |_| false,
        spec: default_spec,
    },
    TypeInfo {
        kind: BoxedType::UIntList,
        name: "uint-list",
        copyable: true,
        has_default: true,
        empty: || BoxedData::UIntList(Vec::new()),
        parse: |text, sep| {
            split_list(text, sep)
                .into_iter()
                .map(|item| item.parse::<u32>().ok())
                .collect::<Option<Vec<_>>>()
                .map(BoxedData::UIntList)
        },
        format: format_value,
        compare: compare_same,
        is_empty: is_empty_value,
        spec: default_spec,
    },
];

/// Look up the behaviour row of a type.
///
/// A miss is a programming error: it is logged and the caller degrades to
/// none/false.
pub fn type_info(kind: BoxedType) -> Option<&'static TypeInfo> {
    let found = TYPE_TABLE.iter().find(|info| info.kind == kind);
    if found.is_none() {
        error!("{}", DataError::UnknownType(format!("{:?}", kind)));
    }
    found
}

/// Parse a boolean the way configuration files spell it
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Split a flat list string, trimming items and ignoring a trailing separator
fn split_list<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let trimmed = text.trim();
    if sep.is_empty() {
        return if trimmed.is_empty() { Vec::new() } else { vec![trimmed] };
    }
    let body = trimmed.strip_suffix(sep).unwrap_or(trimmed);
    if body.is_empty() {
        return Vec::new();
    }
    body.split(sep).map(str::trim).collect()
}

fn format_value(data: &BoxedData, sep: &str) -> String {
    match data {
        BoxedData::String(s) | BoxedData::LocaleString(s) => s.clone(),
        BoxedData::Bool(b) => b.to_string(),
        BoxedData::UInt(u) => u.to_string(),
        BoxedData::StringList(items) => items.join(sep),
        BoxedData::UIntList(items) => items
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(sep),
        BoxedData::Pointer(handles) => format!("<{} handle(s)>", handles.len()),
    }
}

fn compare_same(a: &BoxedData, b: &BoxedData) -> Ordering {
    match (a, b) {
        (BoxedData::String(x), BoxedData::String(y))
        | (BoxedData::LocaleString(x), BoxedData::LocaleString(y)) => x.cmp(y),
        (BoxedData::Bool(x), BoxedData::Bool(y)) => x.cmp(y),
        (BoxedData::StringList(x), BoxedData::StringList(y)) => x.cmp(y),
        (BoxedData::Pointer(x), BoxedData::Pointer(y)) => x.cmp(y),
        (BoxedData::UInt(x), BoxedData::UInt(y)) => x.cmp(y),
        (BoxedData::UIntList(x), BoxedData::UIntList(y)) => x.cmp(y),
        _ => {
            error!(
                "Comparing boxed values of different types: {} vs {}",
                a.kind(),
                b.kind()
            );
            a.kind().name().cmp(b.kind().name())
        }
    }
}

fn is_empty_value(data: &BoxedData) -> bool {
    match data {
        BoxedData::String(s) | BoxedData::LocaleString(s) => s.is_empty(),
        BoxedData::StringList(items) => items.is_empty(),
        BoxedData::Pointer(handles) => handles.is_empty(),
        BoxedData::UIntList(items) => items.is_empty(),
        BoxedData::Bool(_) | BoxedData::UInt(_) => false,
    }
}

fn default_spec(def: &'static FieldDescriptor) -> PropertySpec {
    PropertySpec {
        name: def.name,
        label: def.label,
        type_name: def.kind.name(),
        default: def.default_data(),
        writable: true,
    }
}
