//! Boxed values: one elementary typed value bound to its field descriptor.
use std::cmp::Ordering;
use std::fmt;

use log::{error, warn};

use crate::data::def::FieldDescriptor;
use crate::data::error::DataError;
use crate::data::types::{BoxedType, type_info};
use crate::kernel::constants::LIST_SEPARATOR;
use crate::object::ObjectId;

/// Payload of a boxed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxedData {
    String(String),
    LocaleString(String),
    Bool(bool),
    StringList(Vec<String>),
    /// Non-owning handles; an empty vector stands for "null"
    Pointer(Vec<ObjectId>),
    UInt(u32),
    UIntList(Vec<u32>),
}

impl BoxedData {
    /// Elementary type of this payload
    pub fn kind(&self) -> BoxedType {
        match self {
            BoxedData::String(_) => BoxedType::String,
            BoxedData::LocaleString(_) => BoxedType::LocaleString,
            BoxedData::Bool(_) => BoxedType::Bool,
            BoxedData::StringList(_) => BoxedType::StringList,
            BoxedData::Pointer(_) => BoxedType::Pointer,
            BoxedData::UInt(_) => BoxedType::UInt,
            BoxedData::UIntList(_) => BoxedType::UIntList,
        }
    }

    /// The empty value of a type (empty string, false, empty list, 0)
    pub fn empty(kind: BoxedType) -> Option<Self> {
        type_info(kind).map(|info| (info.empty)())
    }

    /// Parse a flat string into a typed payload.
    ///
    /// List types are split on `separator`. Returns `None` when the text does
    /// not parse for this type, and always for pointers.
    pub fn from_string(kind: BoxedType, text: &str, separator: &str) -> Option<Self> {
        let parsed = type_info(kind).and_then(|info| (info.parse)(text, separator));
        if parsed.is_none() && kind != BoxedType::Pointer {
            warn!("Unable to parse '{}' as {}", text, kind);
        }
        parsed
    }

    /// Flat string form, lists joined with `separator`
    pub fn to_string_with(&self, separator: &str) -> String {
        type_info(self.kind())
            .map(|info| (info.format)(self, separator))
            .unwrap_or_default()
    }

    /// Flat string form, lists joined with the default separator.
    ///
    /// `from_string(kind, &data.to_display_string(), LIST_SEPARATOR)` yields
    /// an equal payload for every parseable type.
    pub fn to_display_string(&self) -> String {
        self.to_string_with(LIST_SEPARATOR)
    }

    /// Type-specific ordering
    pub fn compare(&self, other: &BoxedData) -> Ordering {
        type_info(self.kind())
            .map(|info| (info.compare)(self, other))
            .unwrap_or(Ordering::Less)
    }

    /// Whether the payload is empty (string or list without content, null pointer)
    pub fn is_empty(&self) -> bool {
        type_info(self.kind())
            .map(|info| (info.is_empty)(self))
            .unwrap_or(true)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BoxedData::String(s) | BoxedData::LocaleString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BoxedData::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            BoxedData::UInt(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            BoxedData::StringList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_uint_list(&self) -> Option<&[u32]> {
        match self {
            BoxedData::UIntList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_pointers(&self) -> Option<&[ObjectId]> {
        match self {
            BoxedData::Pointer(handles) => Some(handles),
            _ => None,
        }
    }
}

impl fmt::Display for BoxedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// An elementary typed value attached to an object and addressed by the
/// name of its field descriptor.
///
/// The type never changes after creation. `BoxedValue` is deliberately not
/// `Clone`: pointer payloads cannot be deep-copied, use [`BoxedValue::copy`].
#[derive(Debug, PartialEq)]
pub struct BoxedValue {
    def: &'static FieldDescriptor,
    data: BoxedData,
}

impl BoxedValue {
    /// Create the empty value of a field
    pub fn new(def: &'static FieldDescriptor) -> Self {
        let data = BoxedData::empty(def.kind).unwrap_or(BoxedData::String(String::new()));
        Self { def, data }
    }

    /// Bind a payload to a field, checking the types agree
    pub fn with_data(def: &'static FieldDescriptor, data: BoxedData) -> Result<Self, DataError> {
        if data.kind() != def.kind {
            return Err(DataError::TypeMismatch {
                field: def.name.to_string(),
                expected: def.kind,
                actual: data.kind(),
            });
        }
        Ok(Self { def, data })
    }

    /// Create a value holding the field's default, if the type has one
    pub fn from_default(def: &'static FieldDescriptor) -> Option<Self> {
        def.default_data().map(|data| Self { def, data })
    }

    /// Parse a flat string into a value of the field's type
    pub fn from_string(def: &'static FieldDescriptor, text: &str, separator: &str) -> Option<Self> {
        BoxedData::from_string(def.kind, text, separator).map(|data| Self { def, data })
    }

    pub fn def(&self) -> &'static FieldDescriptor {
        self.def
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn kind(&self) -> BoxedType {
        self.def.kind
    }

    pub fn data(&self) -> &BoxedData {
        &self.data
    }

    pub fn into_data(self) -> BoxedData {
        self.data
    }

    /// Replace the payload; the new payload must have the same type
    pub fn set_data(&mut self, data: BoxedData) -> Result<(), DataError> {
        if data.kind() != self.def.kind {
            return Err(DataError::TypeMismatch {
                field: self.def.name.to_string(),
                expected: self.def.kind,
                actual: data.kind(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// Re-bind the value to another descriptor of the identical type.
    ///
    /// Used when a value moves from an obsoleted field to its current
    /// counterpart.
    pub fn set_def(&mut self, def: &'static FieldDescriptor) -> Result<(), DataError> {
        if def.kind != self.def.kind {
            error!(
                "Refusing to re-bind '{}' ({}) to '{}' ({})",
                self.def.name, self.def.kind, def.name, def.kind
            );
            return Err(DataError::TypeMismatch {
                field: def.name.to_string(),
                expected: def.kind,
                actual: self.def.kind,
            });
        }
        self.def = def;
        Ok(())
    }

    /// Deep copy. Pointer values cannot be copied generically: this warns and
    /// returns `None`.
    pub fn copy(&self) -> Option<BoxedValue> {
        match type_info(self.def.kind) {
            Some(info) if info.copyable => Some(Self {
                def: self.def,
                data: self.data.clone(),
            }),
            Some(_) => {
                warn!("Field '{}' holds object handles which cannot be deep-copied", self.def.name);
                None
            }
            None => None,
        }
    }

    /// Type-specific ordering against another value
    pub fn compare(&self, other: &BoxedValue) -> Ordering {
        self.data.compare(&other.data)
    }

    /// Whether the value equals the field's default.
    ///
    /// Pointers are never default. A field without a default is at its
    /// default when the value is empty.
    pub fn is_default(&self) -> bool {
        match type_info(self.def.kind) {
            Some(info) if !info.has_default => false,
            Some(_) => match self.def.default_data() {
                Some(default) => self.data.compare(&default) == Ordering::Equal,
                None => self.data.is_empty(),
            },
            None => false,
        }
    }

    /// Whether the value satisfies its descriptor.
    ///
    /// Only mandatory fields can be invalid: an empty string or list, or a
    /// null pointer.
    pub fn is_valid(&self) -> bool {
        if !self.def.mandatory {
            return true;
        }
        match self.def.kind {
            BoxedType::Bool | BoxedType::UInt => true,
            _ => !self.data.is_empty(),
        }
    }

    pub fn to_display_string(&self) -> String {
        self.data.to_display_string()
    }
}
