//! # FMA Core Factory Object Engine
//!
//! The generic get/set/copy/compare/validate engine. Every operation is
//! driven by the schema groups of the object's kind; nothing here knows a
//! concrete field except `id`, `label` and `subitems`.
//!
//! Absent fields are "unset": readers fall back to the descriptor default.
//! `get_or_default` materializes that default the first time it is asked for.
use std::cmp::Ordering;

use log::{debug, error, trace, warn};

use crate::data::boxed::{BoxedData, BoxedValue};
use crate::data::def::{FieldDescriptor, all_fields, position};
use crate::data::error::DataError;
use crate::object::kind::ObjectKind;
use crate::object::store::{FactoryObject, ObjectId, ObjectStore};

impl ObjectStore {
    /// Allocate a new, empty object of the given kind
    pub fn create(&mut self, kind: ObjectKind) -> ObjectId {
        let id = self.alloc(FactoryObject::new(kind));
        trace!("created {} {}", kind, id);
        id
    }

    /// Allocate a new object and set its `id` field
    pub fn create_with_id(&mut self, kind: ObjectKind, identifier: &str) -> ObjectId {
        let id = self.create(kind);
        if let Err(e) = self.set(id, "id", BoxedData::String(identifier.to_string())) {
            error!("unable to set the identifier of a new {}: {}", kind, e);
        }
        id
    }

    /// Free an object and, recursively, its children.
    ///
    /// The object is detached from its parent first. A private origin copy
    /// owned by the object is freed with it; a shared origin is left alone.
    pub fn dispose(&mut self, id: ObjectId) {
        if !self.contains(id) {
            error!("dispose: object {} is already disposed", id);
            return;
        }
        if let Some(parent) = self.parent(id) {
            let _ = self.remove_child(parent, id);
        }
        self.dispose_subtree(id);
    }

    fn dispose_subtree(&mut self, id: ObjectId) {
        for child in self.children(id) {
            if let Some(object) = self.object_mut(child) {
                object.parent = None;
            }
            self.dispose_subtree(child);
        }
        if let Some(object) = self.release(id) {
            if object.owns_origin {
                if let Some(origin) = object.origin.filter(|origin| self.contains(*origin)) {
                    self.dispose_subtree(origin);
                }
            }
        }
    }

    /// Descriptor of a field of the object's kind
    pub fn descriptor(&self, id: ObjectId, name: &str) -> Result<&'static FieldDescriptor, DataError> {
        let kind = self.kind(id).ok_or(DataError::DisposedObject)?;
        kind.lookup(name).ok_or_else(|| DataError::UnknownField {
            kind: kind.name().to_string(),
            name: name.to_string(),
        })
    }

    /// Materialized value of a field, `None` when unset
    pub fn get(&self, id: ObjectId, name: &str) -> Option<&BoxedValue> {
        self.object(id)?.fields.get(name)
    }

    /// Materialized value of a field, realizing its default on first access
    pub fn get_or_default(&mut self, id: ObjectId, name: &str) -> Option<&BoxedValue> {
        if self.get(id, name).is_none() {
            let def = self.descriptor(id, name).ok()?;
            let value = BoxedValue::from_default(def)?;
            trace!("realizing default of '{}' on {}", name, id);
            self.insert_value(id, value).ok()?;
        }
        self.get(id, name)
    }

    /// Effective payload of a field: the materialized value or the parsed
    /// default, without side effect
    pub fn data(&self, id: ObjectId, name: &str) -> Option<BoxedData> {
        match self.get(id, name) {
            Some(value) => Some(value.data().clone()),
            None => self.descriptor(id, name).ok()?.default_data(),
        }
    }

    /// String or localized string value, empty when unset
    pub fn string(&self, id: ObjectId, name: &str) -> String {
        self.data(id, name)
            .and_then(|data| data.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    pub fn boolean(&self, id: ObjectId, name: &str) -> bool {
        self.data(id, name).and_then(|data| data.as_bool()).unwrap_or(false)
    }

    pub fn string_list(&self, id: ObjectId, name: &str) -> Vec<String> {
        self.data(id, name)
            .and_then(|data| data.as_string_list().map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    pub fn uint(&self, id: ObjectId, name: &str) -> u32 {
        self.data(id, name).and_then(|data| data.as_uint()).unwrap_or(0)
    }

    pub fn uint_list(&self, id: ObjectId, name: &str) -> Vec<u32> {
        self.data(id, name)
            .and_then(|data| data.as_uint_list().map(<[u32]>::to_vec))
            .unwrap_or_default()
    }

    /// The `id` field
    pub fn identifier(&self, id: ObjectId) -> String {
        self.string(id, "id")
    }

    /// The `label` field
    pub fn label(&self, id: ObjectId) -> String {
        self.string(id, "label")
    }

    /// Set a field, creating its boxed value on first set
    pub fn set(&mut self, id: ObjectId, name: &str, data: BoxedData) -> Result<(), DataError> {
        let def = self.descriptor(id, name).inspect_err(|e| error!("set: {}", e))?;
        if let Some(object) = self.object_mut(id) {
            if let Some(value) = object.fields.get_mut(def.name) {
                return value.set_data(data).inspect_err(|e| error!("set: {}", e));
            }
        }
        let value = BoxedValue::with_data(def, data).inspect_err(|e| error!("set: {}", e))?;
        self.insert_value(id, value)
    }

    /// Attach an already built value; it replaces any previous value of the
    /// same field.
    ///
    /// The value's descriptor must belong to the object's kind.
    pub fn set_boxed(&mut self, id: ObjectId, value: BoxedValue) -> Result<(), DataError> {
        let def = self.descriptor(id, value.name())?;
        if def.id != value.def().id {
            error!("set_boxed: '{}' is not a field of this {}", value.name(), self.kind_name(id));
            return Err(DataError::UnknownField {
                kind: self.kind_name(id).to_string(),
                name: value.name().to_string(),
            });
        }
        self.insert_value(id, value)
    }

    /// Clear a field, returning its previous value
    pub fn unset(&mut self, id: ObjectId, name: &str) -> Option<BoxedValue> {
        self.object_mut(id)?.fields.shift_remove(name)
    }

    /// Insert or replace a value at its schema position
    fn insert_value(&mut self, id: ObjectId, value: BoxedValue) -> Result<(), DataError> {
        let kind = self.kind(id).ok_or(DataError::DisposedObject)?;
        let groups = kind.schema_groups();
        let object = self.object_mut(id).ok_or(DataError::DisposedObject)?;
        let name = value.name();
        if let Some(slot) = object.fields.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        let rank = position(groups, name).unwrap_or(usize::MAX);
        let index = object
            .fields
            .keys()
            .filter(|existing| position(groups, existing).unwrap_or(usize::MAX) < rank)
            .count();
        object.fields.shift_insert(index, name, value);
        Ok(())
    }

    /// Materialized values in schema order
    pub fn fields(&self, id: ObjectId) -> Vec<&BoxedValue> {
        self.object(id)
            .map(|object| object.fields.values().collect())
            .unwrap_or_default()
    }

    /// Visit every materialized value in schema order; the visitor returns
    /// `false` to stop the traversal
    pub fn iter_fields<F>(&self, id: ObjectId, mut visitor: F)
    where
        F: FnMut(&BoxedValue) -> bool,
    {
        if let Some(object) = self.object(id) {
            for value in object.fields.values() {
                if !visitor(value) {
                    break;
                }
            }
        }
    }

    /// Copy every copyable field of `source` into `target`.
    ///
    /// With `recursive`, children are duplicated and appended to `target`
    /// in order, replacing its previous children.
    pub fn copy(&mut self, target: ObjectId, source: ObjectId, recursive: bool) {
        let (Some(target_kind), Some(source_kind)) = (self.kind(target), self.kind(source)) else {
            error!("copy: {} or {} is disposed", target, source);
            return;
        };
        if target_kind != source_kind {
            error!("copy: cannot copy a {} into a {}", source_kind, target_kind);
            return;
        }

        // A field unset on the source ends up unset on the target too.
        let copies: Vec<(&'static str, Option<BoxedValue>)> = all_fields(target_kind.schema_groups())
            .filter(|def| def.copyable)
            .map(|def| (def.name, self.get(source, def.name).and_then(BoxedValue::copy)))
            .collect();
        for (name, value) in copies {
            match value {
                Some(value) => {
                    if let Err(e) = self.insert_value(target, value) {
                        warn!("copy: {}", e);
                    }
                }
                None => {
                    self.unset(target, name);
                }
            }
        }

        if recursive && target_kind.is_container() {
            for child in self.children(target) {
                self.dispose(child);
            }
            for child in self.children(source) {
                let Some(duplicate) = self.duplicate(child) else {
                    continue;
                };
                if let Err(e) = self.append_child(target, duplicate) {
                    warn!("copy: {}", e);
                    self.dispose(duplicate);
                }
            }
        }

        target_kind.hooks().post_copy(self, target, source);
    }

    /// Whether two objects are equal over every comparable field, then over
    /// their kind's structural comparison.
    ///
    /// An unset field compares through its default, so `enabled` unset equals
    /// `enabled = true`.
    pub fn are_equal(&self, a: ObjectId, b: ObjectId) -> bool {
        let (Some(kind_a), Some(kind_b)) = (self.kind(a), self.kind(b)) else {
            return false;
        };
        if kind_a != kind_b {
            return false;
        }
        for def in all_fields(kind_a.schema_groups()).filter(|def| def.comparable) {
            let equal = match (self.data(a, def.name), self.data(b, def.name)) {
                (Some(x), Some(y)) => x.compare(&y) == Ordering::Equal,
                (None, None) => true,
                _ => false,
            };
            if !equal {
                trace!("{} and {} differ on '{}'", a, b, def.name);
                return false;
            }
        }
        kind_a.hooks().post_compare(self, a, b)
    }

    /// Whether every mandatory field is valid and the kind's own rules pass
    pub fn is_valid(&self, id: ObjectId) -> bool {
        let Some(kind) = self.kind(id) else {
            return false;
        };
        for def in all_fields(kind.schema_groups()).filter(|def| def.mandatory) {
            let valid = match self.get(id, def.name) {
                Some(value) => value.is_valid(),
                None => BoxedValue::from_default(def).is_some_and(|value| value.is_valid()),
            };
            if !valid {
                debug!("{} {} is invalid: mandatory '{}' is empty", kind, self.identifier(id), def.name);
                return false;
            }
        }
        kind.hooks().is_valid(self, id)
    }

    fn kind_name(&self, id: ObjectId) -> &'static str {
        self.kind(id).map(|kind| kind.name()).unwrap_or("disposed object")
    }
}
