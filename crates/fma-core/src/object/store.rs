//! Arena owning every factory object.
//!
//! Parent, child and origin relations are lookups by [`ObjectId`], never
//! ownership. Freeing a slot bumps its generation so that stale handles are
//! detected instead of aliasing a newer object.
use std::fmt;

use indexmap::IndexMap;

use crate::data::boxed::BoxedValue;
use crate::object::kind::ObjectKind;

/// Generational handle of an object in an [`ObjectStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// One editable object: its kind, its materialized fields in schema order,
/// and its tree and origin bookkeeping
#[derive(Debug)]
pub struct FactoryObject {
    pub(crate) kind: ObjectKind,
    pub(crate) fields: IndexMap<&'static str, BoxedValue>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) origin: Option<ObjectId>,
    /// Whether `origin` is a private copy owned by this object
    pub(crate) owns_origin: bool,
    pub(crate) modified: bool,
    pub(crate) valid: bool,
}

impl FactoryObject {
    pub(crate) fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            fields: IndexMap::new(),
            parent: None,
            origin: None,
            owns_origin: false,
            modified: true,
            valid: false,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Number of materialized fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<FactoryObject>,
}

/// Arena of factory objects for one editing session
#[derive(Debug, Default)]
pub struct ObjectStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, object: FactoryObject) -> ObjectId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            return ObjectId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            object: Some(object),
        });
        ObjectId { index, generation: 0 }
    }

    /// Release a slot; later lookups of `id` resolve to `None`
    pub(crate) fn release(&mut self, id: ObjectId) -> Option<FactoryObject> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(object)
    }

    /// Whether `id` designates a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.object(id).is_some()
    }

    pub fn object(&self, id: ObjectId) -> Option<&FactoryObject> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut FactoryObject> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_mut())
    }

    pub fn kind(&self, id: ObjectId) -> Option<ObjectKind> {
        self.object(id).map(|object| object.kind)
    }

    /// Number of live objects, origin twins included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
