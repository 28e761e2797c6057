//! # FMA Core Origin Tracker
//!
//! Every editable object may record an origin: the clean twin it was last
//! read from or saved as. `modified` is always relative to that origin; an
//! object without one is always modified.
//!
//! `set_origin` records the same handle on a whole subtree. When a child
//! shares its parent's recorded origin, its own twin is the child at the same
//! position under the parent's twin (see [`ObjectStore::effective_origin`]).
use log::{debug, error};

use crate::object::store::{ObjectId, ObjectStore};

/// Memoized modification and validity flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub modified: bool,
    pub valid: bool,
}

impl ObjectStore {
    /// Deep, recursive copy of an object; the copy has no origin and no parent
    pub fn duplicate(&mut self, id: ObjectId) -> Option<ObjectId> {
        let Some(kind) = self.kind(id) else {
            error!("duplicate: object {} is disposed", id);
            return None;
        };
        let copy = self.create(kind);
        self.copy(copy, id, true);
        Some(copy)
    }

    /// Recorded origin of an object, if still alive
    pub fn get_origin(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id)?.origin.filter(|origin| self.contains(*origin))
    }

    /// Clean twin an object is compared with.
    ///
    /// A child recording the same origin as its parent resolves to the child
    /// at the same position under its parent's twin.
    pub fn effective_origin(&self, id: ObjectId) -> Option<ObjectId> {
        let recorded = self.object(id)?.origin?;
        if let Some(parent) = self.parent(id) {
            if self.object(parent).and_then(|p| p.origin) == Some(recorded) {
                let twin_parent = self.effective_origin(parent)?;
                let position = self.child_position(parent, id)?;
                return self.children(twin_parent).get(position).copied();
            }
        }
        Some(recorded).filter(|origin| self.contains(*origin))
    }

    /// Record `origin` on an object and every descendant.
    ///
    /// A private origin previously owned by the object is freed unless it is
    /// the one being recorded again.
    pub fn set_origin(&mut self, id: ObjectId, origin: Option<ObjectId>) {
        let Some(object) = self.object(id) else {
            error!("set_origin: object {} is disposed", id);
            return;
        };
        if object.owns_origin && object.origin != origin {
            if let Some(previous) = object.origin {
                self.release_owned_origin(id, previous);
            }
        }
        self.record_origin(id, origin);
    }

    fn record_origin(&mut self, id: ObjectId, origin: Option<ObjectId>) {
        if let Some(object) = self.object_mut(id) {
            object.origin = origin;
        }
        for child in self.children(id) {
            // Descendants now share the recorded origin; private twins go.
            let owned = self
                .object(child)
                .filter(|object| object.owns_origin)
                .and_then(|object| object.origin);
            match owned {
                Some(previous) if Some(previous) != origin => self.release_owned_origin(child, previous),
                _ => {
                    if let Some(object) = self.object_mut(child) {
                        object.owns_origin = false;
                    }
                }
            }
            self.record_origin(child, origin);
        }
    }

    fn release_owned_origin(&mut self, id: ObjectId, previous: ObjectId) {
        if let Some(object) = self.object_mut(id) {
            object.owns_origin = false;
            object.origin = None;
        }
        if self.contains(previous) {
            self.dispose(previous);
        }
    }

    /// Make `origin` the persisted twin of `id`, pairing children by
    /// position, and clear the origin of `origin` itself
    pub fn reset_origin(&mut self, id: ObjectId, origin: ObjectId) {
        if !self.contains(id) || !self.contains(origin) {
            error!("reset_origin: {} or {} is disposed", id, origin);
            return;
        }
        if let Some(previous) = self.object(id).filter(|o| o.owns_origin).and_then(|o| o.origin) {
            if previous != origin {
                self.release_owned_origin(id, previous);
            }
        }
        if let Some(object) = self.object_mut(origin) {
            object.origin = None;
        }
        if let Some(object) = self.object_mut(id) {
            object.origin = Some(origin);
        }
        let children = self.children(id);
        let twins = self.children(origin);
        for (child, twin) in children.into_iter().zip(twins) {
            self.reset_origin(child, twin);
        }
    }

    /// Recompute the modified and valid flags of an object, children first
    pub fn check_status(&mut self, id: ObjectId) -> Status {
        if !self.contains(id) {
            error!("check_status: object {} is disposed", id);
            return Status::default();
        }
        for child in self.children(id) {
            self.check_status(child);
        }
        let modified = match self.effective_origin(id) {
            Some(origin) => !self.are_equal(id, origin),
            None => true,
        };
        let valid = self.is_valid(id);
        if let Some(object) = self.object_mut(id) {
            object.modified = modified;
            object.valid = valid;
        }
        debug!("status of {}: modified={} valid={}", self.identifier(id), modified, valid);
        Status { modified, valid }
    }

    /// Last computed modified flag
    pub fn is_modified(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|object| object.modified)
    }

    /// Last computed validity flag
    pub fn is_valid_cached(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|object| object.valid)
    }

    /// Force the modified flag down on an object and its descendants
    pub fn reset_status(&mut self, id: ObjectId) {
        let Some(object) = self.object_mut(id) else {
            error!("reset_status: object {} is disposed", id);
            return;
        };
        object.modified = false;
        for child in self.children(id) {
            self.reset_status(child);
        }
    }

    /// Record a fresh private deep copy as the origin and recompute status
    pub fn seed_origin(&mut self, id: ObjectId) {
        if !self.contains(id) {
            error!("seed_origin: object {} is disposed", id);
            return;
        }
        let Some(twin) = self.duplicate(id) else {
            return;
        };
        self.set_origin(id, Some(twin));
        if let Some(object) = self.object_mut(id) {
            object.owns_origin = true;
        }
        self.check_status(id);
    }

    /// After a successful save: the current state becomes the new origin.
    ///
    /// An item that still pairs with a twin under its parent's origin is
    /// copied into that twin, so the parent stays clean.
    pub fn commit(&mut self, id: ObjectId) {
        let Some((twin, recorded)) = self.twin_under_parent(id) else {
            self.seed_origin(id);
            return;
        };
        self.copy(twin, id, true);
        self.set_origin(id, Some(recorded));
        let root = self.root_of(id);
        self.check_status(root);
    }

    /// Positional twin of `id` below its parent's twin, along with the origin
    /// the parent records
    fn twin_under_parent(&self, id: ObjectId) -> Option<(ObjectId, ObjectId)> {
        let parent = self.parent(id)?;
        let recorded = self.get_origin(parent)?;
        let parent_twin = self.effective_origin(parent)?;
        let position = self.child_position(parent, id)?;
        let twin = self.children(parent_twin).get(position).copied()?;
        let paired = self.kind(twin) == self.kind(id) && self.identifier(twin) == self.identifier(id);
        paired.then_some((twin, recorded))
    }

    /// Restore the values of the origin, children included
    pub fn revert(&mut self, id: ObjectId) {
        let Some(origin) = self.effective_origin(id) else {
            debug!("revert: {} has no origin", id);
            return;
        };
        self.copy(id, origin, true);
        let owned = self.object(id).is_some_and(|object| object.owns_origin);
        if owned {
            self.record_origin(id, Some(origin));
        } else {
            self.set_origin(id, Some(origin));
        }
        self.check_status(id);
    }
}
