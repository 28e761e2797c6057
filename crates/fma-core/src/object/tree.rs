//! # FMA Core Object Tree
//!
//! Ordered parent/child relations: a menu holds menus and actions, an action
//! holds profiles. The ordered children live in the `subitems` pointer field
//! of the container; the parent is a plain back-reference on the child.
use log::{debug, warn};

use crate::data::boxed::BoxedData;
use crate::kernel::constants::PROFILE_ID_PREFIX;
use crate::object::error::TreeError;
use crate::object::kind::ObjectKind;
use crate::object::store::{ObjectId, ObjectStore};

/// Number of items of each kind in a set of trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemCounts {
    pub menus: usize,
    pub actions: usize,
    pub profiles: usize,
}

impl ItemCounts {
    pub fn total(&self) -> usize {
        self.menus + self.actions + self.profiles
    }
}

impl ObjectStore {
    /// Ordered children of a container; empty for profiles
    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.get(id, "subitems")
            .and_then(|value| value.data().as_pointers().map(<[ObjectId]>::to_vec))
            .unwrap_or_default()
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id).and_then(|object| object.parent)
    }

    /// Topmost ancestor of an object
    pub fn root_of(&self, id: ObjectId) -> ObjectId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn append_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), TreeError> {
        self.insert_child_at(parent, child, usize::MAX)
    }

    /// Insert a child at a position, clamped to the end of the list.
    ///
    /// A child that already has a parent is detached from it first.
    pub fn insert_child_at(&mut self, parent: ObjectId, child: ObjectId, position: usize) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        if let Some(previous) = self.parent(child) {
            self.remove_child(previous, child)?;
        }
        let mut children = self.children(parent);
        let position = position.min(children.len());
        children.insert(position, child);
        self.set_children(parent, children)?;
        if let Some(object) = self.object_mut(child) {
            object.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach a child from its parent without disposing it
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), TreeError> {
        let mut children = self.children(parent);
        let Some(position) = children.iter().position(|c| *c == child) else {
            warn!("remove_child: {} is not a child of {}", child, parent);
            return Err(TreeError::NotAChild { parent, child });
        };
        children.remove(position);
        self.set_children(parent, children)?;
        if let Some(object) = self.object_mut(child) {
            object.parent = None;
        }
        Ok(())
    }

    /// Move a child to a new position among its siblings, clamped to the end
    pub fn move_child(&mut self, parent: ObjectId, child: ObjectId, new_position: usize) -> Result<(), TreeError> {
        let mut children = self.children(parent);
        let Some(position) = children.iter().position(|c| *c == child) else {
            return Err(TreeError::NotAChild { parent, child });
        };
        children.remove(position);
        let new_position = new_position.min(children.len());
        children.insert(new_position, child);
        self.set_children(parent, children)
    }

    pub fn child_position(&self, parent: ObjectId, child: ObjectId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// Replace the whole children list of a container
    pub(crate) fn set_children(&mut self, parent: ObjectId, children: Vec<ObjectId>) -> Result<(), TreeError> {
        self.set(parent, "subitems", BoxedData::Pointer(children))
            .map_err(|_| TreeError::DisposedObject(parent))
    }

    /// Count the items of a set of trees, descending into children when
    /// `recursive`
    pub fn count_items(&self, roots: &[ObjectId], recursive: bool) -> ItemCounts {
        let mut counts = ItemCounts::default();
        for root in roots {
            self.count_into(*root, recursive, &mut counts);
        }
        counts
    }

    fn count_into(&self, id: ObjectId, recursive: bool, counts: &mut ItemCounts) {
        match self.kind(id) {
            Some(ObjectKind::Menu) => counts.menus += 1,
            Some(ObjectKind::Action) => counts.actions += 1,
            Some(ObjectKind::Profile) => counts.profiles += 1,
            None => return,
        }
        if recursive {
            for child in self.children(id) {
                self.count_into(child, recursive, counts);
            }
        }
    }

    /// Find an object by its `id` field, searching the trees depth first
    pub fn find_by_id(&self, roots: &[ObjectId], identifier: &str) -> Option<ObjectId> {
        roots.iter().find_map(|root| {
            if self.identifier(*root) == identifier {
                Some(*root)
            } else {
                self.find_by_id(&self.children(*root), identifier)
            }
        })
    }

    /// Create a new profile under an action, named `profile-<n>` from the
    /// action's allocation counter
    pub fn new_profile(&mut self, action: ObjectId) -> Result<ObjectId, TreeError> {
        match self.kind(action) {
            Some(ObjectKind::Action) => {}
            Some(kind) => {
                return Err(TreeError::InvalidParent {
                    parent: kind.name().to_string(),
                    child: ObjectKind::Profile.name().to_string(),
                });
            }
            None => return Err(TreeError::DisposedObject(action)),
        }
        let siblings: Vec<String> = self.children(action).iter().map(|c| self.identifier(*c)).collect();
        let mut number = self.uint(action, "last-allocated");
        let identifier = loop {
            number += 1;
            let candidate = format!("{}{}", PROFILE_ID_PREFIX, number);
            if !siblings.contains(&candidate) {
                break candidate;
            }
        };
        self.set(action, "last-allocated", BoxedData::UInt(number))
            .map_err(|_| TreeError::DisposedObject(action))?;
        let profile = self.create_with_id(ObjectKind::Profile, &identifier);
        self.append_child(action, profile)?;
        debug!("allocated {} under {}", identifier, self.identifier(action));
        Ok(profile)
    }

    fn check_attach(&self, parent: ObjectId, child: ObjectId) -> Result<(), TreeError> {
        let parent_kind = self.kind(parent).ok_or(TreeError::DisposedObject(parent))?;
        let child_kind = self.kind(child).ok_or(TreeError::DisposedObject(child))?;
        if !parent_kind.hooks().allowed_child(child_kind) {
            return Err(TreeError::InvalidParent {
                parent: parent_kind.name().to_string(),
                child: child_kind.name().to_string(),
            });
        }
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(TreeError::Cycle { parent, child });
            }
            ancestor = self.parent(current);
        }
        Ok(())
    }
}
