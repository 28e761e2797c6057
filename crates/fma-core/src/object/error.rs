//! # FMA Core Object Tree Errors
use thiserror::Error;

use crate::object::store::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("A {child} cannot be a child of a {parent}")]
    InvalidParent { parent: String, child: String },

    #[error("Attaching {child} under {parent} would create a cycle")]
    Cycle { parent: ObjectId, child: ObjectId },

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: ObjectId, child: ObjectId },

    #[error("Object {0} is stale or was never allocated")]
    DisposedObject(ObjectId),
}
