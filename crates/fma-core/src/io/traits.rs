use crate::object::store::{ObjectId, ObjectStore};
use crate::provider::status::ProviderStatus;
use crate::provider::traits::FactoryProvider;

/// A factory provider that also manages whole items in its storage
pub trait IoProvider: FactoryProvider {
    /// Unique id of this provider instance
    fn id(&self) -> &str;

    /// Whether the provider should be read at all
    fn is_willing_to_read(&self) -> bool {
        true
    }

    /// Read every item of the storage into the store.
    ///
    /// Returns the top-level items (menus and actions) in storage order;
    /// profiles are already attached to their action.
    fn read_items(&mut self, store: &mut ObjectStore, messages: &mut Vec<String>) -> Vec<ObjectId>;

    /// Write one menu or action, profiles included
    fn write_item(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus;

    /// Remove one item from the storage
    fn delete_item(&mut self, store: &ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus;
}
