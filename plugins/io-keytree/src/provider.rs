//! The key-tree io-provider.
use std::path::PathBuf;
use std::sync::Arc;

use fma_core::kernel::constants::KEYTREE_ROOT;
use fma_core::kernel::error::Result;
use fma_core::{
    BoxedValue, FactoryProvider, FieldDescriptor, IoProvider, ObjectId, ObjectKind, ObjectStore, ProviderStatus,
    StorageProvider, read_item, write_item,
};
use log::{debug, error, info, warn};

use crate::tree::{Entry, KeyTree};

/// Key holding the item type under each item directory
const TYPE_KEY: &str = "type";

/// Menus and actions kept in a [`KeyTree`] file
pub struct KeyTreeProvider {
    id: String,
    storage: Arc<dyn StorageProvider>,
    file: PathBuf,
    tree: KeyTree,
    /// Mandatory trees are administrator-provided and never written
    mandatory: bool,
}

impl KeyTreeProvider {
    /// Open the tree stored at `file` (relative to the storage root)
    pub fn new(id: impl Into<String>, storage: Arc<dyn StorageProvider>, file: PathBuf) -> Result<Self> {
        let tree = KeyTree::load(storage.as_ref(), &file)?;
        let id = id.into();
        debug!("key-tree '{}' opened {} with {} entries", id, file.display(), tree.len());
        Ok(Self {
            id,
            storage,
            file,
            tree,
            mandatory: false,
        })
    }

    /// Mark the tree as mandatory: readable, never written
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn tree(&self) -> &KeyTree {
        &self.tree
    }

    /// Directory of an item, or of a profile below its action
    fn dir_of(store: &ObjectStore, id: ObjectId) -> String {
        match (store.kind(id), store.parent(id)) {
            (Some(ObjectKind::Profile), Some(action)) => format!(
                "{}/{}/{}",
                KEYTREE_ROOT,
                store.identifier(action),
                store.identifier(id)
            ),
            _ => format!("{}/{}", KEYTREE_ROOT, store.identifier(id)),
        }
    }

    fn persist(&self) -> ProviderStatus {
        match self.tree.save(self.storage.as_ref(), &self.file) {
            Ok(()) => ProviderStatus::Ok,
            Err(e) => {
                error!("key-tree '{}' cannot be saved: {}", self.id, e);
                ProviderStatus::WriteError
            }
        }
    }
}

impl FactoryProvider for KeyTreeProvider {
    fn name(&self) -> &str {
        &self.id
    }

    fn default_version(&self) -> u32 {
        1
    }

    fn is_willing_to_write(&self) -> bool {
        !self.mandatory
    }

    fn is_writable(&self, _store: &ObjectStore, _id: ObjectId) -> bool {
        !self.mandatory && self.storage.is_writable(&self.file)
    }

    fn read_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        def: &'static FieldDescriptor,
        messages: &mut Vec<String>,
    ) -> Option<BoxedValue> {
        let key = def.tree_key?;
        let path = format!("{}/{}", Self::dir_of(store, id), key);
        let entry = self.tree.get(&path)?;
        let value = entry
            .to_data(def.kind)
            .and_then(|data| BoxedValue::with_data(def, data).ok());
        if value.is_none() {
            messages.push(format!(
                "{}: {} holds a {} entry, expected {}",
                self.id,
                path,
                entry.type_name(),
                def.kind
            ));
        }
        value
    }

    fn read_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) {
        if store.kind(id) != Some(ObjectKind::Action) {
            return;
        }
        // Listed profiles first, in list order; unlisted directories after.
        let mut dirs = self.tree.dirs(&Self::dir_of(store, id));
        let mut ordered = Vec::with_capacity(dirs.len());
        for listed in store.string_list(id, "items-list") {
            if let Some(position) = dirs.iter().position(|dir| *dir == listed) {
                ordered.push(dirs.remove(position));
            }
        }
        ordered.append(&mut dirs);
        for profile_id in ordered {
            let profile = store.create_with_id(ObjectKind::Profile, &profile_id);
            if let Err(e) = store.append_child(id, profile) {
                messages.push(format!("{}: {}", self.id, e));
                store.dispose(profile);
                continue;
            }
            read_item(store, self, profile, messages);
        }
    }

    fn write_start(&mut self, store: &mut ObjectStore, id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        let dir = Self::dir_of(store, id);
        let removed = self.tree.remove_dir(&dir);
        debug!("cleared {} stale entries under {}", removed, dir);
        if let Some(kind) = store.kind(id).filter(|kind| *kind != ObjectKind::Profile) {
            self.tree
                .set(format!("{}/{}", dir, TYPE_KEY), Entry::String(kind.type_name().to_string()));
        }
        ProviderStatus::Ok
    }

    fn write_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        value: &BoxedValue,
        _messages: &mut Vec<String>,
    ) -> ProviderStatus {
        let Some(key) = value.def().tree_key else {
            return ProviderStatus::Ok;
        };
        let Some(entry) = Entry::from_data(value.data()) else {
            return ProviderStatus::ProgramError;
        };
        self.tree.set(format!("{}/{}", Self::dir_of(store, id), key), entry);
        ProviderStatus::Ok
    }

    fn write_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        if store.kind(id) == Some(ObjectKind::Profile) {
            return ProviderStatus::Ok;
        }
        for profile in store.children(id) {
            if store.kind(profile) != Some(ObjectKind::Profile) {
                continue;
            }
            let status = write_item(store, self, profile, messages);
            if !status.is_ok() {
                return status;
            }
        }
        self.persist()
    }
}

impl IoProvider for KeyTreeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_items(&mut self, store: &mut ObjectStore, messages: &mut Vec<String>) -> Vec<ObjectId> {
        let mut items = Vec::new();
        for name in self.tree.dirs(KEYTREE_ROOT) {
            let type_path = format!("{}/{}/{}", KEYTREE_ROOT, name, TYPE_KEY);
            // Trees written before menus existed carry no type: actions.
            let kind = match self.tree.get(&type_path) {
                None => Some(ObjectKind::Action),
                Some(Entry::String(type_name)) => ObjectKind::from_type_name(type_name),
                Some(_) => None,
            };
            let Some(kind) = kind.filter(|kind| *kind != ObjectKind::Profile) else {
                warn!("key-tree '{}': item '{}' has an invalid type", self.id, name);
                messages.push(format!("{}: {}: invalid item type", self.id, type_path));
                continue;
            };
            let item = store.create_with_id(kind, &name);
            read_item(store, self, item, messages);
            items.push(item);
        }
        info!("key-tree '{}' loaded {} item(s)", self.id, items.len());
        items
    }

    fn write_item(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        write_item(store, self, id, messages)
    }

    fn delete_item(&mut self, store: &ObjectStore, id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        if self.mandatory {
            return ProviderStatus::NotWillingToRun;
        }
        if self.tree.remove_dir(&Self::dir_of(store, id)) == 0 {
            return ProviderStatus::DeleteError;
        }
        match self.persist() {
            ProviderStatus::Ok => ProviderStatus::Ok,
            _ => ProviderStatus::DeleteError,
        }
    }
}
