//! # FMA Core Provider Registry
//!
//! Holds the io-providers of a session in priority order. Loading reads every
//! willing provider, keeps the first item seen for each identifier, rebuilds
//! the menu hierarchy from the menus' `items-list`, then seeds origins so the
//! fresh tree reports unmodified.
use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::data::boxed::BoxedData;
use crate::io::traits::IoProvider;
use crate::object::kind::ObjectKind;
use crate::object::store::{ObjectId, ObjectStore};
use crate::provider::error::ProviderError;

struct RegisteredProvider {
    provider: Box<dyn IoProvider>,
    priority: u32,
}

/// Result of loading every provider
#[derive(Debug, Default)]
pub struct LoadedItems {
    /// Top-level menus and actions, in load order
    pub roots: Vec<ObjectId>,
    /// Messages reported while reading
    pub messages: Vec<String>,
}

#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider; lower priorities are read first
    pub fn register(&mut self, provider: Box<dyn IoProvider>, priority: u32) -> Result<(), ProviderError> {
        let id = provider.id().to_string();
        if self.entries.iter().any(|entry| entry.provider.id() == id) {
            return Err(ProviderError::AlreadyRegistered(id));
        }
        // Equal priorities keep registration order.
        let index = self.entries.partition_point(|entry| entry.priority <= priority);
        self.entries.insert(index, RegisteredProvider { provider, priority });
        debug!("registered io-provider '{}' with priority {}", id, priority);
        Ok(())
    }

    /// Providers in priority order
    pub fn providers(&self) -> Vec<&dyn IoProvider> {
        self.entries.iter().map(|entry| entry.provider.as_ref()).collect()
    }

    pub fn provider(&self, id: &str) -> Option<&dyn IoProvider> {
        self.entries
            .iter()
            .find(|entry| entry.provider.id() == id)
            .map(|entry| entry.provider.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read every item of every willing provider
    pub fn load_items(&mut self, store: &mut ObjectStore) -> LoadedItems {
        let mut loaded = LoadedItems::default();
        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for entry in &mut self.entries {
            let provider = entry.provider.as_mut();
            if !provider.is_willing_to_read() {
                debug!("io-provider '{}' is not willing to read", provider.id());
                continue;
            }
            let read = provider.read_items(store, &mut loaded.messages);
            info!("io-provider '{}' read {} item(s)", provider.id(), read.len());
            for item in read {
                let identifier = store.identifier(item);
                if !seen.insert(identifier.clone()) {
                    warn!("duplicate item '{}' from '{}' ignored", identifier, provider.id());
                    loaded
                        .messages
                        .push(format!("{}: item '{}' is already loaded, ignored", provider.id(), identifier));
                    store.dispose(item);
                    continue;
                }
                let readonly = !provider.is_willing_to_write() || !provider.is_writable(store, item);
                let tagged = store
                    .set(item, "provider", BoxedData::String(provider.id().to_string()))
                    .and_then(|_| store.set(item, "readonly", BoxedData::Bool(readonly)));
                if let Err(e) = tagged {
                    loaded.messages.push(format!("{}: {}: {}", provider.id(), identifier, e));
                }
                items.push(item);
            }
        }

        build_hierarchy(store, &items, &mut loaded.messages);
        loaded.roots = items.into_iter().filter(|item| store.parent(*item).is_none()).collect();
        for root in &loaded.roots {
            store.seed_origin(*root);
        }
        loaded
    }

    /// Write an item through its owning provider, or the first willing one.
    ///
    /// On success the item's current state becomes its new origin.
    pub fn write_item(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> Result<(), ProviderError> {
        let id = match store.kind(id) {
            Some(ObjectKind::Profile) => store.parent(id).ok_or(ProviderError::UnknownItem(store.identifier(id)))?,
            Some(_) => id,
            None => return Err(ProviderError::UnknownItem(id.to_string())),
        };
        let identifier = store.identifier(id);
        let owner = store.string(id, "provider");
        let index = self
            .entries
            .iter()
            .position(|entry| entry.provider.id() == owner && entry.provider.is_willing_to_write())
            .or_else(|| self.entries.iter().position(|entry| entry.provider.is_willing_to_write()))
            .ok_or_else(|| ProviderError::NoWritableProvider(identifier.clone()))?;

        let provider = self.entries[index].provider.as_mut();
        provider.write_item(store, id, messages).into_result()?;
        let tagged = store
            .set(id, "provider", BoxedData::String(provider.id().to_string()))
            .and_then(|_| store.set(id, "readonly", BoxedData::Bool(false)));
        if let Err(e) = tagged {
            warn!("'{}' saved to '{}' but not tagged: {}", identifier, provider.id(), e);
        }
        store.commit(id);
        info!("saved '{}' to '{}'", identifier, provider.id());
        Ok(())
    }

    /// Write an item and, for a menu, every item below it
    pub fn write_tree(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> Result<(), ProviderError> {
        self.write_item(store, id, messages)?;
        if store.kind(id) == Some(ObjectKind::Menu) {
            for child in store.children(id) {
                self.write_tree(store, child, messages)?;
            }
        }
        Ok(())
    }

    /// Delete an item from its owning provider's storage.
    ///
    /// The in-memory object is left to the caller.
    pub fn delete_item(&mut self, store: &ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> Result<(), ProviderError> {
        let owner = store.string(id, "provider");
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.provider.id() == owner)
            .ok_or(ProviderError::NotFound(owner))?;
        entry.provider.delete_item(store, id, messages).into_result()
    }
}

/// Attach the items named in each menu's `items-list` to that menu
fn build_hierarchy(store: &mut ObjectStore, items: &[ObjectId], messages: &mut Vec<String>) {
    let by_id: HashMap<String, ObjectId> = items.iter().map(|item| (store.identifier(*item), *item)).collect();
    let menus: Vec<ObjectId> = items
        .iter()
        .copied()
        .filter(|item| store.kind(*item) == Some(ObjectKind::Menu))
        .collect();

    for menu in menus {
        for child_id in store.string_list(menu, "items-list") {
            let Some(child) = by_id.get(&child_id).copied() else {
                warn!("menu '{}' references unknown item '{}'", store.identifier(menu), child_id);
                messages.push(format!("{}: unknown item '{}' in menu", store.identifier(menu), child_id));
                continue;
            };
            if store.parent(child).is_some() {
                messages.push(format!("{}: item '{}' already belongs to another menu", store.identifier(menu), child_id));
                continue;
            }
            if let Err(e) = store.append_child(menu, child) {
                messages.push(format!("{}: {}", store.identifier(menu), e));
            }
        }
    }
}
