#![cfg(test)]

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::data::boxed::{BoxedData, BoxedValue};
use crate::data::def::FieldDescriptor;
use crate::io::traits::IoProvider;
use crate::kernel::constants::LIST_SEPARATOR;
use crate::object::kind::ObjectKind;
use crate::object::store::{ObjectId, ObjectStore};
use crate::provider::driver::{read_item, write_item};
use crate::provider::status::ProviderStatus;
use crate::provider::traits::FactoryProvider;

// ===== IN-MEMORY BACKEND =====

/// One stored item: flat tree keys, profiles nested by id
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryEntry {
    pub kind: String,
    pub values: BTreeMap<String, String>,
    pub profiles: IndexMap<String, BTreeMap<String, String>>,
}

impl MemoryEntry {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_profile(mut self, id: &str, values: &[(&str, &str)]) -> Self {
        let map = values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.profiles.insert(id.to_string(), map);
        self
    }
}

/// A key/value backend kept in memory, keyed on tree keys
#[derive(Debug)]
pub struct MemoryProvider {
    pub id: String,
    pub entries: IndexMap<String, MemoryEntry>,
    pub default_version: u32,
    pub willing_to_write: bool,
    /// Tree key whose write fails
    pub fail_on: Option<&'static str>,
    /// Keys written, in order
    pub written: Vec<String>,
}

impl MemoryProvider {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            entries: IndexMap::new(),
            default_version: 3,
            willing_to_write: true,
            fail_on: None,
            written: Vec::new(),
        }
    }

    pub fn with_entry(mut self, id: &str, entry: MemoryEntry) -> Self {
        self.entries.insert(id.to_string(), entry);
        self
    }

    /// Item id and profile id addressed by an object
    fn scope(store: &ObjectStore, id: ObjectId) -> (String, Option<String>) {
        match (store.kind(id), store.parent(id)) {
            (Some(ObjectKind::Profile), Some(parent)) => (store.identifier(parent), Some(store.identifier(id))),
            _ => (store.identifier(id), None),
        }
    }

    fn values(&self, store: &ObjectStore, id: ObjectId) -> Option<&BTreeMap<String, String>> {
        let (item, profile) = Self::scope(store, id);
        let entry = self.entries.get(&item)?;
        match profile {
            Some(profile) => entry.profiles.get(&profile),
            None => Some(&entry.values),
        }
    }
}

impl FactoryProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.id
    }

    fn default_version(&self) -> u32 {
        self.default_version
    }

    fn is_willing_to_write(&self) -> bool {
        self.willing_to_write
    }

    fn read_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        def: &'static FieldDescriptor,
        messages: &mut Vec<String>,
    ) -> Option<BoxedValue> {
        let key = def.tree_key?;
        let text = self.values(store, id)?.get(key)?;
        let value = BoxedValue::from_string(def, text, LIST_SEPARATOR);
        if value.is_none() {
            messages.push(format!("{}: cannot parse '{}' for {}", self.id, text, key));
        }
        value
    }

    fn read_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) {
        if store.kind(id) != Some(ObjectKind::Action) {
            return;
        }
        let profiles: Vec<String> = self
            .entries
            .get(&store.identifier(id))
            .map(|entry| entry.profiles.keys().cloned().collect())
            .unwrap_or_default();
        for profile_id in profiles {
            let profile = store.create_with_id(ObjectKind::Profile, &profile_id);
            if store.append_child(id, profile).is_ok() {
                read_item(store, self, profile, messages);
            }
        }
    }

    fn write_start(&mut self, store: &mut ObjectStore, id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        let (item, profile) = Self::scope(store, id);
        match profile {
            Some(profile) => {
                let Some(entry) = self.entries.get_mut(&item) else {
                    return ProviderStatus::ProgramError;
                };
                entry.profiles.insert(profile, BTreeMap::new());
            }
            None => {
                let kind = store.kind(id).map(|k| k.type_name()).unwrap_or_default();
                self.entries.insert(item, MemoryEntry::new(kind));
            }
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
        if self.fail_on == Some(key) {
            return ProviderStatus::WriteError;
        }
        let (item, profile) = Self::scope(store, id);
        let Some(entry) = self.entries.get_mut(&item) else {
            return ProviderStatus::ProgramError;
        };
        let target = match profile {
            Some(profile) => match entry.profiles.get_mut(&profile) {
                Some(values) => values,
                None => return ProviderStatus::ProgramError,
            },
            None => &mut entry.values,
        };
        target.insert(key.to_string(), value.data().to_string_with(LIST_SEPARATOR));
        self.written.push(key.to_string());
        ProviderStatus::Ok
    }

    fn write_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        if store.kind(id) != Some(ObjectKind::Action) {
            return ProviderStatus::Ok;
        }
        for profile in store.children(id) {
            let status = write_item(store, self, profile, messages);
            if !status.is_ok() {
                return status;
            }
        }
        ProviderStatus::Ok
    }
}

impl IoProvider for MemoryProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_items(&mut self, store: &mut ObjectStore, messages: &mut Vec<String>) -> Vec<ObjectId> {
        let items: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.kind.clone()))
            .collect();
        let mut ids = Vec::new();
        for (identifier, kind) in items {
            let Some(kind) = ObjectKind::from_type_name(&kind) else {
                messages.push(format!("{}: unknown type '{}'", self.id, kind));
                continue;
            };
            let id = store.create_with_id(kind, &identifier);
            read_item(store, self, id, messages);
            ids.push(id);
        }
        ids
    }

    fn write_item(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        write_item(store, self, id, messages)
    }

    fn delete_item(&mut self, store: &ObjectStore, id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        match self.entries.shift_remove(&store.identifier(id)) {
            Some(_) => ProviderStatus::Ok,
            None => ProviderStatus::DeleteError,
        }
    }
}

// ===== OBJECT BUILDERS =====

/// An action with a label and one valid profile
pub fn valid_action(store: &mut ObjectStore, id: &str, label: &str) -> ObjectId {
    let action = store.create_with_id(ObjectKind::Action, id);
    store
        .set(action, "label", BoxedData::LocaleString(label.to_string()))
        .expect("set label");
    let profile = store.new_profile(action).expect("new profile");
    store
        .set(profile, "path", BoxedData::String("/usr/bin/true".to_string()))
        .expect("set path");
    action
}

/// A menu with a label and the given children
pub fn menu_with(store: &mut ObjectStore, id: &str, label: &str, children: &[ObjectId]) -> ObjectId {
    let menu = store.create_with_id(ObjectKind::Menu, id);
    store
        .set(menu, "label", BoxedData::LocaleString(label.to_string()))
        .expect("set label");
    for child in children {
        store.append_child(menu, *child).expect("append child");
    }
    menu
}
