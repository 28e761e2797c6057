//! The structured-document io-provider.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fma_core::{
    BoxedValue, ConfigData, ConfigFormat, FactoryProvider, FieldDescriptor, IoProvider, ObjectId, ObjectKind,
    ObjectStore, ProviderStatus, StorageProvider, read_item, write_item,
};
use log::{debug, error, info, warn};
use serde_json::{Map, Value};

use crate::value::{from_value, to_value};

const TYPE_KEY: &str = "type";
const PROFILES_KEY: &str = "profiles";
const PROFILE_ID_KEY: &str = "id";

/// Menus and actions stored as one document each
pub struct DocumentProvider {
    id: String,
    storage: Arc<dyn StorageProvider>,
    dir: PathBuf,
    format: ConfigFormat,
    readonly: bool,
    /// Parsed documents by item id
    docs: HashMap<String, ConfigData>,
    /// Profiles of the action being written, in write order
    pending: Vec<Map<String, Value>>,
}

impl DocumentProvider {
    pub fn new(id: impl Into<String>, storage: Arc<dyn StorageProvider>, dir: PathBuf, format: ConfigFormat) -> Self {
        Self {
            id: id.into(),
            storage,
            dir,
            format,
            readonly: false,
            docs: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn read_only(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    fn path_of(&self, item: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", item, self.format.extension()))
    }

    /// Item id owning an object's document
    fn item_of(store: &ObjectStore, id: ObjectId) -> String {
        match (store.kind(id), store.parent(id)) {
            (Some(ObjectKind::Profile), Some(action)) => store.identifier(action),
            _ => store.identifier(id),
        }
    }

    /// Profile objects stored in a document
    fn profiles_of(doc: &ConfigData) -> Vec<&Map<String, Value>> {
        match doc.value(PROFILES_KEY) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
            _ => Vec::new(),
        }
    }

    /// Raw value of a field for an object, if stored
    fn lookup(&self, store: &ObjectStore, id: ObjectId, key: &str) -> Option<&Value> {
        let doc = self.docs.get(&Self::item_of(store, id))?;
        if store.kind(id) != Some(ObjectKind::Profile) {
            return doc.value(key);
        }
        let profile = store.identifier(id);
        Self::profiles_of(doc)
            .into_iter()
            .find(|map| map.get(PROFILE_ID_KEY).and_then(Value::as_str) == Some(profile.as_str()))
            .and_then(|map| map.get(key))
    }

    fn load_doc(&self, path: &Path, messages: &mut Vec<String>) -> Option<(String, ConfigData)> {
        let item = path.file_stem()?.to_str()?.to_string();
        let parsed = self
            .storage
            .read_to_string(path)
            .and_then(|text| ConfigData::deserialize(&text, self.format));
        match parsed {
            Ok(doc) => Some((item, doc)),
            Err(e) => {
                warn!("{}: cannot load {}: {}", self.id, path.display(), e);
                messages.push(format!("{}: {}: {}", self.id, path.display(), e));
                None
            }
        }
    }
}

impl FactoryProvider for DocumentProvider {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_willing_to_write(&self) -> bool {
        !self.readonly
    }

    fn is_writable(&self, store: &ObjectStore, id: ObjectId) -> bool {
        !self.readonly && self.storage.is_writable(&self.path_of(&Self::item_of(store, id)))
    }

    fn read_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        def: &'static FieldDescriptor,
        messages: &mut Vec<String>,
    ) -> Option<BoxedValue> {
        let key = def.tree_key?;
        let raw = self.lookup(store, id, key)?;
        let value = from_value(def.kind, raw).and_then(|data| BoxedValue::with_data(def, data).ok());
        if value.is_none() {
            messages.push(format!(
                "{}: {}: '{}' holds {}, expected {}",
                self.id,
                store.identifier(id),
                key,
                raw,
                def.kind
            ));
        }
        value
    }

    fn read_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) {
        if store.kind(id) != Some(ObjectKind::Action) {
            return;
        }
        let item = store.identifier(id);
        let Some(doc) = self.docs.get(&item) else {
            return;
        };
        let mut ids = Vec::new();
        for map in Self::profiles_of(doc) {
            match map.get(PROFILE_ID_KEY).and_then(Value::as_str) {
                Some(profile_id) if !profile_id.is_empty() => ids.push(profile_id.to_string()),
                _ => messages.push(format!("{}: {}: profile without an id", self.id, item)),
            }
        }
        for profile_id in ids {
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
        match store.kind(id) {
            Some(ObjectKind::Profile) => {
                let mut map = Map::new();
                map.insert(PROFILE_ID_KEY.to_string(), Value::from(store.identifier(id)));
                self.pending.push(map);
            }
            Some(kind) => {
                let mut doc = ConfigData::new();
                if let Err(e) = doc.set(TYPE_KEY, kind.type_name()) {
                    error!("{}: {}", self.id, e);
                    return ProviderStatus::WriteError;
                }
                self.pending.clear();
                self.docs.insert(store.identifier(id), doc);
            }
            None => return ProviderStatus::ProgramError,
        }
        ProviderStatus::Ok
    }

    fn write_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        value: &BoxedValue,
        messages: &mut Vec<String>,
    ) -> ProviderStatus {
        let Some(key) = value.def().tree_key else {
            return ProviderStatus::Ok;
        };
        let Some(raw) = to_value(value.data()) else {
            return ProviderStatus::ProgramError;
        };
        if store.kind(id) == Some(ObjectKind::Profile) {
            let Some(map) = self.pending.last_mut() else {
                return ProviderStatus::ProgramError;
            };
            map.insert(key.to_string(), raw);
            return ProviderStatus::Ok;
        }
        let Some(doc) = self.docs.get_mut(&store.identifier(id)) else {
            return ProviderStatus::ProgramError;
        };
        match doc.set(key, raw) {
            Ok(()) => ProviderStatus::Ok,
            Err(e) => {
                messages.push(format!("{}: {}", self.id, e));
                ProviderStatus::WriteError
            }
        }
    }

    fn write_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        if store.kind(id) == Some(ObjectKind::Profile) {
            return ProviderStatus::Ok;
        }
        let is_action = store.kind(id) == Some(ObjectKind::Action);
        if is_action {
            let profiles: Vec<ObjectId> = store
                .children(id)
                .into_iter()
                .filter(|child| store.kind(*child) == Some(ObjectKind::Profile))
                .collect();
            for profile in profiles {
                let status = write_item(store, self, profile, messages);
                if !status.is_ok() {
                    return status;
                }
            }
        }

        let item = store.identifier(id);
        let path = self.path_of(&item);
        let profiles: Vec<Value> = self.pending.drain(..).map(Value::Object).collect();
        let format = self.format;
        let Some(doc) = self.docs.get_mut(&item) else {
            return ProviderStatus::ProgramError;
        };
        // Arrays of tables must come last in TOML.
        let text = if is_action {
            doc.set(PROFILES_KEY, profiles)
        } else {
            Ok(())
        }
        .and_then(|()| doc.serialize(format));
        match text.and_then(|text| self.storage.write_string(&path, &text)) {
            Ok(()) => {
                debug!("{}: wrote {}", self.id, path.display());
                ProviderStatus::Ok
            }
            Err(e) => {
                error!("{}: cannot write {}: {}", self.id, path.display(), e);
                messages.push(format!("{}: {}", self.id, e));
                ProviderStatus::WriteError
            }
        }
    }
}

impl IoProvider for DocumentProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_items(&mut self, store: &mut ObjectStore, messages: &mut Vec<String>) -> Vec<ObjectId> {
        if !self.storage.is_dir(&self.dir) {
            debug!("{}: no directory at {}", self.id, self.dir.display());
            return Vec::new();
        }
        let paths = match self.storage.read_dir(&self.dir) {
            Ok(paths) => paths,
            Err(e) => {
                messages.push(format!("{}: {}", self.id, e));
                return Vec::new();
            }
        };

        let format = self.format;
        let mut items = Vec::new();
        for path in paths.iter().filter(|path| ConfigFormat::from_path(path) == Some(format)) {
            let Some((item, doc)) = self.load_doc(path, messages) else {
                continue;
            };
            let kind = doc
                .get::<String>(TYPE_KEY)
                .and_then(|type_name| ObjectKind::from_type_name(&type_name))
                .filter(|kind| *kind != ObjectKind::Profile);
            let Some(kind) = kind else {
                messages.push(format!("{}: {}: missing or invalid '{}'", self.id, path.display(), TYPE_KEY));
                continue;
            };
            self.docs.insert(item.clone(), doc);
            let id = store.create_with_id(kind, &item);
            read_item(store, self, id, messages);
            items.push(id);
        }
        info!("{}: loaded {} item(s) from {}", self.id, items.len(), self.dir.display());
        items
    }

    fn write_item(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        write_item(store, self, id, messages)
    }

    fn delete_item(&mut self, store: &ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        if self.readonly {
            return ProviderStatus::NotWillingToRun;
        }
        let item = store.identifier(id);
        self.docs.remove(&item);
        match self.storage.remove_file(&self.path_of(&item)) {
            Ok(()) => ProviderStatus::Ok,
            Err(e) => {
                messages.push(format!("{}: {}", self.id, e));
                ProviderStatus::DeleteError
            }
        }
    }
}
