//! The desktop-entry io-provider.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fma_core::kernel::constants::LIST_SEPARATOR;
use fma_core::{
    BoxedData, BoxedType, BoxedValue, FactoryProvider, FieldDescriptor, IoProvider, ObjectId, ObjectKind,
    ObjectStore, ProviderStatus, StorageProvider, read_item, write_item,
};
use log::{debug, error, info, warn};

use crate::keyfile::KeyFile;

pub const DESKTOP_GROUP: &str = "Desktop Entry";
pub const PROFILE_GROUP_PREFIX: &str = "X-Action-Profile ";
const TYPE_KEY: &str = "Type";
const PROFILES_KEY: &str = "Profiles";
const EXTENSION: &str = "desktop";

/// Menus and actions stored as `.desktop` files in one directory
pub struct DesktopProvider {
    id: String,
    storage: Arc<dyn StorageProvider>,
    dir: PathBuf,
    locale: Option<String>,
    readonly: bool,
    /// Parsed files by item id: filled on read, rebuilt on write
    files: HashMap<String, KeyFile>,
}

impl DesktopProvider {
    pub fn new(id: impl Into<String>, storage: Arc<dyn StorageProvider>, dir: PathBuf) -> Self {
        Self {
            id: id.into(),
            storage,
            dir,
            locale: None,
            readonly: false,
            files: HashMap::new(),
        }
    }

    /// Prefer `Key[locale]` entries when reading localized fields
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    pub fn read_only(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    fn path_of(&self, item: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", item, EXTENSION))
    }

    /// Item id and group addressed by an object
    fn scope(store: &ObjectStore, id: ObjectId) -> (String, String) {
        match (store.kind(id), store.parent(id)) {
            (Some(ObjectKind::Profile), Some(action)) => (
                store.identifier(action),
                format!("{}{}", PROFILE_GROUP_PREFIX, store.identifier(id)),
            ),
            _ => (store.identifier(id), DESKTOP_GROUP.to_string()),
        }
    }

    fn load_file(&self, path: &Path, messages: &mut Vec<String>) -> Option<(String, KeyFile)> {
        let item = path.file_stem()?.to_str()?.to_string();
        let text = match self.storage.read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                messages.push(format!("{}: {}", self.id, e));
                return None;
            }
        };
        match KeyFile::parse(&text) {
            Ok(file) => Some((item, file)),
            Err(e) => {
                warn!("{}: {} is not a valid key file: {}", self.id, path.display(), e);
                messages.push(format!("{}: {}: {}", self.id, path.display(), e));
                None
            }
        }
    }

    /// Profile ids of an action file: the `Profiles` list, else every
    /// profile group in file order
    fn profile_ids(file: &KeyFile) -> Vec<String> {
        match file.string_list(DESKTOP_GROUP, PROFILES_KEY) {
            Some(ids) => ids,
            None => file
                .groups()
                .filter_map(|group| group.strip_prefix(PROFILE_GROUP_PREFIX))
                .map(str::to_string)
                .collect(),
        }
    }
}

impl FactoryProvider for DesktopProvider {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_willing_to_write(&self) -> bool {
        !self.readonly
    }

    fn is_writable(&self, store: &ObjectStore, id: ObjectId) -> bool {
        let (item, _) = Self::scope(store, id);
        !self.readonly && self.storage.is_writable(&self.path_of(&item))
    }

    fn read_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        def: &'static FieldDescriptor,
        messages: &mut Vec<String>,
    ) -> Option<BoxedValue> {
        let key = def.desktop_key?;
        let (item, group) = Self::scope(store, id);
        let file = self.files.get(&item)?;

        let data = match def.kind {
            BoxedType::StringList => Some(BoxedData::StringList(file.string_list(&group, key)?)),
            BoxedType::UIntList => {
                let items = file.string_list(&group, key)?;
                items
                    .iter()
                    .map(|item| item.trim().parse::<u32>().ok())
                    .collect::<Option<Vec<_>>>()
                    .map(BoxedData::UIntList)
            }
            BoxedType::Pointer => return None,
            kind => {
                let text = if def.localizable {
                    file.locale_string(&group, key, self.locale.as_deref())?
                } else {
                    file.string(&group, key)?
                };
                BoxedData::from_string(kind, &text, LIST_SEPARATOR)
            }
        };
        let value = data.and_then(|data| BoxedValue::with_data(def, data).ok());
        if value.is_none() {
            messages.push(format!(
                "{}: {}: cannot read '{}' in [{}] as {}",
                self.id,
                item,
                key,
                group,
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
        let Some(file) = self.files.get(&item) else {
            return;
        };
        let mut groups = Vec::new();
        for profile_id in Self::profile_ids(file) {
            if file.has_group(&format!("{}{}", PROFILE_GROUP_PREFIX, profile_id)) {
                groups.push(profile_id);
            } else {
                messages.push(format!("{}: {}: profile '{}' has no group", self.id, item, profile_id));
            }
        }
        for profile_id in groups {
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
        let (item, group) = Self::scope(store, id);
        match store.kind(id) {
            Some(ObjectKind::Profile) => {
                let Some(file) = self.files.get_mut(&item) else {
                    error!("{}: profile written before its action '{}'", self.id, item);
                    return ProviderStatus::ProgramError;
                };
                file.remove_group(&group);
                file.add_group(&group);
            }
            Some(kind) => {
                let mut file = KeyFile::new();
                file.set_string(DESKTOP_GROUP, TYPE_KEY, kind.type_name());
                self.files.insert(item, file);
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
        _messages: &mut Vec<String>,
    ) -> ProviderStatus {
        let Some(key) = value.def().desktop_key else {
            return ProviderStatus::Ok;
        };
        let (item, group) = Self::scope(store, id);
        let Some(file) = self.files.get_mut(&item) else {
            return ProviderStatus::ProgramError;
        };
        match value.data() {
            BoxedData::StringList(items) => file.set_string_list(&group, key, items),
            BoxedData::UIntList(items) => {
                let items: Vec<String> = items.iter().map(u32::to_string).collect();
                file.set_string_list(&group, key, &items);
            }
            BoxedData::Pointer(_) => return ProviderStatus::ProgramError,
            data => file.set_string(&group, key, &data.to_display_string()),
        }
        ProviderStatus::Ok
    }

    fn write_done(&mut self, store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus {
        if store.kind(id) == Some(ObjectKind::Profile) {
            return ProviderStatus::Ok;
        }
        let item = store.identifier(id);
        let profiles: Vec<ObjectId> = store
            .children(id)
            .into_iter()
            .filter(|child| store.kind(*child) == Some(ObjectKind::Profile))
            .collect();
        for profile in &profiles {
            let status = write_item(store, self, *profile, messages);
            if !status.is_ok() {
                return status;
            }
        }

        let path = self.path_of(&item);
        let Some(file) = self.files.get_mut(&item) else {
            return ProviderStatus::ProgramError;
        };
        if store.kind(id) == Some(ObjectKind::Action) {
            let ids: Vec<String> = profiles.iter().map(|profile| store.identifier(*profile)).collect();
            file.set_string_list(DESKTOP_GROUP, PROFILES_KEY, &ids);
        }
        match self.storage.write_string(&path, &file.to_string()) {
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

impl IoProvider for DesktopProvider {
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

        let mut items = Vec::new();
        for path in paths
            .iter()
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION))
        {
            let Some((item, file)) = self.load_file(path, messages) else {
                continue;
            };
            let kind = file
                .string(DESKTOP_GROUP, TYPE_KEY)
                .and_then(|type_name| ObjectKind::from_type_name(&type_name))
                .filter(|kind| *kind != ObjectKind::Profile);
            let Some(kind) = kind else {
                messages.push(format!("{}: {}: missing or invalid {} key", self.id, path.display(), TYPE_KEY));
                continue;
            };
            self.files.insert(item.clone(), file);
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
        self.files.remove(&item);
        match self.storage.remove_file(&self.path_of(&item)) {
            Ok(()) => ProviderStatus::Ok,
            Err(e) => {
                messages.push(format!("{}: {}", self.id, e));
                ProviderStatus::DeleteError
            }
        }
    }
}
