//! In-memory preference tree with typed leaf entries.
use std::collections::BTreeMap;
use std::path::Path;

use fma_core::kernel::error::Result;
use fma_core::storage::StorageSystemError;
use fma_core::{BoxedData, BoxedType, StorageProvider};
use serde::{Deserialize, Serialize};

/// A typed leaf of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entry {
    String(String),
    Bool(bool),
    List(Vec<String>),
    UInt(u32),
    #[serde(rename = "uint-list")]
    UIntList(Vec<u32>),
}

impl Entry {
    /// Entry holding a boxed payload; pointers have no tree form
    pub fn from_data(data: &BoxedData) -> Option<Self> {
        match data {
            BoxedData::String(s) | BoxedData::LocaleString(s) => Some(Entry::String(s.clone())),
            BoxedData::Bool(b) => Some(Entry::Bool(*b)),
            BoxedData::StringList(items) => Some(Entry::List(items.clone())),
            BoxedData::UInt(u) => Some(Entry::UInt(*u)),
            BoxedData::UIntList(items) => Some(Entry::UIntList(items.clone())),
            BoxedData::Pointer(_) => None,
        }
    }

    /// Payload of the requested type, `None` when the entry has another shape
    pub fn to_data(&self, kind: BoxedType) -> Option<BoxedData> {
        match (self, kind) {
            (Entry::String(s), BoxedType::String) => Some(BoxedData::String(s.clone())),
            (Entry::String(s), BoxedType::LocaleString) => Some(BoxedData::LocaleString(s.clone())),
            (Entry::Bool(b), BoxedType::Bool) => Some(BoxedData::Bool(*b)),
            (Entry::List(items), BoxedType::StringList) => Some(BoxedData::StringList(items.clone())),
            (Entry::UInt(u), BoxedType::UInt) => Some(BoxedData::UInt(*u)),
            (Entry::UIntList(items), BoxedType::UIntList) => Some(BoxedData::UIntList(items.clone())),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::String(_) => "string",
            Entry::Bool(_) => "bool",
            Entry::List(_) => "list",
            Entry::UInt(_) => "uint",
            Entry::UIntList(_) => "uint-list",
        }
    }
}

/// Flat map of absolute key paths to entries; directories are implied by
/// the paths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyTree {
    entries: BTreeMap<String, Entry>,
}

impl KeyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a tree from a JSON file; a missing file is an empty tree
    pub fn load<S: StorageProvider + ?Sized>(storage: &S, file: &Path) -> Result<Self> {
        if !storage.exists(file) {
            return Ok(Self::new());
        }
        let content = storage.read_to_string(file)?;
        serde_json::from_str(&content).map_err(|e| {
            StorageSystemError::DeserializationError {
                format: "json".to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }

    pub fn save<S: StorageProvider + ?Sized>(&self, storage: &S, file: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;
        storage.write_string(file, &content)
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, entry: Entry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    /// Remove a directory and everything below it; returns the number of
    /// entries removed
    pub fn remove_dir(&mut self, dir: &str) -> usize {
        let prefix = format!("{}/", dir);
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(&prefix));
        before - self.entries.len()
    }

    /// Names of the immediate subdirectories of `dir`, sorted
    pub fn dirs(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", dir);
        let mut names: Vec<String> = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| {
                let rest = &key[prefix.len()..];
                rest.split_once('/').map(|(name, _)| name.to_string())
            })
            .collect();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
