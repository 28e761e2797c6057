#![cfg(test)]

use crate::data::boxed::BoxedData;
use crate::object::kind::ObjectKind;
use crate::object::store::ObjectStore;
use crate::provider::driver::{read_item, write_item};
use crate::provider::status::ProviderStatus;
use crate::tests::integration::common::{MemoryProvider, menu_with, valid_action};

#[test]
fn test_action_write_then_read_is_equal() {
    let mut store = ObjectStore::new();
    let mut provider = MemoryProvider::new("memory");
    let mut messages = Vec::new();

    let action = valid_action(&mut store, "open-terminal", "Open terminal");
    store.set(action, "tooltip", BoxedData::LocaleString("Opens a terminal here".into())).unwrap();
    store.set(action, "target-location", BoxedData::Bool(true)).unwrap();
    store.set(action, "selection-counts", BoxedData::UIntList(vec![1, 2])).unwrap();
    let profile = store.children(action)[0];
    store.set(profile, "parameters", BoxedData::String("--working-directory=%d".into())).unwrap();
    store.set(profile, "mimetypes", BoxedData::StringList(vec!["inode/directory".into()])).unwrap();

    assert_eq!(write_item(&mut store, &mut provider, action, &mut messages), ProviderStatus::Ok);

    let reread = store.create_with_id(ObjectKind::Action, "open-terminal");
    read_item(&mut store, &mut provider, reread, &mut messages);

    assert!(messages.is_empty(), "unexpected messages: {:?}", messages);
    assert!(store.are_equal(action, reread), "round trip must preserve every serializable field");
    assert_eq!(store.children(reread).len(), 1);
    assert_eq!(store.string(store.children(reread)[0], "path"), "/usr/bin/true");
}

#[test]
fn test_menu_write_then_read_keeps_items_list() {
    let mut store = ObjectStore::new();
    let mut provider = MemoryProvider::new("memory");
    let mut messages = Vec::new();

    let first = valid_action(&mut store, "first", "First");
    let second = valid_action(&mut store, "second", "Second");
    let menu = menu_with(&mut store, "tools", "Tools", &[first, second]);

    assert_eq!(write_item(&mut store, &mut provider, menu, &mut messages), ProviderStatus::Ok);
    assert_eq!(provider.entries["tools"].values["items"], "first;second");

    let reread = store.create_with_id(ObjectKind::Menu, "tools");
    read_item(&mut store, &mut provider, reread, &mut messages);
    assert_eq!(store.string_list(reread, "items-list"), vec!["first", "second"]);
    assert_eq!(store.label(reread), "Tools");
}

#[test]
fn test_unset_fields_are_not_written() {
    let mut store = ObjectStore::new();
    let mut provider = MemoryProvider::new("memory");
    let mut messages = Vec::new();

    let action = valid_action(&mut store, "minimal", "Minimal");
    write_item(&mut store, &mut provider, action, &mut messages);

    let entry = &provider.entries["minimal"];
    assert!(!entry.values.contains_key("tooltip"));
    assert!(!entry.values.contains_key("basenames"));
    // Upgraded on write even though it was never set.
    assert_eq!(entry.values["version"], "3.0");
}
