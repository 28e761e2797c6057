#![cfg(test)]

use crate::data::boxed::BoxedData;
use crate::object::kind::ObjectKind;
use crate::object::store::ObjectStore;
use crate::tests::integration::common::{menu_with, valid_action};

#[test]
fn test_empty_containers_are_invalid() {
    let mut store = ObjectStore::new();
    let action = store.create_with_id(ObjectKind::Action, "lonely");
    store.set(action, "label", BoxedData::LocaleString("Lonely".into())).unwrap();
    let menu = store.create_with_id(ObjectKind::Menu, "empty");
    store.set(menu, "label", BoxedData::LocaleString("Empty".into())).unwrap();

    assert!(!store.is_valid(action));
    assert!(!store.is_valid(menu));
}

#[test]
fn test_invalid_children_only_keep_container_invalid() {
    let mut store = ObjectStore::new();
    let action = store.create_with_id(ObjectKind::Action, "a");
    store.set(action, "label", BoxedData::LocaleString("A".into())).unwrap();
    let profile = store.new_profile(action).unwrap();
    assert!(!store.is_valid(profile), "a profile without a path is invalid");
    assert!(!store.is_valid(action));

    store.set(profile, "path", BoxedData::String("/bin/ls".into())).unwrap();
    assert!(store.is_valid(action), "one valid child flips the container");
}

#[test]
fn test_menu_valid_with_one_valid_action() {
    let mut store = ObjectStore::new();
    let broken = store.create_with_id(ObjectKind::Action, "broken");
    let menu = menu_with(&mut store, "m", "Menu", &[broken]);
    assert!(!store.is_valid(menu));

    let good = valid_action(&mut store, "good", "Good");
    store.append_child(menu, good).unwrap();
    assert!(store.is_valid(menu));
}

#[test]
fn test_action_label_rules_follow_targets() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "");
    assert!(!store.is_valid(action), "selection target requires a label");

    store.set(action, "target-selection", BoxedData::Bool(false)).unwrap();
    assert!(store.is_valid(action), "no context target, no label needed");

    store.set(action, "target-toolbar", BoxedData::Bool(true)).unwrap();
    assert!(!store.is_valid(action), "toolbar falls back to the empty main label");

    store.set(action, "toolbar-same-label", BoxedData::Bool(false)).unwrap();
    store.set(action, "toolbar-label", BoxedData::LocaleString("Run".into())).unwrap();
    assert!(store.is_valid(action));
}

#[test]
fn test_mandatory_empty_value_is_invalid_but_default_follows_emptiness() {
    let mut store = ObjectStore::new();
    let profile = store.create_with_id(ObjectKind::Profile, "p");
    store.set(profile, "path", BoxedData::String(String::new())).unwrap();

    let value = store.get(profile, "path").unwrap();
    assert!(!value.is_valid());
    assert!(value.is_default(), "no explicit default: empty is the default");
    assert!(!store.is_valid(profile));
}
