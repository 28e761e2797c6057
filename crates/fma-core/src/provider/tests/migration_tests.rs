#![cfg(test)]

use crate::data::boxed::BoxedValue;
use crate::data::schema::ACTION_V1_GROUP;
use crate::kernel::constants::{LEGACY_PROFILE_ID, LEGACY_PROFILE_LABEL, LIST_SEPARATOR};
use crate::object::kind::ObjectKind;
use crate::object::store::ObjectStore;
use crate::provider::migration::migrate_obsoleted;

fn set_v1(store: &mut ObjectStore, id: crate::object::ObjectId, name: &str, text: &str) {
    let def = ACTION_V1_GROUP.field(name).unwrap();
    let value = BoxedValue::from_string(def, text, LIST_SEPARATOR).unwrap();
    store.set_boxed(id, value).unwrap();
}

#[test]
fn test_nothing_to_migrate() {
    let mut store = ObjectStore::new();
    let action = store.create_with_id(ObjectKind::Action, "a");
    assert!(migrate_obsoleted(&mut store, action, &mut Vec::new()).is_none());
    assert!(store.children(action).is_empty());
}

#[test]
fn test_values_move_not_copy() {
    let mut store = ObjectStore::new();
    let action = store.create_with_id(ObjectKind::Action, "a");
    set_v1(&mut store, action, "v1-path", "/bin/echo");
    set_v1(&mut store, action, "v1-matchcase", "false");

    let mut messages = Vec::new();
    let profile = migrate_obsoleted(&mut store, action, &mut messages).unwrap();
    assert!(messages.is_empty());
    assert_eq!(store.identifier(profile), LEGACY_PROFILE_ID);
    assert_eq!(store.label(profile), LEGACY_PROFILE_LABEL);
    assert_eq!(store.string(profile, "path"), "/bin/echo");
    assert!(!store.boolean(profile, "matchcase"));
    assert_eq!(store.get(profile, "path").unwrap().name(), "path");

    assert!(store.get(action, "v1-path").is_none());
    assert!(store.get(action, "v1-matchcase").is_none());
    assert_eq!(store.children(action), vec![profile]);
    assert_eq!(store.string(action, "version"), "3.0");
}

#[test]
fn test_profiles_have_no_legacy_child() {
    let mut store = ObjectStore::new();
    let profile = store.create_with_id(ObjectKind::Profile, "p");
    assert!(migrate_obsoleted(&mut store, profile, &mut Vec::new()).is_none());
}
