#![cfg(test)]

use crate::data::boxed::BoxedData;
use crate::object::store::ObjectStore;
use crate::tests::integration::common::{menu_with, valid_action};

#[test]
fn test_duplicate_is_equal_and_unmodified_once_origin_is_set() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    let menu = menu_with(&mut store, "m", "Menu", &[action]);

    let copy = store.duplicate(menu).unwrap();
    assert!(store.are_equal(menu, copy));
    assert!(store.get_origin(copy).is_none());
    assert!(store.check_status(copy).modified, "no origin means modified");

    store.set_origin(copy, Some(menu));
    let status = store.check_status(copy);
    assert!(!status.modified);
    assert!(status.valid);
    // Children resolve their twin by position under the shared origin.
    let copied_action = store.children(copy)[0];
    assert_eq!(store.get_origin(copied_action), Some(menu));
    assert_eq!(store.effective_origin(copied_action), Some(action));
    assert!(!store.is_modified(copied_action));
}

#[test]
fn test_mutation_then_revert_of_value_flips_modified() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.seed_origin(action);
    assert!(!store.is_modified(action));

    store.set(action, "label", BoxedData::LocaleString("Renamed".into())).unwrap();
    assert!(store.check_status(action).modified);

    store.set(action, "label", BoxedData::LocaleString("Action".into())).unwrap();
    assert!(!store.check_status(action).modified);
}

#[test]
fn test_child_mutation_marks_child_and_parent() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.seed_origin(action);
    let profile = store.children(action)[0];

    store.set(profile, "parameters", BoxedData::String("-v".into())).unwrap();
    store.check_status(action);
    assert!(store.is_modified(profile));
    assert!(store.is_modified(action));
}

#[test]
fn test_setting_a_default_explicitly_is_not_a_modification() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.seed_origin(action);

    store.set(action, "enabled", BoxedData::Bool(true)).unwrap();
    assert!(!store.check_status(action).modified);
}

#[test]
fn test_revert_restores_origin_values_and_children() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.seed_origin(action);

    store.set(action, "label", BoxedData::LocaleString("Changed".into())).unwrap();
    store.new_profile(action).unwrap();
    assert_eq!(store.children(action).len(), 2);

    store.revert(action);
    assert_eq!(store.label(action), "Action");
    assert_eq!(store.children(action).len(), 1);
    assert!(!store.is_modified(action));
}

#[test]
fn test_commit_replaces_origin() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.seed_origin(action);
    let first_origin = store.get_origin(action).unwrap();

    store.set(action, "label", BoxedData::LocaleString("Saved".into())).unwrap();
    store.commit(action);

    let second_origin = store.get_origin(action).unwrap();
    assert_ne!(first_origin, second_origin);
    assert!(!store.contains(first_origin), "a private origin is freed on commit");
    assert_eq!(store.label(second_origin), "Saved");
    assert!(!store.is_modified(action));
}

#[test]
fn test_reset_origin_swaps_trees() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    let pasted = store.duplicate(action).unwrap();
    store.set_origin(pasted, Some(action));

    // The pasted tree becomes the persisted one.
    store.reset_origin(action, pasted);
    assert_eq!(store.get_origin(action), Some(pasted));
    assert_eq!(store.get_origin(pasted), None);
    let child = store.children(action)[0];
    let twin = store.children(pasted)[0];
    assert_eq!(store.effective_origin(child), Some(twin));
    assert!(!store.check_status(action).modified);
}

#[test]
fn test_reset_status_clears_modified_recursively() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.check_status(action);
    assert!(store.is_modified(action));

    store.reset_status(action);
    assert!(!store.is_modified(action));
    assert!(!store.is_modified(store.children(action)[0]));
}

#[test]
fn test_disposed_object_is_a_no_op() {
    let mut store = ObjectStore::new();
    let action = valid_action(&mut store, "a", "Action");
    store.seed_origin(action);
    let origin = store.get_origin(action).unwrap();
    let live = store.len();

    store.dispose(action);
    assert!(!store.contains(action));
    assert!(!store.contains(origin), "owned origin goes with its object");
    assert!(store.len() < live);

    // None of these may panic.
    store.set_origin(action, None);
    store.reset_status(action);
    assert_eq!(store.check_status(action), Default::default());
    assert!(store.duplicate(action).is_none());
    assert!(!store.is_modified(action));
}

#[test]
fn test_repeated_commits_free_replaced_origins() {
    let mut store = ObjectStore::new();
    let mut action = valid_action(&mut store, "a", "Action");
    let menu = menu_with(&mut store, "m", "Menu", &[action]);
    store.seed_origin(menu);
    let live = store.len();

    // An action saved on its own holds a private origin until its menu is saved.
    for round in 0..3 {
        store.set(action, "label", BoxedData::LocaleString(format!("Round {}", round))).unwrap();
        store.seed_origin(action);
        assert_eq!(store.len(), live + 2);
        store.commit(menu);
        assert_eq!(store.len(), live);
        store.revert(menu);
        assert_eq!(store.len(), live);
        // Reverting rebuilds the children.
        action = store.children(menu)[0];
    }
    assert!(!store.check_status(menu).modified);
    assert_eq!(store.label(action), "Round 2");
}
