#![cfg(test)]

use crate::data::boxed::BoxedData;
use crate::object::error::TreeError;
use crate::object::kind::{FactoryKind, ObjectKind};
use crate::object::store::{ObjectId, ObjectStore};

fn menu(store: &mut ObjectStore, id: &str) -> ObjectId {
    store.create_with_id(ObjectKind::Menu, id)
}

fn action(store: &mut ObjectStore, id: &str) -> ObjectId {
    store.create_with_id(ObjectKind::Action, id)
}

#[test]
fn test_invalid_parent_is_rejected() {
    let mut store = ObjectStore::new();
    let m = menu(&mut store, "m");
    let profile = store.create_with_id(ObjectKind::Profile, "p");
    let a = action(&mut store, "a");

    assert_eq!(
        store.append_child(m, profile),
        Err(TreeError::InvalidParent {
            parent: "menu".into(),
            child: "profile".into(),
        })
    );
    assert!(store.append_child(a, m).is_err());
    assert!(store.append_child(profile, a).is_err());
    assert!(store.children(m).is_empty());
}

#[test]
fn test_cycles_are_rejected() {
    let mut store = ObjectStore::new();
    let outer = menu(&mut store, "outer");
    let inner = menu(&mut store, "inner");
    store.append_child(outer, inner).unwrap();

    assert_eq!(
        store.append_child(inner, outer),
        Err(TreeError::Cycle {
            parent: inner,
            child: outer,
        })
    );
    assert!(matches!(store.append_child(outer, outer), Err(TreeError::Cycle { .. })));
    assert_eq!(store.root_of(inner), outer);
}

#[test]
fn test_insert_position_is_clamped() {
    let mut store = ObjectStore::new();
    let m = menu(&mut store, "m");
    let a = action(&mut store, "a");
    let b = action(&mut store, "b");
    let c = action(&mut store, "c");

    store.insert_child_at(m, a, 10).unwrap();
    store.insert_child_at(m, b, 0).unwrap();
    store.insert_child_at(m, c, 1).unwrap();
    assert_eq!(store.children(m), vec![b, c, a]);
    assert_eq!(store.parent(c), Some(m));
    assert_eq!(store.child_position(m, a), Some(2));
}

#[test]
fn test_reparenting_detaches_from_previous_parent() {
    let mut store = ObjectStore::new();
    let first = menu(&mut store, "first");
    let second = menu(&mut store, "second");
    let a = action(&mut store, "a");

    store.append_child(first, a).unwrap();
    store.append_child(second, a).unwrap();
    assert!(store.children(first).is_empty());
    assert_eq!(store.children(second), vec![a]);
    assert_eq!(store.parent(a), Some(second));
}

#[test]
fn test_remove_and_move() {
    let mut store = ObjectStore::new();
    let m = menu(&mut store, "m");
    let a = action(&mut store, "a");
    let b = action(&mut store, "b");
    let stranger = action(&mut store, "stranger");
    store.append_child(m, a).unwrap();
    store.append_child(m, b).unwrap();

    store.move_child(m, b, 0).unwrap();
    assert_eq!(store.children(m), vec![b, a]);
    store.move_child(m, b, 99).unwrap();
    assert_eq!(store.children(m), vec![a, b]);

    assert_eq!(
        store.remove_child(m, stranger),
        Err(TreeError::NotAChild { parent: m, child: stranger })
    );
    store.remove_child(m, a).unwrap();
    assert_eq!(store.parent(a), None);
    assert!(store.contains(a), "removing does not dispose");
    assert_eq!(store.children(m), vec![b]);
}

#[test]
fn test_count_and_find() {
    let mut store = ObjectStore::new();
    let root = menu(&mut store, "root");
    let sub = menu(&mut store, "sub");
    let a = action(&mut store, "a");
    let b = action(&mut store, "b");
    store.new_profile(a).unwrap();
    store.new_profile(b).unwrap();
    store.new_profile(b).unwrap();
    store.append_child(root, sub).unwrap();
    store.append_child(sub, a).unwrap();
    let roots = vec![root, b];

    let flat = store.count_items(&roots, false);
    assert_eq!((flat.menus, flat.actions, flat.profiles), (1, 1, 0));
    let deep = store.count_items(&roots, true);
    assert_eq!((deep.menus, deep.actions, deep.profiles), (2, 2, 3));
    assert_eq!(deep.total(), 7);

    assert_eq!(store.find_by_id(&roots, "a"), Some(a));
    assert_eq!(store.find_by_id(&roots, "sub"), Some(sub));
    assert_eq!(store.find_by_id(&roots, "nowhere"), None);
}

#[test]
fn test_new_profile_numbering() {
    let mut store = ObjectStore::new();
    let a = action(&mut store, "a");
    let first = store.new_profile(a).unwrap();
    assert_eq!(store.identifier(first), "profile-1");

    // An existing sibling takes the next number.
    let taken = store.create_with_id(ObjectKind::Profile, "profile-2");
    store.append_child(a, taken).unwrap();
    let next = store.new_profile(a).unwrap();
    assert_eq!(store.identifier(next), "profile-3");
    assert_eq!(store.uint(a, "last-allocated"), 3);
    assert_eq!(store.children(a), vec![first, taken, next]);
}

#[test]
fn test_new_profile_needs_an_action() {
    let mut store = ObjectStore::new();
    let m = menu(&mut store, "m");
    assert!(matches!(store.new_profile(m), Err(TreeError::InvalidParent { .. })));
}

#[test]
fn test_menu_items_list_follows_children_on_write() {
    let mut store = ObjectStore::new();
    let m = menu(&mut store, "m");
    let a = action(&mut store, "a");
    let b = action(&mut store, "b");
    store.append_child(m, b).unwrap();
    store.append_child(m, a).unwrap();
    store.set(m, "items-list", BoxedData::StringList(vec!["stale".into()])).unwrap();

    let mut messages = Vec::new();
    let status = ObjectKind::Menu.hooks().write_start(&mut store, m, &mut messages);
    assert!(status.is_ok());
    assert_eq!(store.string_list(m, "items-list"), vec!["b", "a"]);
}
