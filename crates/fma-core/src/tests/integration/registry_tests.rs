#![cfg(test)]

use crate::data::boxed::BoxedData;
use crate::io::registry::ProviderRegistry;
use crate::object::kind::ObjectKind;
use crate::object::store::ObjectStore;
use crate::provider::error::ProviderError;
use crate::tests::integration::common::{MemoryEntry, MemoryProvider};

fn action_entry(label: &str) -> MemoryEntry {
    MemoryEntry::new("Action")
        .with("label", label)
        .with("version", "3.0")
        .with_profile("profile-1", &[("path", "/usr/bin/true")])
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(MemoryProvider::new("one")), 0).unwrap();
    let err = registry.register(Box::new(MemoryProvider::new("one")), 5).unwrap_err();
    assert_eq!(err, ProviderError::AlreadyRegistered("one".into()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_providers_are_sorted_by_priority() {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(MemoryProvider::new("late")), 10).unwrap();
    registry.register(Box::new(MemoryProvider::new("early")), 1).unwrap();
    registry.register(Box::new(MemoryProvider::new("middle")), 5).unwrap();
    let providers = registry.providers();
    let ids: Vec<&str> = providers.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec!["early", "middle", "late"]);
}

#[test]
fn test_load_builds_hierarchy_and_seeds_origins() {
    let provider = MemoryProvider::new("user")
        .with_entry("tools", MemoryEntry::new("Menu").with("label", "Tools").with("items", "grep;missing"))
        .with_entry("grep", action_entry("Grep"))
        .with_entry("other", action_entry("Other"));
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(provider), 0).unwrap();

    let mut store = ObjectStore::new();
    let loaded = registry.load_items(&mut store);

    let roots: Vec<String> = loaded.roots.iter().map(|r| store.identifier(*r)).collect();
    assert_eq!(roots, vec!["tools", "other"]);
    let menu = loaded.roots[0];
    assert_eq!(store.children(menu).len(), 1);
    assert!(loaded.messages.iter().any(|m| m.contains("missing")));

    let counts = store.count_items(&loaded.roots, true);
    assert_eq!((counts.menus, counts.actions, counts.profiles), (1, 2, 2));

    for root in &loaded.roots {
        assert!(!store.is_modified(*root));
        assert!(store.is_valid_cached(*root));
        assert_eq!(store.string(*root, "provider"), "user");
        assert!(!store.boolean(*root, "readonly"));
    }
}

#[test]
fn test_first_provider_wins_on_duplicate_ids() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(Box::new(MemoryProvider::new("system").with_entry("grep", action_entry("System grep"))), 10)
        .unwrap();
    let mut readonly = MemoryProvider::new("user").with_entry("grep", action_entry("User grep"));
    readonly.willing_to_write = false;
    registry.register(Box::new(readonly), 0).unwrap();

    let mut store = ObjectStore::new();
    let loaded = registry.load_items(&mut store);
    assert_eq!(loaded.roots.len(), 1);
    assert_eq!(store.label(loaded.roots[0]), "User grep");
    assert!(store.boolean(loaded.roots[0], "readonly"));
    assert_eq!(loaded.messages.len(), 1);
}

#[test]
fn test_write_item_commits_and_routes_to_owner() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(Box::new(MemoryProvider::new("user").with_entry("grep", action_entry("Grep"))), 0)
        .unwrap();
    let mut store = ObjectStore::new();
    let loaded = registry.load_items(&mut store);
    let action = loaded.roots[0];

    store.set(action, "label", BoxedData::LocaleString("Find".into())).unwrap();
    assert!(store.check_status(action).modified);

    let mut messages = Vec::new();
    registry.write_item(&mut store, action, &mut messages).unwrap();
    assert!(!store.is_modified(action));

    // Read it back from a fresh load.
    let mut other = ObjectStore::new();
    let reloaded = registry.load_items(&mut other);
    assert_eq!(other.label(reloaded.roots[0]), "Find");
}

#[test]
fn test_write_without_willing_provider_fails() {
    let mut provider = MemoryProvider::new("locked");
    provider.willing_to_write = false;
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(provider), 0).unwrap();

    let mut store = ObjectStore::new();
    let action = store.create_with_id(ObjectKind::Action, "new");
    let err = registry.write_item(&mut store, action, &mut Vec::new()).unwrap_err();
    assert_eq!(err, ProviderError::NoWritableProvider("new".into()));
}

#[test]
fn test_delete_item_routes_to_owner() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(Box::new(MemoryProvider::new("user").with_entry("grep", action_entry("Grep"))), 0)
        .unwrap();
    let mut store = ObjectStore::new();
    let loaded = registry.load_items(&mut store);

    registry.delete_item(&store, loaded.roots[0], &mut Vec::new()).unwrap();
    let mut other = ObjectStore::new();
    assert!(registry.load_items(&mut other).roots.is_empty());
}

#[test]
fn test_saving_an_action_keeps_its_menu_clean() {
    let provider = MemoryProvider::new("user")
        .with_entry("tools", MemoryEntry::new("Menu").with("label", "Tools").with("items", "grep"))
        .with_entry("grep", action_entry("Grep"));
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(provider), 0).unwrap();
    let mut store = ObjectStore::new();
    let loaded = registry.load_items(&mut store);
    let menu = loaded.roots[0];
    let action = store.children(menu)[0];
    let live = store.len();

    store.set(action, "label", BoxedData::LocaleString("Find".into())).unwrap();
    assert!(store.check_status(menu).modified);

    registry.write_item(&mut store, action, &mut Vec::new()).unwrap();
    assert!(!store.is_modified(action));
    assert!(!store.is_modified(menu));
    assert!(!store.check_status(menu).modified);
    assert_eq!(store.len(), live);

    // Later edits are still seen against the saved state.
    store.set(action, "label", BoxedData::LocaleString("Grep".into())).unwrap();
    assert!(store.check_status(menu).modified);
    store.revert(action);
    assert_eq!(store.label(action), "Find");
    assert!(!store.check_status(menu).modified);
}

#[test]
fn test_loaded_profiles_keep_the_allocator_ahead() {
    let provider = MemoryProvider::new("user").with_entry(
        "grep",
        MemoryEntry::new("Action")
            .with("label", "Grep")
            .with("version", "3.0")
            .with_profile("profile-4", &[("path", "/usr/bin/grep")]),
    );
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(provider), 0).unwrap();
    let mut store = ObjectStore::new();
    let action = registry.load_items(&mut store).roots[0];

    assert_eq!(store.uint(action, "last-allocated"), 4);
    let next = store.new_profile(action).unwrap();
    assert_eq!(store.identifier(next), "profile-5");
}
