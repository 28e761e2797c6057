#![cfg(test)]

use crate::kernel::constants::{CURRENT_VERSION, LEGACY_PROFILE_ID};
use crate::object::kind::ObjectKind;
use crate::object::store::ObjectStore;
use crate::provider::driver::read_item;
use crate::tests::integration::common::{MemoryEntry, MemoryProvider};

fn legacy_provider(entry: MemoryEntry) -> MemoryProvider {
    let mut provider = MemoryProvider::new("legacy").with_entry("terminal", entry);
    provider.default_version = 1;
    provider
}

#[test]
fn test_open_terminal_scenario() {
    let mut store = ObjectStore::new();
    let mut provider = legacy_provider(
        MemoryEntry::new("Action")
            .with("label", "Open terminal")
            .with("target-selection", "true")
            .with("path", "/usr/bin/xterm"),
    );
    let mut messages = Vec::new();

    let action = store.create_with_id(ObjectKind::Action, "terminal");
    read_item(&mut store, &mut provider, action, &mut messages);

    let children = store.children(action);
    assert_eq!(children.len(), 1);
    let profile = children[0];
    assert_eq!(store.kind(profile), Some(ObjectKind::Profile));
    assert_eq!(store.identifier(profile), LEGACY_PROFILE_ID);
    assert_eq!(store.string(profile, "path"), "/usr/bin/xterm");
    assert!(store.is_valid(action));
}

#[test]
fn test_all_legacy_fields_move_to_one_profile() {
    let mut store = ObjectStore::new();
    let mut provider = legacy_provider(
        MemoryEntry::new("Action")
            .with("label", "Compress")
            .with("path", "/usr/bin/tar")
            .with("parameters", "-czf %f.tgz %f")
            .with("basenames", "*.txt;*.log")
            .with("mimetypes", "text/*")
            .with("schemes", "file;sftp")
            .with("accept-multiple-files", "true"),
    );
    let mut messages = Vec::new();

    let action = store.create_with_id(ObjectKind::Action, "terminal");
    read_item(&mut store, &mut provider, action, &mut messages);

    let children = store.children(action);
    assert_eq!(children.len(), 1, "exactly one child is synthesized");
    let profile = children[0];
    assert_eq!(store.string(profile, "parameters"), "-czf %f.tgz %f");
    assert_eq!(store.string_list(profile, "basenames"), vec!["*.txt", "*.log"]);
    assert_eq!(store.string_list(profile, "mimetypes"), vec!["text/*"]);
    assert_eq!(store.string_list(profile, "schemes"), vec!["file", "sftp"]);
    assert!(store.boolean(profile, "accept-multiple"));

    // The action no longer carries any of them.
    for name in ["v1-path", "v1-parameters", "v1-basenames", "v1-mimetypes", "v1-schemes", "v1-accept-multiple"] {
        assert!(store.get(action, name).is_none(), "{} should have moved", name);
    }
    assert!(store.get(action, "basenames").is_none());
    assert_eq!(store.uint(action, "iversion"), CURRENT_VERSION);
    assert_eq!(store.string(action, "version"), "3.0");
    assert!(messages.is_empty(), "unexpected messages: {:?}", messages);
}

#[test]
fn test_current_action_is_not_migrated() {
    let mut store = ObjectStore::new();
    let mut provider = legacy_provider(
        MemoryEntry::new("Action")
            .with("label", "Current")
            .with("version", "3.0")
            .with("basenames", "*.rs")
            .with_profile("profile-1", &[("path", "/usr/bin/cargo")]),
    );
    let mut messages = Vec::new();

    let action = store.create_with_id(ObjectKind::Action, "terminal");
    read_item(&mut store, &mut provider, action, &mut messages);

    let children = store.children(action);
    assert_eq!(children.len(), 1);
    assert_eq!(store.identifier(children[0]), "profile-1");
    // Read as an action-level condition, not as a legacy field.
    assert_eq!(store.string_list(action, "basenames"), vec!["*.rs"]);
    assert!(store.get(action, "v1-basenames").is_none());
    // The allocator moves past the loaded profile.
    assert_eq!(store.uint(action, "last-allocated"), 1);
}
