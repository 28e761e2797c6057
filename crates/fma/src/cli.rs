//! Text rendering of loaded items for the command line.
use std::fmt::Write;

use fma_core::{ObjectId, ObjectKind, ObjectStore};

/// One line per object, children indented below their parent.
///
/// Modified objects are flagged with `*`, invalid ones with `!`.
pub fn render_tree(store: &ObjectStore, roots: &[ObjectId]) -> String {
    let mut out = String::new();
    for root in roots {
        render_node(store, *root, 0, &mut out);
    }
    let counts = store.count_items(roots, true);
    let _ = writeln!(
        out,
        "{} menu(s), {} action(s), {} profile(s)",
        counts.menus, counts.actions, counts.profiles
    );
    out
}

fn render_node(store: &ObjectStore, id: ObjectId, depth: usize, out: &mut String) {
    let Some(kind) = store.kind(id) else {
        return;
    };
    let mut flags = String::new();
    if store.is_modified(id) {
        flags.push('*');
    }
    if !store.is_valid_cached(id) {
        flags.push('!');
    }
    let _ = writeln!(
        out,
        "{:indent$}{} {} \"{}\"{}{}",
        "",
        kind.type_name(),
        store.identifier(id),
        store.label(id),
        if flags.is_empty() { "" } else { " " },
        flags,
        indent = depth * 2
    );
    for child in store.children(id) {
        render_node(store, child, depth + 1, out);
    }
}

/// Every schema field of an object, then its profiles.
///
/// Unset fields show their default, marked as such.
pub fn render_item(store: &ObjectStore, id: ObjectId) -> String {
    let mut out = String::new();
    dump_fields(store, id, &mut out);
    if store.kind(id) == Some(ObjectKind::Action) {
        for profile in store.children(id) {
            let _ = writeln!(out, "\n[{}]", store.identifier(profile));
            dump_fields(store, profile, &mut out);
        }
    }
    out
}

fn dump_fields(store: &ObjectStore, id: ObjectId, out: &mut String) {
    let Some(kind) = store.kind(id) else {
        return;
    };
    for group in kind.schema_groups() {
        for def in group.fields {
            let line = match store.get(id, def.name) {
                Some(value) => value.to_display_string(),
                // Only declared defaults count; the type's empty value does not.
                None => match def.default.and_then(|_| def.default_data()) {
                    Some(data) => format!("{} (default)", data.to_display_string()),
                    None => "(unset)".to_string(),
                },
            };
            let _ = writeln!(out, "{} = {}", def.name, line);
        }
    }
}

/// Schema groups and fields of every kind
pub fn render_schema() -> String {
    let mut out = String::new();
    for kind in [ObjectKind::Menu, ObjectKind::Action, ObjectKind::Profile] {
        let _ = writeln!(out, "{}:", kind.type_name());
        for group in kind.schema_groups() {
            let until = group.until.map(|until| format!(", until {}", until)).unwrap_or_default();
            let _ = writeln!(out, "  [{}] since {}{}", group.name, group.since, until);
            for def in group.fields {
                let mut notes = Vec::new();
                if let Some(default) = def.default {
                    notes.push(format!("default={:?}", default));
                }
                if def.mandatory {
                    notes.push("mandatory".to_string());
                }
                if !def.serializable {
                    notes.push("runtime".to_string());
                }
                if let Some(counterpart) = def.counterpart {
                    notes.push(format!("moves to {}", counterpart));
                }
                let _ = writeln!(
                    out,
                    "    {:>3} {:<22} {:<12} {}",
                    def.id,
                    def.name,
                    def.kind.to_string(),
                    notes.join(", ")
                );
            }
        }
    }
    out
}

/// Invalid menus and actions, depth first
pub fn invalid_items(store: &ObjectStore, roots: &[ObjectId]) -> Vec<ObjectId> {
    let mut invalid = Vec::new();
    let mut stack: Vec<ObjectId> = roots.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if store.kind(id) == Some(ObjectKind::Profile) {
            continue;
        }
        if !store.is_valid_cached(id) {
            invalid.push(id);
        }
        stack.extend(store.children(id).into_iter().rev());
    }
    invalid
}

/// Menus and actions of a subtree, the root first
pub fn subtree_items(store: &ObjectStore, root: ObjectId) -> Vec<ObjectId> {
    let mut items = vec![root];
    if store.kind(root) == Some(ObjectKind::Menu) {
        for child in store.children(root) {
            items.extend(subtree_items(store, child));
        }
    }
    items
}
