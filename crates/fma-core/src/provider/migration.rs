//! Relocation of obsoleted fields into a synthesized child.
//!
//! Before version 2 an action carried its command and conditions inline.
//! Those values now live in a profile: on read they are moved, not copied,
//! into exactly one new child. Deeper legacy nesting is not handled.
use log::{info, warn};

use crate::data::boxed::{BoxedData, BoxedValue};
use crate::kernel::constants::{CURRENT_VERSION, CURRENT_VERSION_STR, LEGACY_PROFILE_LABEL};
use crate::object::store::{ObjectId, ObjectStore};

/// Move every materialized obsoleted field of `id` into a new legacy child.
///
/// Returns the child, or `None` when there was nothing to migrate.
pub fn migrate_obsoleted(store: &mut ObjectStore, id: ObjectId, messages: &mut Vec<String>) -> Option<ObjectId> {
    let kind = store.kind(id)?;
    let mut obsoleted = Vec::new();
    store.iter_fields(id, |value| {
        if value.def().obsoleted && value.def().counterpart.is_some() {
            obsoleted.push(value.name());
        }
        true
    });
    if obsoleted.is_empty() {
        return None;
    }
    let Some((child_kind, child_id)) = kind.hooks().legacy_child() else {
        warn!("{} '{}' has obsoleted fields but no legacy child", kind, store.identifier(id));
        return None;
    };

    let child = store.create_with_id(child_kind, child_id);
    if let Err(e) = store.set(child, "label", BoxedData::LocaleString(LEGACY_PROFILE_LABEL.to_string())) {
        messages.push(format!("{}: {}", store.identifier(id), e));
    }

    for name in obsoleted {
        let Some(value) = store.unset(id, name) else {
            continue;
        };
        if let Err(e) = rebind(store, child, value) {
            messages.push(format!("{}: unable to migrate '{}': {}", store.identifier(id), name, e));
        }
    }

    if let Err(e) = store.append_child(id, child) {
        messages.push(format!("{}: {}", store.identifier(id), e));
        store.dispose(child);
        return None;
    }
    let upgraded = store
        .set(id, "version", BoxedData::String(CURRENT_VERSION_STR.to_string()))
        .and_then(|_| store.set(id, "iversion", BoxedData::UInt(CURRENT_VERSION)));
    if let Err(e) = upgraded {
        messages.push(format!("{}: {}", store.identifier(id), e));
    }

    info!("migrated legacy {} '{}' into '{}'", kind, store.identifier(id), child_id);
    Some(child)
}

/// Re-bind a value to its counterpart descriptor and attach it to `child`
fn rebind(store: &mut ObjectStore, child: ObjectId, mut value: BoxedValue) -> crate::kernel::Result<()> {
    let counterpart = value.def().counterpart.unwrap_or_default();
    let def = store.descriptor(child, counterpart)?;
    value.set_def(def)?;
    store.set_boxed(child, value)?;
    Ok(())
}
