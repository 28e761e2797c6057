//! # FMA Core Factory Provider Driver
//!
//! Generic read and write of one item through a [`FactoryProvider`].
//!
//! Reading tolerates per-field failures: a field the backend cannot decode
//! is reported in the message list and left unset. Writing stops at the
//! first field the backend refuses; fields already sent are not rolled back.
use log::{debug, error, trace};

use crate::object::store::{ObjectId, ObjectStore};
use crate::provider::migration::migrate_obsoleted;
use crate::provider::status::ProviderStatus;
use crate::provider::traits::FactoryProvider;

/// Effective version of an object: its own, or the provider's default
fn effective_version<P>(store: &ObjectStore, provider: &P, id: ObjectId) -> u32
where
    P: FactoryProvider + ?Sized,
{
    store
        .kind(id)
        .and_then(|kind| kind.hooks().get_version(store, id))
        .unwrap_or_else(|| provider.default_version())
}

/// Populate an allocated object from a provider.
///
/// The object's `id` field should already be set: backends key their
/// storage on it.
pub fn read_item<P>(store: &mut ObjectStore, provider: &mut P, id: ObjectId, messages: &mut Vec<String>)
where
    P: FactoryProvider + ?Sized,
{
    let Some(kind) = store.kind(id) else {
        error!("read_item: object {} is disposed", id);
        return;
    };
    debug!("reading {} '{}' from {}", kind, store.identifier(id), provider.name());

    provider.read_start(store, id, messages);

    for group in kind.schema_groups() {
        // A group earlier in the schema may just have read the version field.
        let version = effective_version(store, provider, id);
        if !group.applies_to(version) {
            trace!("skipping group '{}' for version {}", group.name, version);
            continue;
        }
        for def in group.fields.iter().filter(|def| def.serializable) {
            let Some(value) = provider.read_data(store, id, def, messages) else {
                continue;
            };
            trace!("read '{}' = '{}'", def.name, value.to_display_string());
            if let Err(e) = store.set_boxed(id, value) {
                messages.push(format!("{}: {}: {}", provider.name(), store.identifier(id), e));
            }
        }
    }

    provider.read_done(store, id, messages);
    migrate_obsoleted(store, id, messages);
    kind.hooks().read_done(store, id, messages);
}

/// Write an object through a provider.
///
/// Returns the first non-OK status met; nothing after it is attempted.
pub fn write_item<P>(store: &mut ObjectStore, provider: &mut P, id: ObjectId, messages: &mut Vec<String>) -> ProviderStatus
where
    P: FactoryProvider + ?Sized,
{
    let Some(kind) = store.kind(id) else {
        error!("write_item: object {} is disposed", id);
        return ProviderStatus::ProgramError;
    };
    if !provider.is_willing_to_write() {
        debug!("{} is not willing to write", provider.name());
        return ProviderStatus::NotWillingToRun;
    }
    if !provider.is_writable(store, id) {
        debug!("{} cannot write '{}'", provider.name(), store.identifier(id));
        return ProviderStatus::NotWritable;
    }

    let status = kind.hooks().write_start(store, id, messages);
    if !status.is_ok() {
        return report(status, "write_start hook", store, id);
    }
    let status = provider.write_start(store, id, messages);
    if !status.is_ok() {
        return report(status, "provider write_start", store, id);
    }

    let version = effective_version(store, provider, id);
    for group in kind.schema_groups().iter().filter(|group| group.applies_to(version)) {
        for def in group.fields.iter().filter(|def| def.serializable) {
            let Some(value) = store.get(id, def.name) else {
                continue;
            };
            trace!("write '{}' = '{}'", def.name, value.to_display_string());
            let status = provider.write_data(store, id, value, messages);
            if !status.is_ok() {
                return report(status, def.name, store, id);
            }
        }
    }

    let status = provider.write_done(store, id, messages);
    if !status.is_ok() {
        return report(status, "provider write_done", store, id);
    }
    let status = kind.hooks().write_done(store, id, messages);
    if !status.is_ok() {
        return report(status, "write_done hook", store, id);
    }
    debug!("wrote '{}' to {}", store.identifier(id), provider.name());
    ProviderStatus::Ok
}

fn report(status: ProviderStatus, step: &str, store: &ObjectStore, id: ObjectId) -> ProviderStatus {
    if status == ProviderStatus::ProgramError {
        error!("writing '{}' failed at {}: {}", store.identifier(id), step, status);
    } else {
        debug!("writing '{}' stopped at {}: {}", store.identifier(id), step, status);
    }
    status
}
