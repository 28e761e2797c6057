use crate::data::boxed::BoxedValue;
use crate::data::def::FieldDescriptor;
use crate::kernel::constants::CURRENT_VERSION;
use crate::object::store::{ObjectId, ObjectStore};
use crate::provider::status::ProviderStatus;

/// Storage backend contract: read or write one elementary value at a time.
///
/// The driver in [`crate::provider::driver`] walks the schema and calls these
/// methods; the backend only knows how one value is represented. Every
/// method but `name`, `read_data` and `write_data` has a default body.
pub trait FactoryProvider {
    /// Short name used in messages
    fn name(&self) -> &str;

    /// Version assumed for an object that does not state its own
    fn default_version(&self) -> u32 {
        CURRENT_VERSION
    }

    /// Whether the backend accepts writes at all
    fn is_willing_to_write(&self) -> bool {
        true
    }

    /// Whether this particular item can be written
    fn is_writable(&self, _store: &ObjectStore, _id: ObjectId) -> bool {
        true
    }

    /// Open the item's scope before its fields are read
    fn read_start(&mut self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) {}

    /// Read one field; `None` leaves it unset
    fn read_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        def: &'static FieldDescriptor,
        messages: &mut Vec<String>,
    ) -> Option<BoxedValue>;

    /// Close the item's scope; backends load nested children here
    fn read_done(&mut self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) {}

    fn write_start(&mut self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        ProviderStatus::Ok
    }

    /// Write one materialized field
    fn write_data(
        &mut self,
        store: &ObjectStore,
        id: ObjectId,
        value: &BoxedValue,
        messages: &mut Vec<String>,
    ) -> ProviderStatus;

    /// Finish the item; nested children are written here
    fn write_done(&mut self, _store: &mut ObjectStore, _id: ObjectId, _messages: &mut Vec<String>) -> ProviderStatus {
        ProviderStatus::Ok
    }
}
