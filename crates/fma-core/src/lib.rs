pub mod data;
pub mod io;
pub mod kernel;
pub mod object;
pub mod provider;
pub mod storage;

// Re-export key public types for the binary and the io-provider plugins
pub use data::{BoxedData, BoxedType, BoxedValue, DataError, FieldDescriptor, SchemaGroup};
pub use io::{IoProvider, LoadedItems, ProviderRegistry};
pub use kernel::error::Error as KernelError;
pub use kernel::{Error, Result};
pub use object::{ItemCounts, ObjectId, ObjectKind, ObjectStore, Status, TreeError};
pub use provider::{FactoryProvider, ProviderError, ProviderStatus, read_item, write_item};
pub use storage::{ConfigData, ConfigFormat, LocalStorageProvider, Settings, StorageProvider};

#[cfg(test)]
mod tests;
