//! # FMA Core Data
//!
//! The reflection-like layer every editable object is built on:
//!
//! - [`types`] - the elementary [`BoxedType`]s and their behaviour table
//! - [`boxed`] - [`BoxedData`] payloads and [`BoxedValue`]s bound to a field
//! - [`def`] - [`FieldDescriptor`] rows and [`SchemaGroup`]s
//! - [`schema`] - the static, append-only schema tables
pub mod boxed;
pub mod def;
pub mod error;
pub mod schema;
pub mod types;

pub use boxed::{BoxedData, BoxedValue};
pub use def::{FieldDescriptor, SchemaGroup, lookup};
pub use error::DataError;
pub use types::{BoxedType, PropertySpec, TypeInfo, type_info};
