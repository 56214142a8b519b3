//! # ethos-model
//!
//! Active-record style models built from a fixed set of declared fields.
//!
//! A [`Model`] keeps two maps: the declared fields with their default values,
//! and an overlay of values set since construction. Every read and write is
//! gated on the field being declared. Writes pass through the model's
//! [`FieldHooks`] (`validate`, then `filter`), and persistence is delegated to
//! a [`StorageAdapter`] chosen by the `storage` option.
//!
//! A value that fails validation is dropped silently: `set` still succeeds and
//! the overlay is untouched. Set the option `validation.strict` to `true` to
//! get [`ModelError::ValidationFailed`] instead.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use ethos_model::{Fields, MemoryStorage, Model};
//! use serde_json::{json, Value};
//!
//! let fields: Fields = [("title", Value::Null)].into_iter().collect();
//! let storage = Arc::new(MemoryStorage::new());
//! let mut model = Model::builder(fields)
//!     .storage(storage.clone())
//!     .build();
//!
//! model.set("title", "hello").unwrap().save().unwrap();
//! assert_eq!(model.get("title").unwrap(), json!("hello"));
//! assert_eq!(storage.save_count(), 1);
//! ```

mod error;
mod fields;
mod hooks;
mod model;
mod schema;

pub use error::ModelError;
pub use fields::{Fields, SharedFields};
pub use hooks::{DefaultHooks, FieldHooks};
pub use model::{Model, ModelBuilder, STORAGE_OPTION, STRICT_VALIDATION_OPTION};
pub use schema::SchemaHooks;

pub use ethos_options::{Options, OptionsError};
pub use ethos_storage::{FieldMap, MemoryStorage, StorageAdapter, StorageError, StorageRegistry};
