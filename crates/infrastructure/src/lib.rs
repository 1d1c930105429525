//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_native_permissions;
mod in_memory_record_store;
mod json_config_loader;

pub use in_memory_native_permissions::InMemoryNativePermissions;
pub use in_memory_record_store::InMemoryRecordStore;
pub use json_config_loader::load_config_file;
