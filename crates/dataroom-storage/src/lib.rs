//! Dataroom Storage Library
//!
//! Storage abstraction and implementations (local filesystem, S3) for the
//! upload service.
//!
//! # Storage key format
//!
//! Every stored object lives under a logical bucket: `{bucket}/{object_name}`.
//! Object names are generated (`{stem}-{random}.{ext}`) so uploads never
//! collide and never reuse client-supplied paths.
//!
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use dataroom_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{generate_object_name, storage_key, validate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
