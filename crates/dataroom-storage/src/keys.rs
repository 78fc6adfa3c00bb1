//! Storage key construction and validation shared by all backends.

use crate::traits::{StorageError, StorageResult};

pub use dataroom_core::naming::generate_object_name;

/// Storage key for an object in a logical bucket.
pub fn storage_key(bucket: &str, object_name: &str) -> String {
    format!("{}/{}", bucket.trim_matches('/'), object_name.trim_start_matches('/'))
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty()
        || storage_key.contains("..")
        || storage_key.starts_with('/')
        || storage_key.contains('\\')
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_fit_a_bucket_key() {
        let key = storage_key("uploads", &generate_object_name("deck.pdf"));
        assert!(key.starts_with("uploads/deck-"));
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn storage_key_joins_bucket() {
        assert_eq!(storage_key("uploads", "deck.pdf"), "uploads/deck.pdf");
        assert_eq!(storage_key("/uploads/", "/deck.pdf"), "uploads/deck.pdf");
    }

    #[test]
    fn validate_key_rejects_traversal() {
        assert!(validate_key("uploads/../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("uploads/deck.pdf").is_ok());
    }
}
