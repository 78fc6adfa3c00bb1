//! Session-only object store used when every remote endpoint fails.
//!
//! Objects live in process memory and disappear with it. A reference from
//! this store is not a public URL and must not be shared as one.

use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_SCHEME: &str = "session://";

#[derive(Clone, Debug)]
pub struct SessionObject {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Default)]
pub struct SessionObjects {
    objects: RwLock<HashMap<String, SessionObject>>,
}

impl SessionObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep an object and return its `session://<uuid>/<file name>` reference.
    pub async fn store(&self, object: SessionObject) -> String {
        let reference = format!("{}{}/{}", SESSION_SCHEME, Uuid::new_v4(), object.file_name);
        self.objects.write().await.insert(reference.clone(), object);
        reference
    }

    pub async fn get(&self, reference: &str) -> Option<SessionObject> {
        self.objects.read().await.get(reference).cloned()
    }

    pub async fn remove(&self, reference: &str) -> Option<SessionObject> {
        self.objects.write().await.remove(reference)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

pub fn is_session_reference(reference: &str) -> bool {
    reference.starts_with(SESSION_SCHEME)
}
