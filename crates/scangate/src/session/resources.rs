//! Locally addressable result resources.
//!
//! A [`ResourceStore`] hands out short-lived handles the presentation layer
//! can use to display or download a result without re-fetching it. Handles
//! are a scarce resource: each [`ResourceRef`] releases its entry when
//! dropped, so a superseded result frees its backing bytes the moment it is
//! replaced and the store count never drifts.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use uuid::Uuid;

type Entries = Arc<Mutex<HashMap<Uuid, Arc<ResourceData>>>>;

/// The bytes and content metadata backing one resource handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceData {
    media_type: String,
    bytes: Vec<u8>,
}

impl ResourceData {
    /// MIME type of the stored payload.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The stored payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Registry of live result resources.
///
/// Cheap to clone; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    entries: Entries,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload and return the handle addressing it.
    pub fn alloc(&self, media_type: impl Into<String>, bytes: Vec<u8>) -> ResourceRef {
        let id = Uuid::new_v4();
        let data = Arc::new(ResourceData {
            media_type: media_type.into(),
            bytes,
        });
        self.entries.lock().insert(id, data);
        ResourceRef {
            id,
            entries: Arc::clone(&self.entries),
        }
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Handle to one stored resource; releases the entry on drop.
///
/// Deliberately not `Clone`: exactly one handle owns each entry, which is
/// what makes the release-on-supersede discipline hold.
pub struct ResourceRef {
    id: Uuid,
    entries: Entries,
}

impl ResourceRef {
    /// Identifier of the stored resource.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The stored payload; present for the lifetime of this handle.
    pub fn data(&self) -> Option<Arc<ResourceData>> {
        self.entries.lock().get(&self.id).cloned()
    }
}

impl Drop for ResourceRef {
    fn drop(&mut self) {
        self.entries.lock().remove(&self.id);
    }
}

impl std::fmt::Debug for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRef").field("id", &self.id).finish()
    }
}
