use crate::store::errors::StoreError;
use crate::store::{FileLocation, RemoteFile, RemoteFileStore, VersionToken, WriteRequest};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<FileLocation, RemoteFile>,
    writes: Vec<(FileLocation, WriteRequest)>,
}

/// In-process store with the same conditional-write rules as a remote one.
///
/// Tokens are xxh3 hashes of the content, so two stores holding the same text
/// hand out the same token.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

pub fn content_token(content: &str) -> VersionToken {
    VersionToken(format!("{:016x}", xxh3_64(content.as_bytes())))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, location: FileLocation, content: impl Into<String>) -> VersionToken {
        let content = content.into();
        let sha = content_token(&content);
        self.lock().files.insert(
            location,
            RemoteFile {
                content,
                sha: sha.clone(),
            },
        );
        sha
    }

    pub fn content(&self, location: &FileLocation) -> Option<String> {
        self.lock().files.get(location).map(|f| f.content.clone())
    }

    /// Every accepted write, oldest first.
    pub fn writes(&self) -> Vec<(FileLocation, WriteRequest)> {
        self.lock().writes.clone()
    }
}

impl RemoteFileStore for MemoryStore {
    fn read(&self, location: &FileLocation) -> Result<RemoteFile, StoreError> {
        self.lock()
            .files
            .get(location)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(location.to_string()))
    }

    fn write(&self, location: &FileLocation, request: &WriteRequest) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let current = inner
            .files
            .get(location)
            .ok_or_else(|| StoreError::NotFound(location.to_string()))?;

        if current.sha != request.sha {
            return Err(StoreError::Conflict {
                status: 409,
                body: format!("{} does not match {}", request.sha, current.sha),
            });
        }

        inner.files.insert(
            location.clone(),
            RemoteFile {
                content: request.content.clone(),
                sha: content_token(&request.content),
            },
        );
        inner.writes.push((location.clone(), request.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> FileLocation {
        FileLocation::new("acme/deploy", "values.yaml", "main")
    }

    #[test]
    fn read_returns_inserted_content() {
        let store = MemoryStore::new();
        let sha = store.insert(loc(), "tag: v1\n");
        let file = store.read(&loc()).unwrap();
        assert_eq!(file.content, "tag: v1\n");
        assert_eq!(file.sha, sha);
    }

    #[test]
    fn read_missing_file() {
        let store = MemoryStore::new();
        assert!(matches!(store.read(&loc()), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn write_with_stale_token_conflicts() {
        let store = MemoryStore::new();
        store.insert(loc(), "tag: v1\n");
        let request = WriteRequest {
            content: "tag: v2\n".to_string(),
            sha: VersionToken("stale".to_string()),
            message: "m".to_string(),
        };
        assert!(matches!(
            store.write(&loc(), &request),
            Err(StoreError::Conflict { .. })
        ));
        assert_eq!(store.content(&loc()).unwrap(), "tag: v1\n");
        assert!(store.writes().is_empty());
    }

    #[test]
    fn write_rotates_token() {
        let store = MemoryStore::new();
        let sha = store.insert(loc(), "tag: v1\n");
        let request = WriteRequest {
            content: "tag: v2\n".to_string(),
            sha: sha.clone(),
            message: "m".to_string(),
        };
        store.write(&loc(), &request).unwrap();
        let file = store.read(&loc()).unwrap();
        assert_eq!(file.content, "tag: v2\n");
        assert_ne!(file.sha, sha);
        // The old token is now stale
        assert!(store.write(&loc(), &request).is_err());
    }
}
