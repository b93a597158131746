//! The remote file store boundary.
//!
//! A store hands out decoded file text together with a version token, and
//! accepts a write only if the caller presents the token it read. Transport
//! encoding lives entirely inside each implementation.

pub mod encoding;
pub mod errors;
pub mod github;
pub mod memory;

pub use errors::StoreError;
pub use github::GitHubStore;
pub use memory::MemoryStore;

use std::fmt;

/// Where a file lives: repository, path inside it, and the branch to use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileLocation {
    /// `owner/name`
    pub repository: String,
    pub path: String,
    pub branch: String,
}

impl FileLocation {
    pub fn new(
        repository: impl Into<String>,
        path: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into().trim_matches('/').to_string(),
            path: path.into().trim_start_matches('/').to_string(),
            branch: branch.into(),
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.repository, self.path, self.branch)
    }
}

/// Opaque content hash guarding against concurrent overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(pub String);

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded file text
    pub content: String,
    pub sha: VersionToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// New file text, not yet transport-encoded
    pub content: String,
    /// Token from the read this write is based on
    pub sha: VersionToken,
    pub message: String,
}

pub trait RemoteFileStore {
    fn read(&self, location: &FileLocation) -> Result<RemoteFile, StoreError>;

    /// Conditional update: fails with [`StoreError::Conflict`] if the remote
    /// content no longer matches `request.sha`.
    fn write(&self, location: &FileLocation, request: &WriteRequest) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_trims_slashes() {
        let loc = FileLocation::new("/acme/deploy/", "/app/values.yaml", "main");
        assert_eq!(loc.repository, "acme/deploy");
        assert_eq!(loc.path, "app/values.yaml");
        assert_eq!(loc.to_string(), "acme/deploy:app/values.yaml@main");
    }
}
