//! YAML Patcher: rewrite one scalar in a YAML values file by dotted key path
//!
//! The document is never parsed as YAML. A line scanner finds the key by
//! indentation, and the value after its colon is replaced through a single
//! byte-span [`Edit`]. Comments, blank lines, key order and every other byte
//! stay exactly as they were.
//!
//! # Architecture
//!
//! - [`yaml`]: key-path locator, value rewriter and the [`YamlEditor`] tying
//!   them together.
//! - [`edit`]: the byte-span replacement primitive, in memory or on disk.
//! - [`store`]: the remote file store boundary (GitHub contents API, plus an
//!   in-memory store).
//! - [`workflow`]: fetch, patch, conditional write back.
//! - [`config`]: action inputs from `INPUT_*` environment variables.
//!
//! # Example
//!
//! ```
//! use yaml_patcher::{KeyPath, YamlEditor};
//!
//! let editor = YamlEditor::parse("app:\n  version: 1.0.0\n  name: demo\n");
//! let path = KeyPath::parse("app.version").unwrap();
//! let out = editor.set_value(&path, "2.0.0").unwrap();
//! assert_eq!(out, "app:\n  version: \"2.0.0\"\n  name: demo\n");
//! ```

pub mod config;
pub mod edit;
pub mod store;
pub mod workflow;
pub mod yaml;

// Re-exports
pub use config::{ActionInputs, ConfigError};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use store::{
    FileLocation, GitHubStore, MemoryStore, RemoteFile, RemoteFileStore, StoreError,
    VersionToken, WriteRequest,
};
pub use workflow::{
    plan_remote, update_remote, write_planned, PlannedUpdate, UpdateOutcome, UpdateRequest,
    WorkflowError,
};
pub use yaml::{
    locate, quote_value, rewrite, KeyPath, MatchResult, YamlEditor, YamlError, YamlPlan,
};
