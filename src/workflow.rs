//! Fetch, patch, write back.
//!
//! One pass, no retries. Any failure aborts before the write, so the remote
//! file either receives the complete new document or nothing.

use crate::config::ActionInputs;
use crate::store::{
    FileLocation, RemoteFile, RemoteFileStore, StoreError, VersionToken, WriteRequest,
};
use crate::yaml::{KeyPath, YamlEditor, YamlError, YamlPlan};
use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("failed to get file content for {location}: {source}")]
    Read {
        location: FileLocation,
        #[source]
        source: StoreError,
    },

    #[error("failed to update value in {location}: {source}")]
    Patch {
        location: FileLocation,
        #[source]
        source: YamlError,
    },

    #[error("failed to update file {location}: {source}")]
    Write {
        location: FileLocation,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Input(#[from] YamlError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub location: FileLocation,
    pub key: KeyPath,
    pub value: String,
    pub message: Option<String>,
}

impl UpdateRequest {
    pub fn new(location: FileLocation, key: KeyPath, value: impl Into<String>) -> Self {
        Self {
            location,
            key,
            value: value.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn from_inputs(inputs: &ActionInputs) -> Result<Self, YamlError> {
        let location = FileLocation::new(
            inputs.repository.as_str(),
            inputs.values_file.as_str(),
            inputs.branch.as_str(),
        );
        let key = KeyPath::parse(&inputs.version_key)?;
        Ok(Self {
            location,
            key,
            value: inputs.version.clone(),
            message: inputs.commit_message.clone(),
        })
    }

    /// The change description, generated from key and value when not given.
    pub fn commit_message(&self) -> String {
        match &self.message {
            Some(message) if !message.is_empty() => message.clone(),
            _ => format!("chore: update {} to {}", self.key, self.value),
        }
    }
}

/// A patched document that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub original: RemoteFile,
    /// `None` when the value is already set
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        sha_before: VersionToken,
        message: String,
    },
    /// The file already carried the value; nothing was written.
    Unchanged,
}

/// Read the file and compute the new document without writing it.
pub fn plan_remote<S>(store: &S, request: &UpdateRequest) -> Result<PlannedUpdate, WorkflowError>
where
    S: RemoteFileStore + ?Sized,
{
    if request.value.is_empty() {
        return Err(WorkflowError::Input(YamlError::EmptyValue));
    }

    let original = store
        .read(&request.location)
        .map_err(|source| WorkflowError::Read {
            location: request.location.clone(),
            source,
        })?;
    debug!(
        "read {} ({} bytes, sha {})",
        request.location,
        original.content.len(),
        original.sha
    );

    let patch_error = |source: YamlError| WorkflowError::Patch {
        location: request.location.clone(),
        source,
    };

    let editor = YamlEditor::from_path(&request.location.path, &original.content);
    let updated = match editor.plan(&request.key, &request.value).map_err(patch_error)? {
        YamlPlan::Edit(edit) => Some(
            edit.apply_to(&original.content)
                .map_err(|e| patch_error(YamlError::from(e)))?,
        ),
        YamlPlan::NoOp(reason) => {
            debug!("{}", reason);
            None
        }
    };

    Ok(PlannedUpdate { original, updated })
}

/// Write a planned update back with the token from the read it came from.
///
/// Does not read again: what was planned is exactly what gets written.
pub fn write_planned<S>(
    store: &S,
    request: &UpdateRequest,
    planned: PlannedUpdate,
) -> Result<UpdateOutcome, WorkflowError>
where
    S: RemoteFileStore + ?Sized,
{
    let Some(content) = planned.updated else {
        info!("{} already set to {}, skipping write", request.key, request.value);
        return Ok(UpdateOutcome::Unchanged);
    };

    let message = request.commit_message();
    let write = WriteRequest {
        content,
        sha: planned.original.sha.clone(),
        message: message.clone(),
    };
    store
        .write(&request.location, &write)
        .map_err(|source| WorkflowError::Write {
            location: request.location.clone(),
            source,
        })?;

    Ok(UpdateOutcome::Updated {
        sha_before: planned.original.sha,
        message,
    })
}

/// Read, patch and conditionally write back one file.
pub fn update_remote<S>(store: &S, request: &UpdateRequest) -> Result<UpdateOutcome, WorkflowError>
where
    S: RemoteFileStore + ?Sized,
{
    let planned = plan_remote(store, request)?;
    write_planned(store, request, planned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str, value: &str) -> UpdateRequest {
        UpdateRequest::new(
            FileLocation::new("acme/deploy", "values.yaml", "main"),
            KeyPath::parse(key).unwrap(),
            value,
        )
    }

    #[test]
    fn generated_commit_message() {
        assert_eq!(
            request("app.version", "1.2.3").commit_message(),
            "chore: update app.version to 1.2.3"
        );
        assert_eq!(
            request("app.version", "1.2.3")
                .with_message("bump")
                .commit_message(),
            "bump"
        );
    }

    #[test]
    fn from_inputs_splits_key() {
        let inputs = ActionInputs {
            repository: "/acme/deploy".to_string(),
            github_token: "t".to_string(),
            branch: "main".to_string(),
            values_file: "values.yaml".to_string(),
            version_key: "image.tag".to_string(),
            version: "v2".to_string(),
            commit_message: None,
            api_url: "https://api.github.com".to_string(),
        };
        let req = UpdateRequest::from_inputs(&inputs).unwrap();
        assert_eq!(req.key.parts(), &["image", "tag"]);
        assert_eq!(req.location.repository, "acme/deploy");
    }
}
