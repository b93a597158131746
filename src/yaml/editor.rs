use crate::edit::Edit;
use crate::yaml::errors::YamlError;
use crate::yaml::locator::{locate, MatchResult};
use crate::yaml::query::KeyPath;
use crate::yaml::rewriter::{plan_rewrite, BUFFER_NAME};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlPlan {
    Edit(Edit),
    NoOp(String),
}

/// A YAML document plus the file it came from, ready to be patched.
pub struct YamlEditor {
    file: PathBuf,
    content: String,
}

impl YamlEditor {
    pub fn parse(content: &str) -> Self {
        Self::from_path(BUFFER_NAME, content)
    }

    pub fn from_path(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            file: path.into(),
            content: content.to_string(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn locate(&self, path: &KeyPath) -> Result<MatchResult, YamlError> {
        locate(&self.content, path).ok_or_else(|| YamlError::KeyNotFound {
            path: path.as_string(),
        })
    }

    /// Plan setting `path` to `value`. Returns [`YamlPlan::NoOp`] when the line
    /// already reads exactly as it would after the edit.
    pub fn plan(&self, path: &KeyPath, value: &str) -> Result<YamlPlan, YamlError> {
        if value.is_empty() {
            return Err(YamlError::EmptyValue);
        }

        let m = self.locate(path)?;
        let edit = plan_rewrite(self.file.clone(), &self.content, &m, value)?;

        if edit.is_applied_in(&self.content) {
            return Ok(YamlPlan::NoOp(format!("{} already set to {}", path, value)));
        }

        Ok(YamlPlan::Edit(edit))
    }

    /// Return the document with `path` set to `value`.
    pub fn set_value(&self, path: &KeyPath, value: &str) -> Result<String, YamlError> {
        match self.plan(path, value)? {
            YamlPlan::Edit(edit) => Ok(edit.apply_to(&self.content)?),
            YamlPlan::NoOp(_) => Ok(self.content.clone()),
        }
    }

    /// The raw text after the key's colon on the matched line, trimmed.
    pub fn current_value(&self, path: &KeyPath) -> Result<&str, YamlError> {
        let m = self.locate(path)?;
        let rest = &self.content[m.key_end()..];
        let line = rest.split('\n').next().unwrap_or("");
        let value = line.trim_start().strip_prefix(':').unwrap_or(line);
        Ok(value.trim())
    }
}
