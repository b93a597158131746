use crate::yaml::errors::YamlError;
use std::fmt;

/// Ordered mapping-key names identifying a nested scalar.
///
/// At the boundary a path is a dot-joined string (`app.version`); segments are
/// compared verbatim against the trimmed key of a `key: value` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    parts: Vec<String>,
}

impl KeyPath {
    pub fn parse(input: &str) -> Result<Self, YamlError> {
        if input.is_empty() {
            return Err(YamlError::InvalidKeyPath {
                input: input.to_string(),
                message: "empty key path".to_string(),
            });
        }

        let parts: Vec<String> = input.split('.').map(str::to_string).collect();
        if parts.iter().any(String::is_empty) {
            return Err(YamlError::InvalidKeyPath {
                input: input.to_string(),
                message: "empty path segment".to_string(),
            });
        }

        Ok(Self { parts })
    }

    /// Build a path from already-split segments. An empty path is allowed and
    /// simply never matches.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
