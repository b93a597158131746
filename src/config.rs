//! Action inputs.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables, the GitHub Actions
//! convention. An empty variable counts as unset.

use crate::store::github::DEFAULT_API_URL;
use std::env;
use thiserror::Error;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_VALUES_FILE: &str = "app/values/values.beta.yaml";
pub const DEFAULT_VERSION_KEY: &str = "version";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} input is required")]
    Missing { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    pub repository: String,
    pub github_token: String,
    pub branch: String,
    pub values_file: String,
    pub version_key: String,
    pub version: String,
    pub commit_message: Option<String>,
    pub api_url: String,
}

fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.to_uppercase())
}

impl ActionInputs {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Resolve inputs through `lookup`, which maps an environment variable
    /// name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());
        let input = |name: &str| get(&input_var(name));
        let required = |name: &'static str| input(name).ok_or(ConfigError::Missing { name });

        Ok(Self {
            repository: required("repository")?,
            github_token: required("github_token")?,
            branch: input("branch").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            values_file: input("values_file").unwrap_or_else(|| DEFAULT_VALUES_FILE.to_string()),
            version_key: input("version_key").unwrap_or_else(|| DEFAULT_VERSION_KEY.to_string()),
            version: required("version")?,
            commit_message: input("commit_message"),
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
