use crate::store::encoding::{decode_content, encode_content};
use crate::store::errors::StoreError;
use crate::store::{FileLocation, RemoteFile, RemoteFileStore, VersionToken, WriteRequest};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    #[serde(default)]
    encoding: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

/// File store backed by the GitHub repository contents API.
pub struct GitHubStore {
    agent: ureq::Agent,
    api_url: String,
    token: String,
}

impl GitHubStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    /// Point at a different API root, e.g. a GitHub Enterprise host.
    pub fn with_api_url(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("yaml-patcher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn contents_url(&self, location: &FileLocation) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_url, location.repository, location.path
        )
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("Authorization", &format!("token {}", self.token))
            .set("Accept", ACCEPT)
    }
}

/// Map a ureq failure onto the store taxonomy, reading the body for context.
fn request_error(url: &str, err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response
                .into_string()
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            StoreError::Status {
                url: url.to_string(),
                status,
                body,
            }
        }
        ureq::Error::Transport(transport) => StoreError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

impl RemoteFileStore for GitHubStore {
    fn read(&self, location: &FileLocation) -> Result<RemoteFile, StoreError> {
        let url = self.contents_url(location);
        debug!("GET {} (ref {})", url, location.branch);

        let response = self
            .authorized(self.agent.get(&url))
            .query("ref", &location.branch)
            .call()
            .map_err(|e| request_error(&url, e))?;

        if response.status() != 200 {
            let status = response.status();
            return Err(StoreError::Status {
                url,
                status,
                body: response.into_string().unwrap_or_default(),
            });
        }

        let body: ContentsResponse = response
            .into_json()
            .map_err(|e| StoreError::Decode(format!("invalid contents response: {e}")))?;

        if !body.encoding.is_empty() && body.encoding != "base64" {
            return Err(StoreError::Decode(format!(
                "unsupported content encoding '{}'",
                body.encoding
            )));
        }

        Ok(RemoteFile {
            content: decode_content(&body.content)?,
            sha: VersionToken(body.sha),
        })
    }

    fn write(&self, location: &FileLocation, request: &WriteRequest) -> Result<(), StoreError> {
        let url = self.contents_url(location);
        debug!("PUT {} (branch {}, sha {})", url, location.branch, request.sha);

        let body = UpdateBody {
            message: &request.message,
            content: encode_content(&request.content),
            sha: &request.sha.0,
            branch: &location.branch,
        };

        let response = self
            .authorized(self.agent.put(&url))
            .send_json(&body)
            .map_err(|e| match request_error(&url, e) {
                // 409: sha does not match; 422: sha missing or stale
                StoreError::Status {
                    status: status @ (409 | 422),
                    body,
                    ..
                } => StoreError::Conflict { status, body },
                other => other,
            })?;

        match response.status() {
            200 | 201 => {
                info!("updated {} on {}", location.path, location.branch);
                Ok(())
            }
            status => Err(StoreError::Status {
                url,
                status,
                body: response.into_string().unwrap_or_default(),
            }),
        }
    }
}
