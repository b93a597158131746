use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("write rejected, remote content changed since read ({status}): {body}")]
    Conflict { status: u16, body: String },

    #[error("file not found in store: {0}")]
    NotFound(String),

    #[error("failed to decode file content: {0}")]
    Decode(String),
}
