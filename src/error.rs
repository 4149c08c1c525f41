use thiserror::Error;

/// Everything that can go wrong between the client and the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, DNS or body-read failure
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx body that reports `success: false` or an explicit error
    #[error("{0}")]
    Application(String),

    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            msg
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
