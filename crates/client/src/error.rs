use caducados_core::DomainError;

/// Failures surfaced by the client drivers.
///
/// Each variant maps to one short alert text through [`ClientError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({0}): {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("login rejected")]
    LoginRejected,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation cancelled")]
    Cancelled,

    /// A move or swap stopped part way. The grid has been refetched.
    #[error("relocation failed: {0}")]
    RelocationFailed(#[source] Box<ClientError>),
}

impl ClientError {
    /// Text for an alert. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Could not reach the server. Check the connection.".into(),
            ClientError::Api(status, _) => format!("The server rejected the request ({status})."),
            ClientError::Parse(_) => "The server sent an unexpected response.".into(),
            ClientError::Domain(e) => e.to_string(),
            ClientError::Config(msg) => format!("Invalid configuration: {msg}"),
            ClientError::LoginRejected => "Wrong store or password.".into(),
            ClientError::NotFound(what) => format!("{what} not found."),
            ClientError::Cancelled => "Cancelled.".into(),
            ClientError::RelocationFailed(_) => "Could not relocate the product.".into(),
        }
    }
}
