use thiserror::Error;

/// Result type alias for keyclaim operations
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Errors that can occur while processing or sending an update
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Request body was malformed, oversized, or used the wrong method
    #[error("bad request: {0}")]
    Transport(String),

    /// Subdomain failed the name constraint
    #[error("invalid name: {0}")]
    NameSyntax(String),

    /// Request timestamp fell outside the replay window
    #[error("request timestamp {timestamp} outside tolerance of server time {now}")]
    ReplayWindow {
        /// Timestamp claimed by the request
        timestamp: i64,
        /// Server time when the request was checked
        now: i64,
    },

    /// Public key or signature failed to decode to the expected shape
    #[error("failed to decode key material: {0}")]
    KeyDecode(String),

    /// Signature did not verify against the claimed public key
    #[error("failed to verify signature")]
    SignatureInvalid,

    /// Too many requests from this public key within the window
    #[error("too many requests")]
    RateLimitExceeded,

    /// Name has pre-existing records not managed by this protocol
    #[error("{fqdn} looks like a reserved entry")]
    ReservedName {
        /// The fully-qualified name that was refused
        fqdn: String,
    },

    /// Name is already claimed by a different key
    #[error("{fqdn} is owned by another key")]
    OwnershipConflict {
        /// The fully-qualified name that was refused
        fqdn: String,
    },

    /// Record store read or write failed
    #[error("record store error: {0}")]
    Store(String),

    /// HTTP request failed before a response arrived (client side)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server rejected the update (client side)
    #[error("server rejected update ({code}): {message}")]
    Rejected {
        /// HTTP status code from the server
        code: u16,
        /// Response body from the server
        message: String,
    },

    /// Key generation failed
    #[error("failed to generate key: {0}")]
    KeyGeneration(String),

    /// Configuration is invalid or missing required fields
    #[error("config error: {0}")]
    Config(String),

    /// IO error (key file reads/writes, config files)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpdateError {
    /// HTTP status code the server reports for this error kind
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Transport(_)
            | Self::NameSyntax(_)
            | Self::ReplayWindow { .. }
            | Self::KeyDecode(_)
            | Self::SignatureInvalid => 400,
            Self::ReservedName { .. } => 401,
            Self::OwnershipConflict { .. } => 403,
            Self::RateLimitExceeded => 429,
            _ => 500,
        }
    }

    /// Returns true if the request was rejected for a reason the client
    /// can fix by correcting and resending
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}
