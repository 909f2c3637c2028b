use thiserror::Error;

/// Rejections from the profile form; `Display` is what the status line shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("Error: Name is required")]
    NameRequired,

    #[error("Error: Host is required")]
    HostRequired,

    #[error("Error: Username is required")]
    UsernameRequired,

    #[error("Error: Use either password OR private key, not both")]
    PasswordAndKey,

    #[error("Error: Invalid port number")]
    InvalidPort,

    #[error("Error: Invalid SFTP port number")]
    InvalidTransferPort,

    #[error(
        "Error: Invalid private key format (must include -----BEGIN ... PRIVATE KEY----- and -----END ... PRIVATE KEY-----)"
    )]
    InvalidKey,
}

#[derive(Debug, Error)]
pub(crate) enum ConnectError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("connection failed: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub(crate) enum TransferError {
    #[error("No file selected")]
    NoSelection,

    #[error("Cannot copy directories")]
    CopyDirectory,

    #[error("Cannot delete directories")]
    DeleteDirectory,

    #[error("Error uploading: {0:#}")]
    Upload(anyhow::Error),

    #[error("Error downloading: {0:#}")]
    Download(anyhow::Error),

    #[error("Error deleting: {0:#}")]
    Delete(anyhow::Error),
}
