use thiserror::Error;

/// Errors surfaced by the preference store.
///
/// `InvalidArgument` is always raised before any storage access. The
/// credential variants are terminal results for the call that produced
/// them and are never retried internally; `CorruptedCredential` is raised
/// only after the damaged record has been purged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("password does not match the stored password")]
    PasswordMismatch,

    #[error("no password has been set")]
    NoPasswordSet,

    #[error("credential record was corrupted and has been purged")]
    CorruptedCredential,

    #[error("document {namespace} is corrupted")]
    DocumentCorrupted { namespace: String },

    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("document encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub(crate) fn invalid(what: &str, problem: &str) -> Self {
        StoreError::InvalidArgument(format!("{what}: {problem}"))
    }
}
