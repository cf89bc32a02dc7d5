use thiserror::Error;

/// Errors that can occur when loading, training or querying a rating model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read or write model artifact {path}: {reason}")]
    Artifact { path: String, reason: String },

    #[error("Unsupported model format version {found} (expected {expected})")]
    FormatVersion { found: u32, expected: u32 },

    #[error("Cannot condition the model on an empty profile")]
    EmptyProfile,

    #[error("Fold-in system for the pseudo-user is singular")]
    SingularSystem,

    #[error("Training failed: {0}")]
    Training(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
