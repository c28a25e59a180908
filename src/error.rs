use thiserror::Error;

/// Failures of the path and shell resolution. Each one aborts the invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No such directory '{0}'")]
    NoSuchDirectory(String),

    #[error("Unable to find any suitable shell")]
    NoSuitableShell,
}

impl ResolveError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::NoSuitableShell => 1,
            ResolveError::NoSuchDirectory(_) => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
