use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type. Script failures keep the boxed rhai error so
/// position information survives up to the CLI.
#[derive(Debug, Error)]
pub enum Error {
    #[error("task '{0}' is not registered and has no remote mapping")]
    UnknownTask(String),

    #[error("task script failed: {0}")]
    Script(#[from] Box<rhai::EvalAltResult>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("directory scan failed: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("failed to fetch snippet '{id}': {source}")]
    Fetch {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("snippet '{0}' contains no usable files")]
    EmptySnippet(String),

    #[error("installing declared requirements failed: {0}")]
    Install(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("dependency cycle detected at task '{0}'")]
    DependencyCycle(String),
}
