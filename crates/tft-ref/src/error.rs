use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RefError {
    #[error("invalid ref name: {0}")]
    InvalidName(String),

    #[error("symbolic ref cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("malformed ref '{name}': {reason}")]
    Malformed { name: String, reason: String },

    #[error(transparent)]
    Util(#[from] tft_utils::UtilError),

    #[error("I/O error on {path}: {source}")]
    IoPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
