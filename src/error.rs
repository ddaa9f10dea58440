use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read catalog at {path}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("unknown filter field `{0}`")]
    UnknownField(String),

    #[error("`{0}` is not a multi-select filter (expected foodTypes, diet or cuisines)")]
    NotASetField(String),
}
