#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network failure: {0}")]
    Network(String),

    #[error("plan {0} not found")]
    NotFound(uuid::Uuid),

    #[error("unparseable week start: {0:?}")]
    Parse(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
