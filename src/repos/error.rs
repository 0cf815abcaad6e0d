/**
 * Responsibility
 * - the meaning a repo conveys upward
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] mongodb::error::Error),

    // Malformed ids are only discovered at query time, like any other
    // persistence failure.
    #[error("invalid id: {0}")]
    InvalidId(#[from] mongodb::bson::oid::Error),

    #[error("document decode error: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("no post matched the given id")]
    NotFound,
}
