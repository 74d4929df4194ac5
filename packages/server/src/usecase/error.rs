//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{CatalogError, MessagePushError, RepositoryError, TransitionError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectError {
    #[error("failed to register participant: {0}")]
    Registration(#[from] RepositoryError),

    #[error("failed to notify participant: {0}")]
    Notify(#[from] MessagePushError),
}

/// コマンドがブロードキャストされずに破棄された理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyCommandError {
    /// 送信元が未登録（または切断済み）
    #[error("participant '{0}' is not connected")]
    NotConnected(String),

    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

impl From<RepositoryError> for ApplyCommandError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Rejected(e) => Self::Rejected(e),
            RepositoryError::ParticipantNotFound(id) | RepositoryError::AlreadyRegistered(id) => {
                Self::NotConnected(id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupVideoError {
    #[error("invalid video id: '{0}'")]
    InvalidVideoId(String),

    #[error("video '{0}' not found")]
    NotFound(String),

    #[error("video catalog unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<CatalogError> for LookupVideoError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound(id) => Self::NotFound(id),
            CatalogError::UpstreamUnavailable(reason) => Self::UpstreamUnavailable(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchVideosError {
    #[error("search query must not be blank")]
    EmptyQuery,

    #[error("video catalog unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<CatalogError> for SearchVideosError {
    fn from(error: CatalogError) -> Self {
        match error {
            // search never reports a missing video; treat it as an upstream fault
            CatalogError::NotFound(reason) | CatalogError::UpstreamUnavailable(reason) => {
                Self::UpstreamUnavailable(reason)
            }
        }
    }
}
