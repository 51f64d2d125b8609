use reqwest::StatusCode;
use thiserror::Error;

/// Why a request could not be authenticated.
///
/// Every variant converges on the same handling at this layer: the
/// authenticator clears local credential and session state and redirects
/// to the login view. Callers get the variant for logging, not branching.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no credential available to attach")]
    MissingCredential,

    #[error("access token expired with no refresh token stored")]
    ExpiredNoRefresh,

    #[error("refresh token expired")]
    ExpiredRefresh,

    #[error("refresh call rejected with status {0}")]
    RefreshFailed(StatusCode),

    #[error("refresh response contained no usable token")]
    MalformedRefreshResponse,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("token cannot be carried in a header: {0}")]
    InvalidBearer(#[from] reqwest::header::InvalidHeaderValue),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
