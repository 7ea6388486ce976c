use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API responded with HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("failed to build client - invalid header value: {0}")]
    ReqwestHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("other error: {0}")]
    Other(String),
}

impl GithubError {
    /**
        The numeric HTTP status that caused this error, if any.
    */
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Reqwest(e) => e.status().map(|s| s.as_u16()),
            Self::Middleware(reqwest_middleware::Error::Reqwest(e)) => {
                e.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }
}

pub type GithubResult<T> = Result<T, GithubError>;
