//! Error types for the fetch engine, cache and extraction algebra.

/// Provider-side failure raised by a [`crate::client::ProviderClient`].
///
/// `code` is the machine-readable error code reported by the provider
/// (e.g. `AccessDenied`, `NoSuchBucketPolicy`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service}.{method} failed with {code}: {message}")]
pub struct ProviderError {
    pub service: String,
    pub method: String,
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(
        service: impl Into<String>,
        method: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Cache document encoding errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid cache document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Backing store errors. Never fatal to a fetch; the response cache logs them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store io error: {message}")]
    Io { message: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Misuse of the extraction algebra.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// `flatten` met an element that is not an array.
    #[error("cannot flatten element {index}: expected array, found {kind}")]
    NotASequence { index: usize, kind: &'static str },
}

/// Errors that abort a fetch or a resource listing.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Provider call failed and no error policy was supplied.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Client for a profile/region/service could not be constructed.
    #[error("failed to connect to {service} (profile={profile:?}, region={region:?}): {source}")]
    Connect {
        profile: Option<String>,
        region: Option<String>,
        service: String,
        #[source]
        source: ProviderError,
    },

    /// Region discovery failed while building the default region list.
    #[error("failed to discover regions for {service}: {source}")]
    Discovery {
        service: String,
        #[source]
        source: ProviderError,
    },

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl FetchError {
    /// Provider error code, if the failure came from the provider.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Provider(e) => Some(&e.code),
            Self::Connect { source, .. } | Self::Discovery { source, .. } => Some(&source.code),
            Self::Query(_) => None,
        }
    }
}

/// Result type for fetches and listings.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
