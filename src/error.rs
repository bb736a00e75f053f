use thiserror::Error;

/// A page fetch that yielded no usable document. Never retried; the caller
/// decides how much of the surrounding crawl survives.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A listing that failed on a mandatory field. Optional-field misses never
/// surface here; they degrade to `None` inside the extractors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("mandatory field `{0}` not found")]
    MissingField(&'static str),

    #[error("mandatory field `{field}` has unparseable value `{value}`")]
    BadValue { field: &'static str, value: String },
}
