//! Error types shared by the HTTP wrapper, the paginators and the fetchers.
//!
//! Listing-level failures ([`FetchError`]) propagate to the caller. Failures on a
//! single commit's diff use the same types but are logged and dropped inside
//! [`crate::commits`].

use thiserror::Error;

/// Failure of a single HTTP round trip.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The method or URL could not be turned into a request.
    #[error("failed to create {method} request for {url}: {reason}")]
    RequestConstruction {
        method: String,
        url: String,
        reason: String,
    },

    /// The request was sent but no complete response came back (DNS, refused
    /// connection, timeout, truncated body).
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with anything other than 200.
    #[error("request to {url} failed with status: {status}")]
    UnexpectedStatus { url: String, status: u16 },
}

/// Failure while walking a paginated listing endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch page {page} of {url}: {source}")]
    PageFetch {
        url: String,
        page: u32,
        #[source]
        source: HttpError,
    },

    /// A single non-paginated request, such as one commit's diff statistics.
    #[error("failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: HttpError,
    },

    #[error("failed to parse {what} from {url}: {source}")]
    Parse {
        what: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
