//! Error types for the calls made during a run.
//!
//! # Design
//! - One enum per collaborator so log lines name the failing phase.
//! - Transport errors are stripped of their URL before being stored; request
//!   URLs may carry the media server token as a query parameter.
//! - Only [`GatedError`] reaches the failure policy. Notification failures are
//!   logged where they happen and never change the run result.

use thiserror::Error;

/// Failure while parsing an XML document returned by the media server.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The document is not well-formed.
    #[error("invalid XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    /// The document has no root element.
    #[error("document has no root element")]
    Empty,
    /// A required attribute is absent from the root element.
    #[error("root element has no '{0}' attribute")]
    MissingAttribute(&'static str),
}

/// Failure while obtaining an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The sign-in request could not be completed.
    #[error("sign-in request to {url} failed: {source}")]
    Transport {
        /// Sign-in endpoint.
        url: String,
        /// Underlying HTTP error.
        source: reqwest::Error,
    },
    /// The sign-in endpoint rejected the credentials or failed.
    #[error("sign-in at {url} returned HTTP {status}")]
    Status {
        /// Sign-in endpoint.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// The sign-in response did not carry a usable token.
    #[error("sign-in response from {url} was malformed: {source}")]
    Malformed {
        /// Sign-in endpoint.
        url: String,
        /// Parse failure.
        source: XmlError,
    },
}

/// Failure while listing library sections.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The base URL cannot carry a path.
    #[error("cannot build the section listing URL from {url}")]
    Endpoint {
        /// Configured server URL.
        url: String,
    },
    /// The listing request could not be completed.
    #[error("section listing request to {url} failed: {source}")]
    Transport {
        /// Listing endpoint without query parameters.
        url: String,
        /// Underlying HTTP error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("section listing at {url} returned HTTP {status}")]
    Status {
        /// Listing endpoint without query parameters.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// The listing body could not be parsed.
    #[error("section listing from {url} was malformed: {source}")]
    Malformed {
        /// Listing endpoint without query parameters.
        url: String,
        /// Parse failure.
        source: XmlError,
    },
}

/// Failure while refreshing one library section.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The base URL cannot carry a path.
    #[error("cannot build the refresh URL for section {section}")]
    Endpoint {
        /// Section identifier.
        section: String,
    },
    /// The refresh request could not be completed.
    #[error("refresh of section {section} failed: {source}")]
    Transport {
        /// Section identifier.
        section: String,
        /// Underlying HTTP error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("refresh of section {section} returned HTTP {status}")]
    Status {
        /// Section identifier.
        section: String,
        /// Response status code.
        status: u16,
    },
}

/// Failure while choosing which sections to refresh.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetingError {
    /// The job category is not listed as a movie or TV category.
    #[error("category '{category}' does not match any movie or TV category")]
    CategoryMismatch {
        /// Job category as received.
        category: String,
    },
}

/// Failure while notifying one media-center client.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The client address cannot form a URL.
    #[error("client address '{address}' is not a valid host")]
    InvalidAddress {
        /// Address as configured.
        address: String,
    },
    /// The notification request could not be completed.
    #[error("notification to {address} failed: {source}")]
    Transport {
        /// Address as configured.
        address: String,
        /// Underlying HTTP error.
        source: reqwest::Error,
    },
    /// The client answered with a non-success status.
    #[error("notification to {address} returned HTTP {status}")]
    Status {
        /// Address as configured.
        address: String,
        /// Response status code.
        status: u16,
    },
}

/// Errors subject to the failure policy.
#[derive(Debug, Error)]
pub enum GatedError {
    /// Token resolution failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Section listing failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A section refresh failed.
    #[error(transparent)]
    Refresh(#[from] RefreshError),
    /// Section targeting failed.
    #[error(transparent)]
    Targeting(#[from] TargetingError),
}

impl GatedError {
    /// Phase of the run that produced the error.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::Auth(_) => "authentication",
            Self::Catalog(_) => "section listing",
            Self::Refresh(_) => "section refresh",
            Self::Targeting(_) => "section targeting",
        }
    }
}
