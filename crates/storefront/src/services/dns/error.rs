//! DNS synchronization error types.

use std::fmt;

use thiserror::Error;

use shopforge_core::{DnsIpError, Notice, StoreId};

use crate::db::RepositoryError;
use crate::vercel::VercelError;

/// The storage step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsOperation {
    /// Loading the store before an action.
    Load,
    /// Writing a manually entered IP.
    UpdateIp,
    /// Writing the values fetched from the provider.
    FetchProvider,
}

impl fmt::Display for DnsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load store",
            Self::UpdateIp => "update DNS IP",
            Self::FetchProvider => "save provider DNS config",
        })
    }
}

/// Something a fetch needs that is not set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingConfig {
    /// The store has no custom domain.
    Domain,
    /// A provider credential is absent.
    Provider(&'static str),
}

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => f.write_str("store has no custom domain"),
            Self::Provider(what) => write!(f, "Vercel {what} is not configured"),
        }
    }
}

/// Errors that can occur during DNS synchronization.
///
/// Every variant is terminal for the invocation and maps to exactly one
/// notice through [`DnsSyncError::notice`].
#[derive(Debug, Error)]
pub enum DnsSyncError {
    /// Candidate IP is not a dotted quad. Nothing was written.
    #[error("invalid DNS IP: {0}")]
    Validation(#[from] DnsIpError),

    /// A required setting is missing. No request was sent.
    #[error("configuration error: {0}")]
    Configuration(MissingConfig),

    /// Provider request failed or returned a non-success status.
    #[error("provider error: {0}")]
    Provider(#[source] VercelError),

    /// No store has this id.
    #[error("store {0} not found")]
    StoreNotFound(StoreId),

    /// Reading or writing the store failed.
    #[error("failed to {operation}: {source}")]
    Persistence {
        operation: DnsOperation,
        #[source]
        source: RepositoryError,
    },
}

impl DnsSyncError {
    pub(crate) fn persistence(operation: DnsOperation, id: StoreId, source: RepositoryError) -> Self {
        match source {
            RepositoryError::NotFound => Self::StoreNotFound(id),
            source => Self::Persistence { operation, source },
        }
    }

    /// The notice shown to the store owner for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::Validation(_) => "Please enter a valid IP address (e.g., 216.198.79.193)",
            Self::Configuration(MissingConfig::Domain) => "No domain configured for this store.",
            Self::Configuration(MissingConfig::Provider(_)) => {
                "Vercel configuration not set up properly."
            }
            Self::Provider(_)
            | Self::Persistence {
                operation: DnsOperation::FetchProvider,
                ..
            } => "Failed to fetch DNS configuration from Vercel.",
            Self::Persistence {
                operation: DnsOperation::UpdateIp,
                ..
            } => "Failed to update DNS IP.",
            Self::Persistence {
                operation: DnsOperation::Load,
                ..
            } => "Failed to load store.",
            Self::StoreNotFound(_) => "Store not found.",
        };
        Notice::error(message)
    }
}

impl From<VercelError> for DnsSyncError {
    fn from(e: VercelError) -> Self {
        match e {
            VercelError::NotConfigured(what) => Self::Configuration(MissingConfig::Provider(what)),
            other => Self::Provider(other),
        }
    }
}
