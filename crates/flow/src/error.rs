//! Collaborator and configuration errors.

use thiserror::Error;

/// Finalizing the authentication transaction failed.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("credential has expired: {0}")]
    Expired(String),

    #[error("credential could not be verified: {0}")]
    Unverifiable(String),

    /// The authentication backend failed or was cancelled.
    #[error("authentication backend unavailable")]
    Unavailable(#[source] anyhow::Error),
}

/// Issuing a service ticket failed.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("no ticket-granting ticket in request")]
    MissingTicketGrantingTicket,

    #[error("no target service in request")]
    MissingService,

    #[error("ticket-granting ticket '{0}' is invalid or unknown")]
    InvalidTicket(String),

    #[error("ticket-granting ticket '{0}' has expired")]
    Expired(String),

    #[error("service '{0}' is not permitted to receive tickets")]
    UnauthorizedService(String),

    /// The ticket registry failed or was cancelled.
    #[error("ticket registry failure")]
    Registry(#[source] anyhow::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },

    #[error("malformed settings document: {0}")]
    Malformed(String),
}
