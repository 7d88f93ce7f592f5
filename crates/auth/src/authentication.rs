use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Attributes, Principal, Service};

/// An established authentication event bound to a ticket-granting ticket.
///
/// Resolved from the ticket registry, never constructed by the flow itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    pub principal: Principal,

    /// Attributes of the authentication event (method, handler, etc).
    #[serde(default)]
    pub attributes: Attributes,

    pub authenticated_at: DateTime<Utc>,
}

impl Authentication {
    pub fn new(principal: Principal, authenticated_at: DateTime<Utc>) -> Self {
        Self {
            principal,
            attributes: Attributes::new(),
            authenticated_at,
        }
    }
}

/// Outcome of finalizing an authentication transaction for a target service.
///
/// This is what a service ticket gets bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    pub authentication: Authentication,
    pub service: Service,

    /// `true` when fresh credentials were validated in this transaction
    /// (as opposed to reusing the SSO session).
    pub credentials_provided: bool,
}

impl AuthenticationResult {
    pub fn principal(&self) -> &Principal {
        &self.authentication.principal
    }
}
