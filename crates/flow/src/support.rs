//! Collaborator contracts consumed by the service-ticket flow.
//!
//! Each contract is narrow and object-safe so implementations can be swapped
//! (in-memory for tests/dev, registry/database-backed in production) without
//! touching the decision logic. Implementations must be safe for concurrent
//! use; the flow shares one instance across all in-flight requests.
//!
//! Timeouts and cancellation are the collaborator's business: whatever error
//! it returns is surfaced unchanged, never retried.

use std::sync::Arc;

use async_trait::async_trait;

use casflow_auth::{
    AccessDecision, AccessRequest, Authentication, AuthenticationResult, Credential,
    RegisteredService, Service,
};
use casflow_core::{ServiceTicketId, TicketGrantingTicketId};

use crate::error::{AuthenticationError, TicketError};

/// Read access to the authentication bound to a ticket-granting ticket.
#[async_trait]
pub trait TicketRegistrySupport: Send + Sync {
    /// `None` when the TGT is unknown, expired, or carries no authentication.
    async fn authentication_from(&self, tgt: &TicketGrantingTicketId) -> Option<Authentication>;
}

/// Lookup of registered service definitions.
#[async_trait]
pub trait ServicesManager: Send + Sync {
    async fn find_service_by(&self, service: &Service) -> Option<RegisteredService>;
}

/// Policy enforcement point for registered-service access strategies.
#[async_trait]
pub trait AccessStrategyEnforcer: Send + Sync {
    async fn enforce(&self, request: AccessRequest<'_>) -> AccessDecision;
}

/// Completes (or re-validates) an authentication transaction for a service.
///
/// `session` is the authentication already bound to the request's TGT, if it
/// resolved. A request that supplies no new credential is finalized against it.
#[async_trait]
pub trait AuthenticationSystemSupport: Send + Sync {
    async fn finalize_authentication(
        &self,
        service: &Service,
        credential: Option<&Credential>,
        session: Option<&Authentication>,
    ) -> Result<AuthenticationResult, AuthenticationError>;
}

/// Mints service tickets against ticket-granting tickets.
#[async_trait]
pub trait CentralAuthenticationService: Send + Sync {
    async fn grant_service_ticket(
        &self,
        tgt: &TicketGrantingTicketId,
        service: &Service,
        authentication_result: &AuthenticationResult,
    ) -> Result<ServiceTicketId, TicketError>;
}

/// The named collaborators a service-ticket resolver is composed from.
#[derive(Clone)]
pub struct Collaborators {
    pub ticket_registry: Arc<dyn TicketRegistrySupport>,
    pub services_manager: Arc<dyn ServicesManager>,
    pub access_enforcer: Arc<dyn AccessStrategyEnforcer>,
    pub authentication_system: Arc<dyn AuthenticationSystemSupport>,
    pub central_authentication_service: Arc<dyn CentralAuthenticationService>,
}

impl core::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
