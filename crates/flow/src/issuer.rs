//! Service-ticket issuance pipeline.
//!
//! ```text
//! RequestContext (TGT id, service, credential)
//!   ↓
//! 1. Resolve authentication (by TGT) and registered service (by service)
//!   ↓
//! 2. Enforce access strategy ── only when both resolved; denial aborts
//!   ↓
//! 3. Finalize authentication transaction ── failure aborts
//!   ↓
//! 4. Grant service ticket ── failure aborts
//!   ↓
//! 5. Write ticket id (+ warning marker) into the context
//! ```
//!
//! The first failure short-circuits the rest; nothing is retried and nothing
//! is written to the context unless every step succeeded.

use tracing::{debug, info, warn};

use casflow_auth::AccessRequest;
use casflow_core::ServiceTicketId;

use crate::context::RequestContext;
use crate::error::TicketError;
use crate::outcome::{FailureCause, Outcome, classify};
use crate::support::Collaborators;

/// Sequences access enforcement, authentication finalization and ticket
/// issuance for one request.
///
/// Holds no per-request state; a single instance serves concurrent requests.
/// Issuance is not deduplicated: two eligible requests for the same TGT and
/// service each get their own ticket.
#[derive(Debug, Clone)]
pub struct ServiceTicketIssuer {
    collaborators: Collaborators,
}

impl ServiceTicketIssuer {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Run the pipeline and classify the result.
    ///
    /// Returns `Granted` or `Failed`; deciding `NotApplicable` is the
    /// eligibility evaluator's job.
    pub async fn issue(&self, context: &mut RequestContext) -> Outcome {
        let outcome = classify(self.grant(context).await);
        match &outcome {
            Outcome::Granted(ticket) => info!(
                %ticket,
                warning = context.warning_marked(),
                "granted service ticket"
            ),
            Outcome::Failed(cause) => warn!(
                kind = cause.kind(),
                error = %cause,
                "failed to grant service ticket"
            ),
            Outcome::NotApplicable => {}
        }
        outcome
    }

    /// Grant a service ticket for the TGT, service and credential found in the
    /// request context.
    pub async fn grant(&self, context: &mut RequestContext) -> Result<ServiceTicketId, FailureCause> {
        let tgt = context
            .ticket_granting_ticket_id()
            .cloned()
            .ok_or(TicketError::MissingTicketGrantingTicket)?;
        let credential = context.credential().cloned();
        let service = context.service().cloned().ok_or(TicketError::MissingService)?;

        let c = &self.collaborators;
        let authentication = c.ticket_registry.authentication_from(&tgt).await;
        let registered_service = c.services_manager.find_service_by(&service).await;

        // Unresolvable authentication or service definition skips enforcement.
        match (&authentication, &registered_service) {
            (Some(authentication), Some(registered_service)) => {
                debug!(
                    %registered_service,
                    principal = %authentication.principal,
                    "enforcing access strategy"
                );
                let request = AccessRequest::new(&service, authentication, registered_service)
                    .retrieve_principal_attributes_from_release_policy(true);
                c.access_enforcer.enforce(request).await.into_result(&service)?;
            }
            _ => debug!(
                %tgt,
                %service,
                authentication_resolved = authentication.is_some(),
                registered_service_resolved = registered_service.is_some(),
                "skipping access strategy enforcement"
            ),
        }

        let authentication_result = c
            .authentication_system
            .finalize_authentication(&service, credential.as_ref(), authentication.as_ref())
            .await?;

        let ticket = c
            .central_authentication_service
            .grant_service_ticket(&tgt, &service, &authentication_result)
            .await?;

        context.put_service_ticket(ticket.clone());
        context.mark_warning_if_requested();
        Ok(ticket)
    }
}
