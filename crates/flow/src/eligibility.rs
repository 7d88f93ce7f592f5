//! Is this request asking for a service ticket?

use std::sync::Arc;

use tracing::debug;

use casflow_core::id::is_blank;

use crate::context::RequestContext;
use crate::protocol::PARAMETER_RENEW;
use crate::settings::SsoSettings;
use crate::support::TicketRegistrySupport;

/// Whether `renew` counts as requested, given the configured SSO settings.
///
/// With renewal handling disabled the parameter is treated as blank.
pub fn renewal_requested(settings: &SsoSettings, renew: Option<&str>) -> bool {
    settings.renew_authn_enabled && renew.is_some_and(|v| !is_blank(v))
}

/// Decides whether a request is a candidate for service-ticket issuance.
///
/// A request is eligible when it carries both a TGT id and a target service.
/// If it also requests renewal, the TGT must still resolve to an
/// authentication; otherwise the flow must collect credentials first.
#[derive(Clone)]
pub struct EligibilityEvaluator {
    settings: SsoSettings,
    ticket_registry: Arc<dyn TicketRegistrySupport>,
}

impl EligibilityEvaluator {
    pub fn new(settings: SsoSettings, ticket_registry: Arc<dyn TicketRegistrySupport>) -> Self {
        Self {
            settings,
            ticket_registry,
        }
    }

    pub fn settings(&self) -> &SsoSettings {
        &self.settings
    }

    /// No side effects; the only collaborator call is the authentication
    /// lookup, and only when renewal is requested.
    pub async fn evaluate(&self, context: &RequestContext) -> bool {
        let tgt = context.ticket_granting_ticket_id();
        debug!(tgt = ?tgt.map(|t| t.as_str()), "located ticket-granting ticket in request context");

        let service = context.service();
        debug!(service = ?service.map(|s| s.id()), "located service in request context");

        let (Some(tgt), Some(service)) = (tgt, service) else {
            debug!("request is not eligible for service tickets: missing ticket-granting ticket or service");
            return false;
        };

        let renew = context.request_parameter(PARAMETER_RENEW);
        if !renewal_requested(&self.settings, renew) {
            debug!(%tgt, %service, "request is asking for a service ticket");
            return true;
        }

        debug!(%tgt, "renewal requested; checking authentication bound to ticket-granting ticket");
        if self.ticket_registry.authentication_from(tgt).await.is_some() {
            debug!(%tgt, %service, "existing authentication is valid; service ticket may be issued");
            true
        } else {
            debug!(
                %tgt,
                %service,
                "existing authentication is not valid; service ticket withheld until authentication is renewed"
            );
            false
        }
    }
}

impl core::fmt::Debug for EligibilityEvaluator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EligibilityEvaluator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
