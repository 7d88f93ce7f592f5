//! Request-scoped flow state.

use std::collections::HashMap;

use casflow_auth::{Credential, Service};
use casflow_core::{ServiceTicketId, TicketGrantingTicketId, id::is_blank};

use crate::protocol::PARAMETER_WARN;

/// Mutable, request-scoped bag the flow controller hands to resolvers.
///
/// Owned by exactly one invocation; resolvers read the inputs and write only
/// the issued-ticket and warning slots.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    ticket_granting_ticket_id: Option<TicketGrantingTicketId>,
    service: Option<Service>,
    parameters: HashMap<String, String>,
    credential: Option<Credential>,

    service_ticket_id: Option<ServiceTicketId>,
    warning_marked: bool,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticket_granting_ticket(mut self, id: impl Into<String>) -> Self {
        self.ticket_granting_ticket_id = Some(TicketGrantingTicketId::new(id));
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// The TGT id bound to this request, ignoring blank values.
    pub fn ticket_granting_ticket_id(&self) -> Option<&TicketGrantingTicketId> {
        self.ticket_granting_ticket_id
            .as_ref()
            .filter(|id| !is_blank(id.as_str()))
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn request_parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Record the service ticket issued for this request.
    pub fn put_service_ticket(&mut self, id: ServiceTicketId) {
        self.service_ticket_id = Some(id);
    }

    pub fn service_ticket_id(&self) -> Option<&ServiceTicketId> {
        self.service_ticket_id.as_ref()
    }

    /// Mark the context to show a warning notice when the request carries a
    /// non-blank `warn` parameter. Returns whether the marker is set.
    pub fn mark_warning_if_requested(&mut self) -> bool {
        if self
            .request_parameter(PARAMETER_WARN)
            .is_some_and(|v| !is_blank(v))
        {
            self.warning_marked = true;
        }
        self.warning_marked
    }

    pub fn warning_marked(&self) -> bool {
        self.warning_marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ticket_granting_ticket_is_absent() {
        let ctx = RequestContext::new().with_ticket_granting_ticket("  ");
        assert!(ctx.ticket_granting_ticket_id().is_none());
    }

    #[test]
    fn warning_requires_non_blank_parameter() {
        let mut blank = RequestContext::new().with_parameter("warn", "");
        assert!(!blank.mark_warning_if_requested());

        let mut set = RequestContext::new().with_parameter("warn", "true");
        assert!(set.mark_warning_if_requested());
        assert!(set.warning_marked());
    }

    #[test]
    fn issued_ticket_slot_starts_empty() {
        let mut ctx = RequestContext::new();
        assert!(ctx.service_ticket_id().is_none());

        ctx.put_service_ticket(ServiceTicketId::new("ST-1"));
        assert_eq!(ctx.service_ticket_id().map(|id| id.as_str()), Some("ST-1"));
    }
}
