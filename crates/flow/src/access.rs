//! Default access-strategy enforcement point.

use async_trait::async_trait;
use tracing::{debug, warn};

use casflow_auth::{AccessDecision, AccessRequest, evaluate_access};

use crate::support::AccessStrategyEnforcer;

/// Enforces the registered service's own `AccessStrategy`.
///
/// Stateless; one instance can serve every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAccessStrategyEnforcer;

impl DefaultAccessStrategyEnforcer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AccessStrategyEnforcer for DefaultAccessStrategyEnforcer {
    async fn enforce(&self, request: AccessRequest<'_>) -> AccessDecision {
        let decision = evaluate_access(&request);
        match &decision {
            AccessDecision::Allowed => debug!(
                service = %request.service,
                registered_service = %request.registered_service,
                principal = %request.authentication.principal,
                "access strategy allows principal"
            ),
            AccessDecision::Denied { reason } => warn!(
                service = %request.service,
                registered_service = %request.registered_service,
                principal = %request.authentication.principal,
                reason = %reason,
                "access strategy denies principal"
            ),
        }
        decision
    }
}
