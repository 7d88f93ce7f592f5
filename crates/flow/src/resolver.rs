//! Event resolvers and the chain that consults them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::context::RequestContext;
use crate::eligibility::EligibilityEvaluator;
use crate::issuer::ServiceTicketIssuer;
use crate::outcome::Outcome;
use crate::settings::SsoSettings;
use crate::support::Collaborators;

/// One candidate in the flow controller's resolution chain.
///
/// Returning `Outcome::NotApplicable` hands the request to the next resolver.
#[async_trait]
pub trait EventResolver: Send + Sync {
    fn name(&self) -> &str;

    async fn resolve(&self, context: &mut RequestContext) -> Outcome;
}

/// Issues a service ticket when the request already holds an SSO session for
/// the target service.
#[derive(Debug, Clone)]
pub struct ServiceTicketRequestResolver {
    eligibility: EligibilityEvaluator,
    issuer: ServiceTicketIssuer,
}

impl ServiceTicketRequestResolver {
    pub fn new(settings: SsoSettings, collaborators: Collaborators) -> Self {
        Self {
            eligibility: EligibilityEvaluator::new(settings, collaborators.ticket_registry.clone()),
            issuer: ServiceTicketIssuer::new(collaborators),
        }
    }

    pub fn eligibility(&self) -> &EligibilityEvaluator {
        &self.eligibility
    }
}

#[async_trait]
impl EventResolver for ServiceTicketRequestResolver {
    fn name(&self) -> &str {
        "service-ticket-request"
    }

    async fn resolve(&self, context: &mut RequestContext) -> Outcome {
        if !self.eligibility.evaluate(context).await {
            return Outcome::NotApplicable;
        }
        debug!("authentication request is asking for service tickets");
        self.issuer.issue(context).await
    }
}

/// Chain of responsibility over resolvers: the first resolver with an opinion
/// wins; if none has one the chain itself is `NotApplicable`.
#[derive(Clone, Default)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn EventResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: Arc<dyn EventResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn push(&mut self, resolver: Arc<dyn EventResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl core::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.resolvers.iter().map(|r| r.name()))
            .finish()
    }
}

#[async_trait]
impl EventResolver for ResolverChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn resolve(&self, context: &mut RequestContext) -> Outcome {
        for resolver in &self.resolvers {
            let outcome = resolver.resolve(context).await;
            if outcome.is_applicable() {
                debug!(resolver = resolver.name(), "resolver produced an outcome");
                return outcome;
            }
            debug!(resolver = resolver.name(), "resolver deferred");
        }
        Outcome::NotApplicable
    }
}
