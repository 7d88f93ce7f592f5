//! In-memory collaborators for tests/dev.
//!
//! - No IO
//! - Lock-protected maps, safe to share across tasks
//! - Nothing expires

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use casflow_auth::{
    Authentication, AuthenticationResult, Credential, Principal, RegisteredService, Service,
};
use casflow_core::{PrincipalId, ServiceTicketId, TicketGrantingTicketId};

use crate::access::DefaultAccessStrategyEnforcer;
use crate::error::{AuthenticationError, TicketError};
use crate::support::{
    AuthenticationSystemSupport, CentralAuthenticationService, Collaborators, ServicesManager,
    TicketRegistrySupport,
};

/// A service ticket recorded by the in-memory registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedServiceTicket {
    pub id: ServiceTicketId,
    pub ticket_granting_ticket_id: TicketGrantingTicketId,
    pub service: Service,
    pub principal: PrincipalId,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct InMemoryTicketRegistry {
    sessions: RwLock<HashMap<TicketGrantingTicketId, Authentication>>,
    service_tickets: RwLock<HashMap<ServiceTicketId, IssuedServiceTicket>>,
}

impl InMemoryTicketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ticket_granting_ticket(&self, id: TicketGrantingTicketId, authentication: Authentication) {
        // A poisoned lock leaves the registry read-only until restart.
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(id, authentication);
        }
    }

    pub fn remove_ticket_granting_ticket(&self, id: &TicketGrantingTicketId) -> Option<Authentication> {
        self.sessions.write().ok()?.remove(id)
    }

    pub fn service_ticket(&self, id: &ServiceTicketId) -> Option<IssuedServiceTicket> {
        self.service_tickets.read().ok()?.get(id).cloned()
    }

    pub fn service_ticket_count(&self) -> usize {
        self.service_tickets.read().map(|t| t.len()).unwrap_or(0)
    }

    fn record_service_ticket(&self, ticket: IssuedServiceTicket) -> Result<(), TicketError> {
        let mut tickets = self
            .service_tickets
            .write()
            .map_err(|_| TicketError::Registry(anyhow::anyhow!("service ticket lock poisoned")))?;
        tickets.insert(ticket.id.clone(), ticket);
        Ok(())
    }
}

#[async_trait]
impl TicketRegistrySupport for InMemoryTicketRegistry {
    async fn authentication_from(&self, tgt: &TicketGrantingTicketId) -> Option<Authentication> {
        self.sessions.read().ok()?.get(tgt).cloned()
    }
}

/// Registered services matched in `evaluation_order`, first match wins.
#[derive(Debug, Default)]
pub struct InMemoryServicesManager {
    services: RwLock<Vec<RegisteredService>>,
}

impl InMemoryServicesManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: impl IntoIterator<Item = RegisteredService>) -> Self {
        let manager = Self::new();
        for service in services {
            manager.save(service);
        }
        manager
    }

    /// Insert or replace (by id) a registered service.
    pub fn save(&self, service: RegisteredService) {
        if let Ok(mut services) = self.services.write() {
            services.retain(|s| s.id != service.id);
            services.push(service);
            services.sort_by_key(|s| (s.evaluation_order, s.id));
        }
    }
}

#[async_trait]
impl ServicesManager for InMemoryServicesManager {
    async fn find_service_by(&self, service: &Service) -> Option<RegisteredService> {
        self.services
            .read()
            .ok()?
            .iter()
            .find(|s| s.matches(service))
            .cloned()
    }
}

#[derive(Debug, Clone)]
struct Account {
    secret: String,
    principal: Principal,
}

/// Validates credentials against a fixed set of accounts.
///
/// A request without a credential is finalized against the TGT's existing
/// authentication; with neither there is nothing to verify and it fails.
#[derive(Debug, Default)]
pub struct InMemoryAuthenticationSystemSupport {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAuthenticationSystemSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, secret: impl Into<String>, principal: Principal) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert(
                principal.id.to_string(),
                Account {
                    secret: secret.into(),
                    principal,
                },
            );
        }
    }
}

#[async_trait]
impl AuthenticationSystemSupport for InMemoryAuthenticationSystemSupport {
    async fn finalize_authentication(
        &self,
        service: &Service,
        credential: Option<&Credential>,
        session: Option<&Authentication>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let Some(credential) = credential else {
            let authentication = session.cloned().ok_or_else(|| {
                AuthenticationError::Unverifiable(format!("no credential or session for {service}"))
            })?;
            return Ok(AuthenticationResult {
                authentication,
                service: service.clone(),
                credentials_provided: false,
            });
        };

        let accounts = self
            .accounts
            .read()
            .map_err(|_| AuthenticationError::Unavailable(anyhow::anyhow!("account lock poisoned")))?;

        let account = accounts
            .get(&credential.id)
            .filter(|a| credential.secret() == Some(a.secret.as_str()))
            .ok_or_else(|| AuthenticationError::InvalidCredential(credential.id.clone()))?;

        Ok(AuthenticationResult {
            authentication: Authentication::new(account.principal.clone(), Utc::now()),
            service: service.clone(),
            credentials_provided: true,
        })
    }
}

/// Mints `ST-<n>-<uuid>` tickets against TGTs known to the registry.
#[derive(Debug)]
pub struct InMemoryCentralAuthenticationService {
    registry: Arc<InMemoryTicketRegistry>,
    sequence: AtomicU64,
}

impl InMemoryCentralAuthenticationService {
    pub fn new(registry: Arc<InMemoryTicketRegistry>) -> Self {
        Self {
            registry,
            sequence: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl CentralAuthenticationService for InMemoryCentralAuthenticationService {
    async fn grant_service_ticket(
        &self,
        tgt: &TicketGrantingTicketId,
        service: &Service,
        authentication_result: &AuthenticationResult,
    ) -> Result<ServiceTicketId, TicketError> {
        if self.registry.authentication_from(tgt).await.is_none() {
            return Err(TicketError::InvalidTicket(tgt.to_string()));
        }

        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = ServiceTicketId::new(format!("ST-{n}-{}", Uuid::now_v7().simple()));

        self.registry.record_service_ticket(IssuedServiceTicket {
            id: id.clone(),
            ticket_granting_ticket_id: tgt.clone(),
            service: service.clone(),
            principal: authentication_result.principal().id.clone(),
            issued_at: Utc::now(),
        })?;
        Ok(id)
    }
}

/// Wire all in-memory collaborators together with the default enforcer.
pub fn collaborators(
    registry: Arc<InMemoryTicketRegistry>,
    services: Arc<InMemoryServicesManager>,
    authentication_system: Arc<InMemoryAuthenticationSystemSupport>,
) -> Collaborators {
    Collaborators {
        ticket_registry: registry.clone(),
        services_manager: services,
        access_enforcer: Arc::new(DefaultAccessStrategyEnforcer::new()),
        authentication_system,
        central_authentication_service: Arc::new(InMemoryCentralAuthenticationService::new(registry)),
    }
}
