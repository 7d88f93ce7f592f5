//! `casflow-flow` — service-ticket request resolution for the SSO login flow.
//!
//! Given a request that already carries a ticket-granting ticket and a target
//! service, decide whether a service ticket should be issued, issue it while
//! enforcing the service's access strategy, and report one of three outcomes
//! to the surrounding flow controller.
//!
//! ```text
//! RequestContext
//!   ↓
//! EligibilityEvaluator ──(not eligible)──→ Outcome::NotApplicable
//!   ↓
//! ServiceTicketIssuer
//!   1. resolve authentication + registered service
//!   2. enforce access strategy (when both resolved)
//!   3. finalize authentication
//!   4. grant service ticket
//!   ↓
//! classify ──→ Outcome::Granted(ticket) | Outcome::Failed(cause)
//! ```
//!
//! All collaborators are injected as trait objects; see [`support`].

pub mod access;
pub mod context;
pub mod eligibility;
pub mod error;
pub mod in_memory;
pub mod issuer;
pub mod outcome;
pub mod protocol;
pub mod resolver;
pub mod settings;
pub mod support;

pub use access::DefaultAccessStrategyEnforcer;
pub use context::RequestContext;
pub use eligibility::EligibilityEvaluator;
pub use error::{AuthenticationError, SettingsError, TicketError};
pub use issuer::ServiceTicketIssuer;
pub use outcome::{FailureCause, Outcome, Transition, classify};
pub use resolver::{EventResolver, ResolverChain, ServiceTicketRequestResolver};
pub use settings::SsoSettings;
pub use support::{
    AccessStrategyEnforcer, AuthenticationSystemSupport, CentralAuthenticationService,
    Collaborators, ServicesManager, TicketRegistrySupport,
};
