//! `casflow-auth` — identity and service-access policy model (zero-trust).
//!
//! This crate is intentionally decoupled from the request flow, storage and
//! transport. Everything here is pure data plus deterministic policy checks.

pub mod access;
pub mod authentication;
pub mod credential;
pub mod principal;
pub mod service;

pub use access::{AccessDecision, AccessDenied, AccessRequest, AccessStrategy, evaluate_access};
pub use authentication::{Authentication, AuthenticationResult};
pub use credential::Credential;
pub use principal::{Attributes, Principal};
pub use service::{AttributeReleasePolicy, RegisteredService, Service};
