//! `casflow-core` — identifiers shared by the SSO flow crates.
//!
//! This crate contains **pure domain** primitives (no IO, no async).

pub mod id;

pub use id::{PrincipalId, ServiceTicketId, TicketGrantingTicketId};
