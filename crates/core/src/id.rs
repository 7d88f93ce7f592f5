//! Strongly-typed identifiers used across the SSO flow.
//!
//! Ticket ids are opaque strings minted by the ticket registry (`TGT-...`,
//! `ST-...`), so unlike the usual UUID newtypes these wrap a `String`.

use serde::{Deserialize, Serialize};

/// Identifier of a ticket-granting ticket (the SSO session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketGrantingTicketId(String);

/// Identifier of a service ticket issued against a TGT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTicketId(String);

/// Identifier of an authenticated principal (username, subject, etc).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

/// Whitespace-only strings count as blank.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            /// Wrap a raw identifier; blankness is checked where it is consumed.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_string_newtype!(TicketGrantingTicketId);
impl_string_newtype!(ServiceTicketId);
impl_string_newtype!(PrincipalId);
