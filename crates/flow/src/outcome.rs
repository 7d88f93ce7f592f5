//! Outcome signals handed back to the flow controller.

use thiserror::Error;

use casflow_auth::AccessDenied;
use casflow_core::ServiceTicketId;

use crate::error::{AuthenticationError, TicketError};

/// Why an eligible request did not get a service ticket.
///
/// The variants exist for logging and audit; the flow controller treats them
/// uniformly as an authentication failure.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Ticket(#[from] TicketError),
}

impl FailureCause {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccessDenied(_) => "access_denied",
            Self::Authentication(_) => "authentication_failure",
            Self::Ticket(_) => "ticket_issuance_failure",
        }
    }
}

/// Exactly one of these is produced per resolution.
#[derive(Debug)]
pub enum Outcome {
    /// Not a service-ticket request; defer to the next resolver. Nothing was
    /// written to the context.
    NotApplicable,

    /// A ticket was issued and written to the context.
    Granted(ServiceTicketId),

    /// Access denial, authentication failure, or ticket failure. The cause is
    /// attached unmodified.
    Failed(FailureCause),
}

/// Flow transition the controller should follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Ticket granted; optionally warn before redirecting.
    Warn,
    AuthenticationFailure,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::AuthenticationFailure => "authenticationFailure",
        }
    }
}

impl core::fmt::Display for Transition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Outcome {
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    pub fn ticket_id(&self) -> Option<&ServiceTicketId> {
        match self {
            Self::Granted(id) => Some(id),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            Self::Failed(cause) => Some(cause),
            _ => None,
        }
    }

    /// `None` means the resolver has no opinion.
    pub fn transition(&self) -> Option<Transition> {
        match self {
            Self::NotApplicable => None,
            Self::Granted(_) => Some(Transition::Warn),
            Self::Failed(_) => Some(Transition::AuthenticationFailure),
        }
    }
}

/// Map the result of an issuance run onto an outward signal.
pub fn classify(result: Result<ServiceTicketId, FailureCause>) -> Outcome {
    match result {
        Ok(ticket) => Outcome::Granted(ticket),
        Err(cause) => Outcome::Failed(cause),
    }
}

impl From<Result<ServiceTicketId, FailureCause>> for Outcome {
    fn from(result: Result<ServiceTicketId, FailureCause>) -> Self {
        classify(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn failure(kind: u8, detail: String) -> FailureCause {
        match kind % 3 {
            0 => FailureCause::from(AccessDenied {
                service: "https://app.example.org".to_string(),
                reason: detail,
            }),
            1 => FailureCause::from(AuthenticationError::InvalidCredential(detail)),
            _ => FailureCause::from(TicketError::InvalidTicket(detail)),
        }
    }

    #[test]
    fn granted_maps_to_warn_transition() {
        let outcome = classify(Ok(ServiceTicketId::new("ST-123")));
        assert_eq!(outcome.transition(), Some(Transition::Warn));
        assert_eq!(outcome.ticket_id().map(|t| t.as_str()), Some("ST-123"));
    }

    #[test]
    fn every_failure_kind_maps_to_authentication_failure() {
        let causes = vec![
            FailureCause::from(AccessDenied {
                service: "https://app.example.org".to_string(),
                reason: "service not authorized".to_string(),
            }),
            FailureCause::from(AuthenticationError::InvalidCredential("casuser".to_string())),
            FailureCause::from(TicketError::InvalidTicket("TGT-9".to_string())),
        ];

        for cause in causes {
            let outcome = classify(Err(cause));
            assert_eq!(outcome.transition(), Some(Transition::AuthenticationFailure));
            assert!(outcome.ticket_id().is_none());
        }
    }

    #[test]
    fn failure_keeps_original_message() {
        let outcome = classify(Err(FailureCause::from(AccessDenied {
            service: "https://app.example.org".to_string(),
            reason: "service not authorized".to_string(),
        })));
        let cause = outcome.cause().unwrap();
        assert_eq!(cause.kind(), "access_denied");
        assert!(cause.to_string().contains("service not authorized"));
    }

    #[test]
    fn not_applicable_has_no_transition() {
        assert_eq!(Outcome::NotApplicable.transition(), None);
        assert!(!Outcome::NotApplicable.is_applicable());
        assert_eq!(Transition::AuthenticationFailure.to_string(), "authenticationFailure");
    }

    proptest! {
        /// Property: any failure, whatever its kind, leads to `authenticationFailure` with no ticket.
        #[test]
        fn failed_always_maps_to_authentication_failure(kind in any::<u8>(), detail in ".{0,24}") {
            let outcome = classify(Err(failure(kind, detail)));
            prop_assert!(outcome.is_applicable());
            prop_assert!(!outcome.is_granted());
            prop_assert_eq!(outcome.transition(), Some(Transition::AuthenticationFailure));
            prop_assert!(outcome.ticket_id().is_none());
            prop_assert!(outcome.cause().is_some());
        }

        /// Property: a granted outcome carries exactly the issued ticket and transitions to `warn`.
        #[test]
        fn granted_always_carries_its_ticket(ticket in "ST-[0-9]{1,6}-[a-f0-9]{0,32}") {
            let outcome = classify(Ok(ServiceTicketId::new(ticket.clone())));
            prop_assert!(outcome.is_granted());
            prop_assert_eq!(outcome.ticket_id().map(|t| t.as_str()), Some(ticket.as_str()));
            prop_assert_eq!(outcome.transition(), Some(Transition::Warn));
            prop_assert!(outcome.cause().is_none());
        }
    }
}
