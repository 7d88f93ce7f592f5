use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Attributes, Authentication, RegisteredService, Service};

/// Access policy attached to a registered service.
///
/// This is an enforcement input only: the flow asks "may this principal get a
/// ticket for this service?" and the strategy answers from static data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessStrategy {
    /// Disabled services never receive tickets.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Attribute name => acceptable values. An empty value set only requires
    /// the attribute to be present.
    #[serde(default)]
    pub required_attributes: BTreeMap<String, BTreeSet<String>>,

    /// When `false`, satisfying any one required attribute is enough.
    #[serde(default = "default_true")]
    pub require_all_attributes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AccessStrategy {
    fn default() -> Self {
        Self {
            enabled: true,
            required_attributes: BTreeMap::new(),
            require_all_attributes: true,
        }
    }
}

impl AccessStrategy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn require_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.required_attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

/// Everything the enforcement point needs for one decision.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    pub service: &'a Service,
    pub authentication: &'a Authentication,
    pub registered_service: &'a RegisteredService,

    /// Run the principal's attributes through the service's release policy
    /// before checking required attributes.
    pub retrieve_principal_attributes_from_release_policy: bool,
}

impl<'a> AccessRequest<'a> {
    pub fn new(
        service: &'a Service,
        authentication: &'a Authentication,
        registered_service: &'a RegisteredService,
    ) -> Self {
        Self {
            service,
            authentication,
            registered_service,
            retrieve_principal_attributes_from_release_policy: false,
        }
    }

    #[must_use]
    pub fn retrieve_principal_attributes_from_release_policy(mut self, value: bool) -> Self {
        self.retrieve_principal_attributes_from_release_policy = value;
        self
    }

    /// Principal attributes as seen by the access strategy.
    pub fn principal_attributes(&self) -> Attributes {
        let attributes = &self.authentication.principal.attributes;
        if self.retrieve_principal_attributes_from_release_policy {
            self.registered_service.attribute_release_policy.release(attributes)
        } else {
            attributes.clone()
        }
    }
}

/// Result of access policy enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed,
    Denied { reason: String },
}

impl AccessDecision {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied { reason: reason.into() }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Turn a denial into a hard error for `service`.
    pub fn into_result(self, service: &Service) -> Result<(), AccessDenied> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied { reason } => Err(AccessDenied {
                service: service.id().to_string(),
                reason,
            }),
        }
    }
}

/// A principal was refused a ticket for a service by its access strategy.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("access to service '{service}' denied: {reason}")]
pub struct AccessDenied {
    pub service: String,
    pub reason: String,
}

/// Evaluate a registered service's access strategy for one principal.
///
/// - No IO
/// - No panics
/// - No attribute resolution beyond the release policy
pub fn evaluate_access(request: &AccessRequest<'_>) -> AccessDecision {
    let strategy = &request.registered_service.access_strategy;

    if !strategy.enabled {
        return AccessDecision::denied(format!(
            "service {} is not enabled",
            request.registered_service
        ));
    }

    if strategy.required_attributes.is_empty() {
        return AccessDecision::Allowed;
    }

    let attributes = request.principal_attributes();
    let satisfied = |(name, accepted): (&String, &BTreeSet<String>)| match attributes.get(name) {
        Some(values) if accepted.is_empty() => !values.is_empty(),
        Some(values) => values.iter().any(|v| accepted.contains(v)),
        None => false,
    };

    let granted = if strategy.require_all_attributes {
        strategy.required_attributes.iter().all(satisfied)
    } else {
        strategy.required_attributes.iter().any(satisfied)
    };

    if granted {
        AccessDecision::Allowed
    } else {
        let required: Vec<&str> = strategy.required_attributes.keys().map(String::as_str).collect();
        AccessDecision::denied(format!(
            "principal {} does not satisfy required attributes {:?}",
            request.authentication.principal, required
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeReleasePolicy, Principal};
    use chrono::Utc;
    use proptest::prelude::*;

    fn authn(principal: Principal) -> Authentication {
        Authentication::new(principal, Utc::now())
    }

    #[test]
    fn open_service_is_allowed() {
        let service = Service::new("https://app.example.org");
        let rs = RegisteredService::new(1, "app", "https://app.example.org*");
        let a = authn(Principal::new("casuser"));

        assert!(evaluate_access(&AccessRequest::new(&service, &a, &rs)).is_allowed());
    }

    #[test]
    fn disabled_service_is_denied_with_reason() {
        let service = Service::new("https://app.example.org");
        let rs = RegisteredService::new(7, "app", "https://app.example.org*")
            .with_access_strategy(AccessStrategy::disabled());
        let a = authn(Principal::new("casuser"));

        let decision = evaluate_access(&AccessRequest::new(&service, &a, &rs));
        let err = decision.into_result(&service).unwrap_err();
        assert_eq!(err.service, "https://app.example.org");
        assert!(err.reason.contains("not enabled"));
        assert!(err.to_string().contains("not enabled"));
    }

    #[test]
    fn required_attribute_values_are_checked() {
        let service = Service::new("https://app.example.org");
        let rs = RegisteredService::new(1, "app", "https://app.example.org*").with_access_strategy(
            AccessStrategy::default().require_attribute("memberOf", ["staff"]),
        );

        let staff = authn(Principal::new("alice").with_attribute("memberOf", ["staff"]));
        let student = authn(Principal::new("bob").with_attribute("memberOf", ["student"]));

        assert!(evaluate_access(&AccessRequest::new(&service, &staff, &rs)).is_allowed());
        assert!(!evaluate_access(&AccessRequest::new(&service, &student, &rs)).is_allowed());
    }

    #[test]
    fn release_policy_hides_attributes_when_materialized() {
        let service = Service::new("https://app.example.org");
        let rs = RegisteredService::new(1, "app", "https://app.example.org*")
            .with_access_strategy(AccessStrategy::default().require_attribute("memberOf", ["staff"]))
            .with_attribute_release_policy(AttributeReleasePolicy::DenyAll);
        let staff = authn(Principal::new("alice").with_attribute("memberOf", ["staff"]));

        let raw = AccessRequest::new(&service, &staff, &rs);
        assert!(evaluate_access(&raw).is_allowed());

        let released = raw.retrieve_principal_attributes_from_release_policy(true);
        assert!(!evaluate_access(&released).is_allowed());
    }

    #[test]
    fn any_attribute_mode_accepts_single_match() {
        let service = Service::new("https://app.example.org");
        let strategy = AccessStrategy {
            require_all_attributes: false,
            ..AccessStrategy::default()
        }
        .require_attribute("memberOf", ["staff"])
        .require_attribute("mail", Vec::<String>::new());
        let rs = RegisteredService::new(1, "app", "https://app.example.org*").with_access_strategy(strategy);
        let a = authn(Principal::new("carol").with_attribute("mail", ["carol@example.org"]));

        assert!(evaluate_access(&AccessRequest::new(&service, &a, &rs)).is_allowed());
    }

    #[test]
    fn decision_serializes_for_audit() {
        let json = serde_json::to_value(AccessDecision::denied("service not authorized")).unwrap();
        assert_eq!(json["decision"], "denied");
        assert_eq!(json["reason"], "service not authorized");
    }

    proptest! {
        /// Property: a disabled service is denied regardless of the principal's attributes.
        #[test]
        fn disabled_service_always_denied(
            values in prop::collection::vec("[a-z]{1,8}", 0..5)
        ) {
            let service = Service::new("https://app.example.org");
            let rs = RegisteredService::new(1, "app", "https://app.example.org*")
                .with_access_strategy(AccessStrategy::disabled());
            let a = authn(Principal::new("casuser").with_attribute("memberOf", values));

            prop_assert!(!evaluate_access(&AccessRequest::new(&service, &a, &rs)).is_allowed());
        }
    }
}
