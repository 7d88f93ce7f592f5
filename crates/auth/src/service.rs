use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{AccessStrategy, Attributes};

/// The target application a ticket is requested for (usually its URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Service {
    id: String,
}

impl Service {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl core::fmt::Display for Service {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Which principal attributes a registered service may see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "attributes", rename_all = "snake_case")]
pub enum AttributeReleasePolicy {
    #[default]
    ReturnAll,
    ReturnAllowed(BTreeSet<String>),
    DenyAll,
}

impl AttributeReleasePolicy {
    /// Filter an attribute bag down to what this policy releases.
    pub fn release(&self, attributes: &Attributes) -> Attributes {
        match self {
            Self::ReturnAll => attributes.clone(),
            Self::ReturnAllowed(allowed) => attributes
                .iter()
                .filter(|(name, _)| allowed.contains(name.as_str()))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
            Self::DenyAll => Attributes::new(),
        }
    }
}

/// A service definition known to the issuer, with its access policy.
///
/// `service_id` is either an exact service id or a prefix pattern ending in `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredService {
    pub id: u64,
    pub name: String,
    pub service_id: String,

    /// Lower values are matched first when several definitions apply.
    #[serde(default)]
    pub evaluation_order: i32,

    #[serde(default)]
    pub access_strategy: AccessStrategy,

    #[serde(default)]
    pub attribute_release_policy: AttributeReleasePolicy,
}

impl RegisteredService {
    pub fn new(id: u64, name: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            service_id: service_id.into(),
            evaluation_order: 0,
            access_strategy: AccessStrategy::default(),
            attribute_release_policy: AttributeReleasePolicy::default(),
        }
    }

    pub fn with_access_strategy(mut self, strategy: AccessStrategy) -> Self {
        self.access_strategy = strategy;
        self
    }

    pub fn with_attribute_release_policy(mut self, policy: AttributeReleasePolicy) -> Self {
        self.attribute_release_policy = policy;
        self
    }

    pub fn matches(&self, service: &Service) -> bool {
        match self.service_id.strip_suffix('*') {
            Some(prefix) => service.id().starts_with(prefix),
            None => service.id() == self.service_id,
        }
    }
}

impl core::fmt::Display for RegisteredService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Attributes {
        let mut a = Attributes::new();
        a.insert("mail".to_string(), vec!["casuser@example.org".to_string()]);
        a.insert("memberOf".to_string(), vec!["staff".to_string()]);
        a
    }

    #[test]
    fn prefix_pattern_matches_sub_paths() {
        let rs = RegisteredService::new(1, "app", "https://app.example.org*");
        assert!(rs.matches(&Service::new("https://app.example.org/login")));
        assert!(!rs.matches(&Service::new("https://other.example.org")));
    }

    #[test]
    fn exact_pattern_requires_equality() {
        let rs = RegisteredService::new(1, "app", "https://app.example.org");
        assert!(rs.matches(&Service::new("https://app.example.org")));
        assert!(!rs.matches(&Service::new("https://app.example.org/x")));
    }

    #[test]
    fn release_policy_filters_attributes() {
        let allowed = AttributeReleasePolicy::ReturnAllowed(["mail".to_string()].into());
        let released = allowed.release(&attrs());
        assert_eq!(released.len(), 1);
        assert!(released.contains_key("mail"));

        assert!(AttributeReleasePolicy::DenyAll.release(&attrs()).is_empty());
        assert_eq!(AttributeReleasePolicy::ReturnAll.release(&attrs()), attrs());
    }
}
