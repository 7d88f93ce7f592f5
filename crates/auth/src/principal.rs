use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use casflow_core::PrincipalId;

/// Multi-valued attribute bag (`"memberOf" => ["staff", "faculty"]`).
///
/// Ordered so audit output and equality checks are deterministic.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// An authenticated subject and the attributes resolved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PrincipalId::new(id),
            attributes: Attributes::new(),
        }
    }

    /// Add (or replace) a multi-valued attribute.
    pub fn with_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.id, f)
    }
}
