//! Request parameter names understood by the login flow.

/// Forces fresh credential validation instead of reusing the SSO session.
pub const PARAMETER_RENEW: &str = "renew";

/// Asks the flow to warn the user before redirecting to the service.
pub const PARAMETER_WARN: &str = "warn";
