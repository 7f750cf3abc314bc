//! Role x route-prefix access policy.
//!
//! The policy is an explicit rule table evaluated once per request, instead
//! of ad-hoc string checks scattered through handlers. First matching rule
//! wins; no match means allow, since reaching the table already required a
//! valid session.

use crate::types::Role;

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// One rule in the table: a role crossed with a route prefix.
#[derive(Debug, Clone)]
struct PolicyRule {
    role: Role,
    prefix: String,
    access: Access,
}

/// Ordered rule table mapping `{role x route-prefix}` to allow/deny.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<PolicyRule>,
}

impl RoutePolicy {
    /// Empty table (everything allowed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform-wide table: customers never reach `/admin` routes.
    #[must_use]
    pub fn platform_default() -> Self {
        Self::new().deny(Role::Customer, "/admin")
    }

    /// Append a deny rule.
    #[must_use]
    pub fn deny(mut self, role: Role, prefix: impl Into<String>) -> Self {
        self.rules.push(PolicyRule {
            role,
            prefix: prefix.into(),
            access: Access::Deny,
        });
        self
    }

    /// Append an allow rule (used to carve exceptions above a broader deny).
    #[must_use]
    pub fn allow(mut self, role: Role, prefix: impl Into<String>) -> Self {
        self.rules.push(PolicyRule {
            role,
            prefix: prefix.into(),
            access: Access::Allow,
        });
        self
    }

    /// Evaluate a role against a request path. First matching rule wins.
    #[must_use]
    pub fn evaluate(&self, role: &Role, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| rule.role == *role && path_has_prefix(path, &rule.prefix))
            .map_or(Access::Allow, |rule| rule.access)
    }
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/orders`
/// but not `/administrator`.
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let mut path_segments = path.trim_matches('/').split('/');
    let prefix_segments = prefix.trim_matches('/').split('/');

    for expected in prefix_segments {
        if path_segments.next() != Some(expected) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_denied_admin_routes() {
        let policy = RoutePolicy::platform_default();
        assert_eq!(
            policy.evaluate(&Role::Customer, "/admin/orders"),
            Access::Deny
        );
        assert_eq!(policy.evaluate(&Role::Customer, "/admin"), Access::Deny);
    }

    #[test]
    fn test_customer_allowed_elsewhere() {
        let policy = RoutePolicy::platform_default();
        assert_eq!(policy.evaluate(&Role::Customer, "/profile"), Access::Allow);
        assert_eq!(policy.evaluate(&Role::Customer, "/orders"), Access::Allow);
    }

    #[test]
    fn test_admin_allowed_admin_routes() {
        let policy = RoutePolicy::platform_default();
        assert_eq!(
            policy.evaluate(&Role::Admin, "/admin/orders/9"),
            Access::Allow
        );
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        let policy = RoutePolicy::platform_default();
        assert_eq!(
            policy.evaluate(&Role::Customer, "/administrator"),
            Access::Allow
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let policy = RoutePolicy::new()
            .allow(Role::Customer, "/admin/self-service")
            .deny(Role::Customer, "/admin");
        assert_eq!(
            policy.evaluate(&Role::Customer, "/admin/self-service/export"),
            Access::Allow
        );
        assert_eq!(
            policy.evaluate(&Role::Customer, "/admin/orders"),
            Access::Deny
        );
    }

    #[test]
    fn test_unknown_roles_fall_through() {
        let policy = RoutePolicy::platform_default();
        assert_eq!(
            policy.evaluate(&Role::from("Warehouse"), "/admin/orders"),
            Access::Allow
        );
    }
}
