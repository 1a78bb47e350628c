//! Permission gate - OR-combined permission checks

use std::sync::Arc;

use crate::domain::entities::Principal;
use crate::domain::traits::PermissionProvider;

/// Checks a principal against a descriptor's permission set
#[derive(Clone)]
pub struct PermissionGate {
    provider: Arc<dyn PermissionProvider>,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self { provider }
    }

    /// Unrestricted principals and empty sets always pass; otherwise holding
    /// any one of `required` is enough.
    pub fn permits(&self, principal: &Principal, required: &[String]) -> bool {
        if !principal.is_restricted() || required.is_empty() {
            return true;
        }
        required
            .iter()
            .any(|permission| self.provider.has_permission(principal, permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Holds(HashSet<&'static str>);

    impl PermissionProvider for Holds {
        fn has_permission(&self, _principal: &Principal, permission: &str) -> bool {
            self.0.contains(permission)
        }
    }

    fn gate(held: &[&'static str]) -> PermissionGate {
        PermissionGate::new(Arc::new(Holds(held.iter().copied().collect())))
    }

    fn fun_perms() -> Vec<String> {
        vec!["fun.slap".to_string(), "fun.rocket".to_string()]
    }

    #[test]
    fn any_one_permission_is_enough() {
        let alice = Principal::player("alice");
        assert!(gate(&["fun.rocket"]).permits(&alice, &fun_perms()));
        assert!(gate(&["fun.slap"]).permits(&alice, &fun_perms()));
        assert!(!gate(&["fun.immolate"]).permits(&alice, &fun_perms()));
        assert!(!gate(&[]).permits(&alice, &fun_perms()));
    }

    #[test]
    fn console_and_empty_sets_always_pass() {
        assert!(gate(&[]).permits(&Principal::console(), &fun_perms()));
        assert!(gate(&[]).permits(&Principal::player("alice"), &[]));
    }
}
