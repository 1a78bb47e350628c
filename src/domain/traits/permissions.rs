use crate::domain::entities::Principal;

/// Permission store lookup
pub trait PermissionProvider: Send + Sync {
    /// Whether `principal` holds the fully-qualified `permission`
    fn has_permission(&self, principal: &Principal, permission: &str) -> bool;
}
