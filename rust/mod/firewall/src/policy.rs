use netblocker_upstream::Policy;

/// Comment stamped on every policy created through the provisioning API.
/// Policies without it were made by hand and are never shown.
pub const MANAGED_COMMENT: &str = "Created via API don't edit or delete";

pub fn is_managed(policy: &Policy) -> bool {
    policy.comments == MANAGED_COMMENT
}

/// Keep only API-managed policies.
pub fn filter_managed(policies: Vec<Policy>) -> Vec<Policy> {
    policies.into_iter().filter(is_managed).collect()
}
