//! Preference-aware resource selection.
//!
//! Each [`Preference`] maps to a [`SelectionPolicy`] that decides which groups a
//! job may be placed on. Selection always scans the pool in load order and takes
//! the first free resource the policy admits.

use crate::core::{AllocationTable, Preference, Resource, ResourceIndex, ResourcePool};

/// Restriction on which resources a job may be placed on.
pub trait SelectionPolicy: Send + Sync {
    /// Policy name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether a resource is eligible under this policy.
    fn admits(&self, pool: &ResourcePool, resource: &Resource) -> bool;
}

/// Any free resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformancePolicy;

impl SelectionPolicy for PerformancePolicy {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn admits(&self, _pool: &ResourcePool, _resource: &Resource) -> bool {
        true
    }
}

/// Resources in the first half (rounded up) of the groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedPolicy;

impl SelectionPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn admits(&self, pool: &ResourcePool, resource: &Resource) -> bool {
        resource.group_index < pool.balanced_group_count()
    }
}

/// Resources in the first-loaded group only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyPolicy;

impl SelectionPolicy for EnergyPolicy {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn admits(&self, _pool: &ResourcePool, resource: &Resource) -> bool {
        resource.group_index == 0
    }
}

impl Preference {
    /// Strategy implementing this preference.
    pub fn policy(self) -> &'static dyn SelectionPolicy {
        match self {
            Self::Performance => &PerformancePolicy,
            Self::Balanced => &BalancedPolicy,
            Self::Energy => &EnergyPolicy,
        }
    }
}

/// First free resource, in load order, that the preference admits.
pub fn select_resource(
    pool: &ResourcePool,
    allocations: &AllocationTable,
    preference: Preference,
) -> Option<ResourceIndex> {
    let policy = preference.policy();
    pool.iter()
        .find(|(index, resource)| !allocations.is_busy(*index) && policy.admits(pool, resource))
        .map(|(index, _)| index)
}
