//! The fixed universe of allocatable resources.
//!
//! Identifiers look like `slot3@alpha`: a slot number and the group (placement
//! domain) it belongs to. The pool is loaded once and never mutated afterwards;
//! groups are indexed in order of first appearance.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::core::SchedulerError;

/// Position of a resource inside its pool's load order.
pub type ResourceIndex = usize;

/// One allocatable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Full identifier as loaded, e.g. `slot3@alpha`.
    pub id: String,
    /// Slot number within the group.
    pub slot: u32,
    /// Group name.
    pub group: String,
    /// Index of the group in first-appearance order.
    #[serde(skip)]
    pub group_index: usize,
}

impl Resource {
    /// Split an identifier into `(slot, group)`.
    pub fn parse_id(id: &str) -> Result<(u32, &str), SchedulerError> {
        let malformed = |reason: &str| SchedulerError::MalformedResource {
            id: id.to_string(),
            reason: reason.to_string(),
        };
        let (slot, group) = id
            .split_once('@')
            .ok_or_else(|| malformed("missing `@` separator"))?;
        if group.is_empty() {
            return Err(malformed("empty group"));
        }
        let digits = slot.strip_prefix("slot").unwrap_or(slot);
        let slot = digits
            .parse::<u32>()
            .map_err(|_| malformed("slot is not a non-negative integer"))?;
        Ok((slot, group))
    }
}

/// Immutable, ordered, non-empty set of resources.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    resources: Vec<Resource>,
    groups: Vec<String>,
    balanced_groups: usize,
}

impl ResourcePool {
    /// Build a pool from identifiers in load order.
    ///
    /// Identifiers naming the same slot and group (`slot1@a`, `1@a`, `slot01@a`)
    /// are duplicates.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, SchedulerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<(u32, String)> = HashSet::new();
        let mut groups: Vec<String> = Vec::new();
        let mut resources = Vec::new();

        for raw in ids {
            let id = raw.as_ref().trim();
            if id.is_empty() {
                continue;
            }
            let (slot, group) = Resource::parse_id(id)?;
            if !seen.insert((slot, group.to_string())) {
                return Err(SchedulerError::DuplicateResource(id.to_string()));
            }
            let group_index = match groups.iter().position(|g| g == group) {
                Some(index) => index,
                None => {
                    groups.push(group.to_string());
                    groups.len() - 1
                }
            };
            resources.push(Resource {
                id: id.to_string(),
                slot,
                group: group.to_string(),
                group_index,
            });
        }

        if resources.is_empty() {
            return Err(SchedulerError::EmptyPool);
        }
        let balanced_groups = groups.len().div_ceil(2);
        Ok(Self {
            resources,
            groups,
            balanced_groups,
        })
    }

    /// Parse newline-separated identifiers.
    pub fn parse(text: &str) -> Result<Self, SchedulerError> {
        Self::from_ids(text.lines())
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resource at a load-order index.
    pub fn get(&self, index: ResourceIndex) -> Option<&Resource> {
        self.resources.get(index)
    }

    /// Resources in load order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceIndex, &Resource)> {
        self.resources.iter().enumerate()
    }

    /// Distinct groups in first-appearance order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// How many leading groups a balanced job may use.
    pub const fn balanced_group_count(&self) -> usize {
        self.balanced_groups
    }
}

/// Render resources as `group@ranges` terms, e.g. `alpha@1-3,5 bravo@2`.
pub fn compress_resources<'a, I>(resources: I) -> String
where
    I: IntoIterator<Item = &'a Resource>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut slots: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for resource in resources {
        let group = resource.group.as_str();
        slots
            .entry(group)
            .or_insert_with(|| {
                order.push(group);
                Vec::new()
            })
            .push(resource.slot);
    }

    order
        .into_iter()
        .map(|group| {
            let mut numbers = slots.remove(group).unwrap_or_default();
            numbers.sort_unstable();
            format!("{group}@{}", fold_ranges(&numbers))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_ranges(sorted: &[u32]) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut iter = sorted.iter().copied();
    let Some(first) = iter.next() else {
        return String::new();
    };
    let (mut start, mut prev) = (first, first);
    for slot in iter {
        if prev.checked_add(1) == Some(slot) {
            prev = slot;
            continue;
        }
        ranges.push(render_range(start, prev));
        start = slot;
        prev = slot;
    }
    ranges.push(render_range(start, prev));
    ranges.join(",")
}

fn render_range(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(ids: &[&str]) -> ResourcePool {
        ResourcePool::from_ids(ids.iter().copied()).unwrap()
    }

    #[test]
    fn groups_follow_first_appearance() {
        let pool = pool(&["slot1@bravo", "slot1@alpha", "slot2@bravo", "slot1@charlie"]);
        assert_eq!(pool.groups(), ["bravo", "alpha", "charlie"]);
        assert_eq!(pool.balanced_group_count(), 2);
        assert_eq!(pool.get(2).unwrap().group_index, 0);
    }

    #[test]
    fn rejects_duplicates_and_empty_pools() {
        assert!(matches!(
            ResourcePool::from_ids(["slot1@a", "slot1@a"]),
            Err(SchedulerError::DuplicateResource(_))
        ));
        for alias in ["1@a", "slot01@a"] {
            assert!(
                matches!(
                    ResourcePool::from_ids(["slot1@a", alias]),
                    Err(SchedulerError::DuplicateResource(ref id)) if id == alias
                ),
                "{alias} should collide with slot1@a"
            );
        }
        assert!(matches!(
            ResourcePool::parse("\n  \n"),
            Err(SchedulerError::EmptyPool)
        ));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for bad in ["slot1", "slotx@alpha", "3@"] {
            assert!(
                matches!(
                    ResourcePool::from_ids([bad]),
                    Err(SchedulerError::MalformedResource { .. })
                ),
                "{bad} should be rejected"
            );
        }
        assert!(ResourcePool::from_ids(["7@alpha"]).is_ok());
    }

    #[test]
    fn compresses_ranges_per_group() {
        let pool = pool(&[
            "slot3@alpha",
            "slot1@alpha",
            "slot2@alpha",
            "slot2@bravo",
            "slot5@alpha",
        ]);
        let rendered = compress_resources(pool.iter().map(|(_, r)| r));
        assert_eq!(rendered, "alpha@1-3,5 bravo@2");
        assert_eq!(compress_resources(std::iter::empty()), "");
    }
}
