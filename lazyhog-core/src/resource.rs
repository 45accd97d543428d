//! The browsable resource collections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three collections the dashboard can browse.
///
/// `Events` is the only live collection: it is polled while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Events,
    Persons,
    Flags,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[Resource::Events, Resource::Persons, Resource::Flags]
    }

    pub fn index(&self) -> usize {
        match self {
            Resource::Events => 0,
            Resource::Persons => 1,
            Resource::Flags => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Resource> {
        Self::all().get(index).copied()
    }

    /// Whether this collection is kept up to date by polling.
    pub fn is_live(&self) -> bool {
        matches!(self, Resource::Events)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Events => "events",
            Resource::Persons => "persons",
            Resource::Flags => "flags",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips_for_every_resource() {
        for resource in Resource::all() {
            assert_eq!(Resource::from_index(resource.index()), Some(*resource));
        }
    }

    #[test]
    fn test_from_index_out_of_range_is_none() {
        assert_eq!(Resource::from_index(3), None);
    }

    #[test]
    fn test_only_events_is_live() {
        assert!(Resource::Events.is_live());
        assert!(!Resource::Persons.is_live());
        assert!(!Resource::Flags.is_live());
    }
}
