//! Static description of the browsable collections.

use lazyhog_core::Resource;

/// A list column: header and preferred width in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u16,
}

/// Display metadata for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub resource: Resource,
    pub label: &'static str,
    pub icon: &'static str,
    pub hotkey: char,
    pub columns: &'static [Column],
    pub empty_title: &'static str,
    pub empty_hint: &'static str,
}

impl CatalogEntry {
    pub fn is_live(&self) -> bool {
        self.resource.is_live()
    }
}

const EVENT_COLUMNS: &[Column] = &[
    Column { title: "Time", width: 11 },
    Column { title: "Event", width: 25 },
    Column { title: "Distinct ID", width: 20 },
];

const PERSON_COLUMNS: &[Column] = &[
    Column { title: "Name", width: 25 },
    Column { title: "Distinct ID", width: 20 },
];

const FLAG_COLUMNS: &[Column] = &[
    Column { title: "", width: 1 },
    Column { title: "Key", width: 35 },
];

const ENTRIES: [CatalogEntry; 3] = [
    CatalogEntry {
        resource: Resource::Events,
        label: "Events",
        icon: "📡",
        hotkey: '1',
        columns: EVENT_COLUMNS,
        empty_title: "No events yet",
        empty_hint: "Events will appear here as they're captured",
    },
    CatalogEntry {
        resource: Resource::Persons,
        label: "Persons",
        icon: "👤",
        hotkey: '2',
        columns: PERSON_COLUMNS,
        empty_title: "No persons found",
        empty_hint: "Persons are created when events are sent with distinct IDs",
    },
    CatalogEntry {
        resource: Resource::Flags,
        label: "Flags",
        icon: "🚩",
        hotkey: '3',
        columns: FLAG_COLUMNS,
        empty_title: "No feature flags",
        empty_hint: "Create flags in PostHog to manage feature rollouts",
    },
];

/// All entries in selector order.
pub fn entries() -> &'static [CatalogEntry] {
    &ENTRIES
}

pub fn entry(resource: Resource) -> &'static CatalogEntry {
    &ENTRIES[resource.index()]
}
