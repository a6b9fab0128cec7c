use crate::route::RouteEntry;
use cidr::Cidr;
use std::net::Ipv4Addr;

/// Static routes in the order they were configured. The table never changes once a router owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        RouteTable { entries: vec![] }
    }

    pub fn with_entries(entries: Vec<RouteEntry>) -> Self {
        RouteTable { entries }
    }

    pub fn push(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    /// The first configured route whose network contains `dest`.
    ///
    /// This is first-match, not longest-prefix: when networks overlap, whichever was configured
    /// earlier wins even if a later one is more specific.
    pub fn lookup(&self, dest: Ipv4Addr) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.network.contains(&dest))
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
