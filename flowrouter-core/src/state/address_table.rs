use flowrouter_packets::MacAddr;
use std::collections::HashMap;

/// Which switch port each learned link address was last seen on. Only ARP replies populate it.
#[derive(Debug, Default)]
pub struct AddressTable {
    table: HashMap<MacAddr, u16>,
}

impl AddressTable {
    /// Creates a new empty Address Table
    pub fn new() -> Self {
        AddressTable {
            table: HashMap::new(),
        }
    }

    /// Records that `mac` is reachable through `port`, overwriting any earlier port.
    /// Returns the port previously recorded for `mac`.
    pub fn learn(&mut self, mac: MacAddr, port: u16) -> Option<u16> {
        self.table.insert(mac, port)
    }

    pub fn get(&self, mac: &MacAddr) -> Option<u16> {
        self.table.get(mac).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
