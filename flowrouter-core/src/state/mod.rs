mod address_table;
pub use self::address_table::*;
