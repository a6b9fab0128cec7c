mod entry;
pub use self::entry::*;

mod table;
pub use self::table::*;
