mod check;
mod entries;
mod init;
mod search;

pub use check::cmd_check;
pub use entries::cmd_entries;
pub use init::cmd_init;
pub use search::cmd_search;
