pub mod search;
pub use search::{all_matches, audit_entries, first_match};

pub mod redirector;
pub use redirector::{
    Messages, Navigator, Notifier, RedirectError, ResultsView, SearchRedirector,
};
