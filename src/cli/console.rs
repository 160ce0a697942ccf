//! Terminal renditions of the search sinks.

use crate::domain::TravelEntry;
use crate::services::{Navigator, Notifier, ResultsView};

/// Prints notifications on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Announces the redirect on stderr and prints the bare URL on stdout, so
/// `tripfinder search paris | xargs xdg-open` works.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, url: &str) {
        eprintln!("Redirecting to {url}");
        println!("{url}");
    }
}

pub struct ConsoleResults;

impl ResultsView for ConsoleResults {
    fn show(&self, entries: &[TravelEntry]) {
        println!("Search Results ({} found):", entries.len());
        println!("{:-<60}", "");
        print_entries(entries);
    }
}

pub(crate) fn print_entries(entries: &[TravelEntry]) {
    for entry in entries {
        println!("• {}", entry.name);
        if !entry.location.is_empty() {
            println!("  {}", entry.location);
        }
        if !entry.description.is_empty() {
            println!("  {}", entry.description);
        }
        println!("  → {}", entry.url);
        println!();
    }
}
