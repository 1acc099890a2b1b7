//! In-memory repositories.
//!
//! Repositories are explicit objects built by the host and handed to the controllers that use
//! them. Nothing here is process-global.

pub mod doctors;
pub mod family;
pub mod shop;
pub mod wearables;

pub use doctors::{Doctor, DoctorDirectory};
pub use family::{FamilyMember, FamilyRoster};
pub use shop::{Product, ProductCatalogue};
pub use wearables::{WearableFeed, WearableSnapshot};

/// Case-insensitive substring match of `term` against any of `fields`. An empty term matches.
pub(crate) fn matches_term(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&term))
}
