//! # Chemhover Sites
//!
//! Decides where the overlay runs. A page is activated when its host is in
//! the persisted filter list; clicking the toolbar action toggles the host in
//! or out of that list for the current tab.

mod activation;
mod error;
mod filters;
mod store;

pub use activation::{Activation, ActivationController, IconState, TabActivation, TabId};
pub use error::SitesError;
pub use filters::{host_of, UrlFilter, UrlFilters};
pub use store::{FileFilterStore, FilterStore, MemoryFilterStore};
