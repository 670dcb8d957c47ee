//! Per-tab activation and toolbar state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::SitesError;
use crate::filters::UrlFilters;
use crate::store::FilterStore;

pub type TabId = u64;

/// Toolbar icon for the current tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Enabled,
    Disabled,
}

impl IconState {
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Enabled => "icons/icon.png",
            Self::Disabled => "icons/icon-disable.png",
        }
    }
}

/// What the host should do for a tab after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Inject the overlay into the tab's page.
    pub inject: bool,
    pub icon: IconState,
}

/// Activation flag per tab. Entries appear on first sight of a tab, are
/// overwritten on navigation, and are never removed.
#[derive(Debug, Clone, Default)]
pub struct TabActivation {
    active: HashMap<TabId, bool>,
}

impl TabActivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown tabs are inactive.
    pub fn is_active(&self, tab: TabId) -> bool {
        self.active.get(&tab).copied().unwrap_or(false)
    }

    pub fn set(&mut self, tab: TabId, active: bool) {
        self.active.insert(tab, active);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Reacts to tab navigation and toolbar clicks.
pub struct ActivationController {
    store: Arc<dyn FilterStore>,
    filters: Mutex<UrlFilters>,
    tabs: Mutex<TabActivation>,
}

impl ActivationController {
    /// Load the filter list from `store`.
    pub async fn load(store: Arc<dyn FilterStore>) -> Result<Self, SitesError> {
        let filters = store.load().await?;
        info!("Starting with {} site filters", filters.len());
        Ok(Self {
            store,
            filters: Mutex::new(filters),
            tabs: Mutex::new(TabActivation::new()),
        })
    }

    pub fn filters(&self) -> UrlFilters {
        self.filters.lock().clone()
    }

    pub fn is_active(&self, tab: TabId) -> bool {
        self.tabs.lock().is_active(tab)
    }

    /// A tab finished loading `url`. Active iff the host is listed.
    pub fn on_tab_updated(&self, tab: TabId, url: &str) -> Activation {
        let active = self.filters.lock().matches(url);
        self.tabs.lock().set(tab, active);
        if active {
            debug!("Activating tab {} on {}", tab, url);
        } else {
            debug!("Not activating tab {} on {}", tab, url);
        }
        Activation {
            inject: active,
            icon: IconState::from_active(active),
        }
    }

    /// The toolbar action was clicked on `tab` showing `url`.
    ///
    /// Turning on lists the host and injects; turning off unlists it. The page
    /// keeps any overlays already inserted. On error nothing changes.
    pub async fn on_action_clicked(&self, tab: TabId, url: &str) -> Result<Activation, SitesError> {
        let was_active = self.is_active(tab);

        let updated = {
            let mut filters = self.filters.lock().clone();
            if was_active {
                filters.remove(url)?;
            } else {
                filters.add(url)?;
            }
            filters
        };
        self.store.save(&updated).await?;
        info!(
            "{} {} ({} filters)",
            if was_active { "Removed" } else { "Added" },
            url,
            updated.len()
        );

        *self.filters.lock() = updated;
        let active = !was_active;
        self.tabs.lock().set(tab, active);

        Ok(Activation {
            inject: active,
            icon: IconState::from_active(active),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_paths() {
        assert_eq!(IconState::Enabled.path(), "icons/icon.png");
        assert_eq!(IconState::Disabled.path(), "icons/icon-disable.png");
        assert_eq!(IconState::from_active(true), IconState::Enabled);
        assert_eq!(IconState::from_active(false), IconState::Disabled);
    }

    #[test]
    fn test_tab_activation_defaults_inactive() {
        let mut tabs = TabActivation::new();
        assert!(!tabs.is_active(7));
        assert!(tabs.is_empty());

        tabs.set(7, true);
        assert!(tabs.is_active(7));
        tabs.set(7, false);
        assert!(!tabs.is_active(7));
        assert_eq!(tabs.len(), 1);
    }
}
