//! `site` subcommand handlers.

use std::sync::Arc;

use chemhover_config::Config;
use chemhover_sites::{ActivationController, FileFilterStore, FilterStore};
use tracing::info;

use crate::cli::SiteAction;

pub(crate) async fn handle_site_command(config: &Config, action: SiteAction) -> anyhow::Result<()> {
    let store = FileFilterStore::from_config(&config.sites);
    match action {
        SiteAction::Add { url } => {
            let mut filters = store.load().await?;
            if filters.add(&url)? {
                store.save(&filters).await?;
                info!("Enabled {} ({} sites)", url, filters.len());
                println!("Enabled {}", url);
            } else {
                println!("Already enabled: {}", url);
            }
        }
        SiteAction::Remove { url } => {
            let mut filters = store.load().await?;
            if filters.remove(&url)? {
                store.save(&filters).await?;
                info!("Disabled {} ({} sites)", url, filters.len());
                println!("Disabled {}", url);
            } else {
                println!("Not enabled: {}", url);
            }
        }
        SiteAction::Check { url } => {
            let controller = ActivationController::load(Arc::new(store)).await?;
            let activation = controller.on_tab_updated(0, &url);
            println!(
                "{}: {} (icon {})",
                url,
                if activation.inject { "active" } else { "inactive" },
                activation.icon.path()
            );
        }
        SiteAction::List => {
            let filters = store.load().await?;
            if filters.is_empty() {
                println!("No sites enabled.");
            }
            for host in filters.hosts() {
                println!("{}", host);
            }
        }
    }
    Ok(())
}
