// Add command for adding a plugin to the list

use crate::ui;
use dccompat::manifest::{Manifest, PluginSpec};
use dccompat::sources::identifiers::extract_addon_identifiers;
use log::info;

pub fn add(name: String, url: String, version: String) -> anyhow::Result<()> {
    let mut manifest = Manifest::load()
        .map_err(|_| anyhow::anyhow!("Manifest not found. Run 'dccompat init' first."))?;

    let ids = extract_addon_identifiers(&url);
    if ids.api_key().is_none() {
        ui::warning(&format!(
            "No add-on id or slug found in '{}'; only page-based lookups will work",
            url
        ));
    }

    let replaced = manifest
        .plugins
        .insert(name.clone(), PluginSpec { url, version })
        .is_some();
    manifest.save()?;

    info!("Added plugin '{}' (id={:?}, slug={:?})", name, ids.id, ids.slug);
    if replaced {
        ui::success(&format!("Updated {}", name));
    } else {
        ui::success(&format!("Added {}", name));
    }
    Ok(())
}
