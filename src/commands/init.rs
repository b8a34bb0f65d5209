// Init command for creating the plugin list

use crate::ui;
use dccompat::constants;
use dccompat::manifest::Manifest;

pub fn init(target: Option<String>) -> anyhow::Result<()> {
    // Check if manifest already exists
    if Manifest::load().is_ok() {
        ui::dim("Manifest detected. Skipping initialization.");
        return Ok(());
    }

    let target = target.unwrap_or_else(|| constants::DEFAULT_TARGET_VERSION.to_string());
    Manifest::new(target.clone()).save()?;
    ui::success(&format!(
        "Initialized {} with target version {}",
        constants::MANIFEST_FILE,
        target
    ));
    Ok(())
}
