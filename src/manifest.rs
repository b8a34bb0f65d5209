// Manifest module for the plugin list file

use crate::config;
use crate::model::PluginDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub platform: Platform,
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Platform {
    /// Platform release to check compatibility against
    pub target: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PluginSpec {
    /// Marketplace listing URL
    pub url: String,
    /// Installed plugin version
    pub version: String,
}

impl Manifest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            platform: Platform {
                target: target.into(),
            },
            plugins: BTreeMap::new(),
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = config::manifest_path();
        let text = std::fs::read_to_string(&path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let dir = config::config_dir();
        std::fs::create_dir_all(&dir)?;
        let path = config::manifest_path();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(&path, text)?;
        Ok(())
    }

    /// Plugins as engine input, in name order
    pub fn descriptors(&self) -> Vec<PluginDescriptor> {
        self.plugins
            .iter()
            .map(|(name, spec)| PluginDescriptor::new(name, &spec.url, &spec.version))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(
            r#"
[platform]
target = "9.2.0"

[plugins.scriptrunner]
url = "https://marketplace.atlassian.com/apps/1215215/scriptrunner-for-confluence"
version = "9.1.0"

[plugins.drawio]
url = "https://marketplace.atlassian.com/apps/1210933/draw-io"
version = "4.0.0"
"#,
        )
        .unwrap();

        assert_eq!(manifest.platform.target, "9.2.0");
        let plugins = manifest.descriptors();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].name, "drawio");
        assert_eq!(plugins[1].name, "scriptrunner");
        assert_eq!(plugins[1].current_version, "9.1.0");
    }

    #[test]
    fn test_plugins_table_is_optional() {
        let manifest = Manifest::parse("[platform]\ntarget = \"8.5\"\n").unwrap();
        assert!(manifest.descriptors().is_empty());
    }
}
