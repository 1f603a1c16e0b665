use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.search.api_key.is_empty() || self.search.api_key == API_KEY_PLACEHOLDER {
            return Err(anyhow::anyhow!(
                "OMDb api_key is not configured. Run 'reelkeeper config set-key' first \
                 (free keys at https://www.omdbapi.com/apikey.aspx)"
            ));
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.search.api_key.is_empty() && self.search.api_key != API_KEY_PLACEHOLDER
    }
}
