use anyhow::{anyhow, Result};
use serenity::all::{ChannelId, RoleId};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/kittibot/config.toml";

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Bot configuration
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub general: General,
    pub snark: Snark,
    pub gemini: Gemini,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct General {
    pub discord_token: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct Snark {
    /// Members with this role may inspect and change the LLM prompt
    pub admin_role_id: u64,
    /// Mentions in this channel are answered by the LLM rather than the classical responder
    pub originality_channel_id: u64,
}

impl Snark {
    pub fn admin_role(&self) -> RoleId {
        RoleId::new(self.admin_role_id)
    }

    pub fn originality_channel(&self) -> ChannelId {
        ChannelId::new(self.originality_channel_id)
    }
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct Gemini {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model_name: String,
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_owned()
}

fn default_gemini_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.to_owned()
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path).await?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        toml::from_str(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    /// Deployments historically configured the bot through the environment.  Those variables,
    /// when set, take precedence over the configuration file.
    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = var("DISCORD_TOKEN") {
            self.general.discord_token = token;
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Some(role) = var("BOT_ADMIN_ROLE") {
            self.snark.admin_role_id = role
                .trim()
                .parse()
                .map_err(|e| anyhow!("Invalid BOT_ADMIN_ROLE `{}`: {}", role, e))?;
        }
        if let Some(channel) = var("ORIGINALITY_CHANNEL_ID") {
            self.snark.originality_channel_id = channel
                .trim()
                .parse()
                .map_err(|e| anyhow!("Invalid ORIGINALITY_CHANNEL_ID `{}`: {}", channel, e))?;
        }
        Ok(())
    }

    /// Discord ids are never zero
    pub fn validate(&self) -> Result<()> {
        if self.snark.admin_role_id == 0 {
            return Err(anyhow!("snark.admin_role_id must be a Discord role id"));
        }
        if self.snark.originality_channel_id == 0 {
            return Err(anyhow!(
                "snark.originality_channel_id must be a Discord channel id"
            ));
        }
        Ok(())
    }
}
