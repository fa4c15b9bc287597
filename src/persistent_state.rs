use anyhow::{anyhow, Result};
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

const PSTATE_PATH_REL_HOME: &str = ".config/kittibot/state.toml";

/// State which persists across sessions
///
/// A flat key-value store of bot options, e.g. the LLM prompt.  Writes go straight to disk.
#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct PersistentState {
    #[serde(default)]
    options: HashMap<String, String>,
    #[serde(skip)]
    path: PathBuf,
}

impl PersistentState {
    fn state_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(PSTATE_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(Self::state_path()?).await
    }

    /// Load state from `path`.  A missing file is an empty state which will be created on the
    /// first write.
    pub async fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Self {
                    options: HashMap::new(),
                    path,
                })
            }
            Err(e) => {
                return Err(anyhow!(
                    "Could not read state at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        let mut pstate: PersistentState = toml::from_str(&contents).map_err(|e| {
            anyhow!(
                "Could not parse state at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;
        pstate.path = path;

        Ok(pstate)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_option(&self, key: &str, default: &str) -> String {
        self.options
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_owned())
    }

    /// Last write wins.  The option only changes once it is on disk.
    pub async fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        let mut options = self.options.clone();
        options.insert(key.to_owned(), value.to_owned());

        save(&self.path, &options).await?;
        self.options = options;

        Ok(())
    }
}

async fn save(path: &Path, options: &HashMap<String, String>) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Saved<'a> {
        options: &'a HashMap<String, String>,
    }

    let pstate_str = toml::to_string_pretty(&Saved { options })
        .map_err(|e| anyhow!("Could not serialize state: {}", e))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            anyhow!(
                "Could not create directory `{}`: {}",
                parent.to_string_lossy(),
                e
            )
        })?;
    }

    // Create a temporary file in the same directory.
    let tmp_path = path.with_extension("toml.new");

    tokio::fs::write(&tmp_path, pstate_str).await.map_err(|e| {
        anyhow!(
            "Could not write state to temporary file `{}`: {}",
            tmp_path.to_string_lossy(),
            e
        )
    })?;

    // Atomically rename the temporary file over the target file.
    tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
        anyhow!(
            "Could not rename temporary file `{}` to `{}`: {}",
            tmp_path.to_string_lossy(),
            path.to_string_lossy(),
            e
        )
    })?;

    Ok(())
}
