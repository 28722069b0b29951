//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use boutique_cache::{Cache, FileStore};
use boutique_commerce::cart::CartStore;
use tracing::debug;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Config file the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// `--data-dir` override.
    data_dir_override: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(
        config_path: Option<&str>,
        data_dir: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            data_dir_override: data_dir.map(PathBuf::from),
            cwd,
        })
    }

    /// Directory the cart file lives in.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir_override {
            Some(dir) => self.resolve_path(dir),
            None => self.resolve_path(Path::new(&self.config.storage.dir)),
        }
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<CartStore<FileStore>> {
        let dir = self.data_dir();
        let currency = self.config.currency()?;
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open data directory: {}", dir.display()))?;

        debug!(dir = %dir.display(), key = %self.config.storage.cart_key, "opening cart");
        Ok(CartStore::open(
            cache,
            self.config.storage.cart_key.clone(),
            currency,
        ))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                    return Some((config, config_path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Config file in `dir` itself, if one exists.
pub fn config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}
