use std::sync::Once;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::core::errors::RentalError;

const DEFAULT_DIR_NAME: &str = ".rental_core";
const REGISTRY_DIR: &str = "registries";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_BACKUP_DIR: &str = "config_backups";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("rental_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

pub fn ensure_dir(path: &Path) -> Result<(), RentalError> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Resolves the application data directories, defaulting to
/// `~/.rental_core` with an env-var override for tests and scripting.
pub struct PathResolver;

impl PathResolver {
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os("RENTAL_CORE_HOME") {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn registries_dir_in(base: &Path) -> PathBuf {
        base.join(REGISTRY_DIR)
    }

    pub fn backups_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_BACKUP_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }
}
