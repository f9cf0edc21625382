//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::{Result, StorefrontError};

pub const DEFAULT_PORT: u16 = 8083;
pub const DEFAULT_STORAGE_DIR: &str = ".hd-store";
pub const DEFAULT_WHATSAPP_NUMBER: &str = "201066537666";
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub port: u16,
    /// Product feed; the bundled catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub storage_dir: PathBuf,
    pub whatsapp_number: String,
    pub page_size: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog_path: None,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let page_size = parse(&var, "PAGE_SIZE")?.unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(StorefrontError::Config("PAGE_SIZE must be at least 1".to_string()));
        }

        Ok(Self {
            port: parse(&var, "PORT")?.unwrap_or(defaults.port),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            storage_dir: var("CART_STORAGE_DIR").map(PathBuf::from).unwrap_or(defaults.storage_dir),
            whatsapp_number: var("WHATSAPP_NUMBER").unwrap_or(defaults.whatsapp_number),
            page_size,
        })
    }
}

fn parse<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    var(key)
        .map(|raw| raw.parse::<T>().map_err(|_| StorefrontError::Config(format!("{key} has invalid value {raw:?}"))))
        .transpose()
}
